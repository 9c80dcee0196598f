use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::engine::render::Surface;
use crate::error::ArcadeError;

/// [`Surface`] over a `<canvas>` 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_id(document: &Document, id: &str) -> Result<Self, ArcadeError> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or(ArcadeError::MissingDom("canvas element"))?
            .dyn_into()
            .map_err(|_| ArcadeError::MissingDom("canvas element"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(ArcadeError::MissingDom("2d canvas context"))?
            .dyn_into()
            .map_err(|_| ArcadeError::MissingDom("2d canvas context"))?;
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.arc(x, y, r.max(0.0), 0.0, TAU).ok();
        self.ctx.fill();
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str) {
        let [(x0, y0), rest @ ..] = points else {
            return;
        };
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.move_to(*x0, *y0);
        for &(x, y) in rest {
            self.ctx.line_to(x, y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }

    fn text(&mut self, x: f64, y: f64, size: f64, color: &str, text: &str) {
        self.ctx.set_font(&format!("bold {:.0}px sans-serif", size.max(1.0)));
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, x, y).ok();
    }
}

//! Immediate-mode scene drawing.
//!
//! The renderer only reads the session. Every frame is drawn from scratch onto
//! a [`Surface`]; the browser implements it over a 2D canvas context and tests
//! use [`RecordingSurface`].

use std::f64::consts::{PI, TAU};

use super::geometry::{FIELD, Hitbox, Vec2};
use super::{Entity, GameSession, Phase};
use crate::games::{PlayerSprite, SceneStyle, Sprite, VariantDesc};

/// Drawing primitives in pixel coordinates.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (f64, f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: &str);
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str);
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str);
    /// Text centered on `(x, y)`.
    fn text(&mut self, x: f64, y: f64, size: f64, color: &str, text: &str);
}

/// Maps the normalized 0-100 field onto a pixel surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    sx: f64,
    sy: f64,
}

impl Projection {
    pub fn new(width: f64, height: f64) -> Self {
        Self { sx: width / FIELD, sy: height / FIELD }
    }

    pub fn point(&self, p: Vec2) -> (f64, f64) {
        (p.x * self.sx, p.y * self.sy)
    }

    pub fn xy(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.sx, y * self.sy)
    }

    /// Lengths (radii, line widths, font sizes) scale with the smaller axis so
    /// round things stay round.
    pub fn scale(&self, units: f64) -> f64 {
        units * self.sx.min(self.sy)
    }
}

/// What the renderer needs besides the descriptor.
#[derive(Clone, Copy, Debug)]
pub struct SceneView<'a> {
    pub session: &'a GameSession,
    pub high_score: u32,
    /// The session that just ended beat the best score held before it.
    pub new_best: bool,
    pub locked: bool,
    /// Host timestamp; drives ambient animation only.
    pub now_ms: f64,
}

const INK: &str = "#ffffff";
const SHADE: &str = "rgba(0, 0, 0, 0.55)";

pub fn render_scene(surface: &mut dyn Surface, desc: &VariantDesc, view: &SceneView<'_>) {
    let (width, height) = surface.size();
    if !(width > 0.0 && height > 0.0) {
        return;
    }
    let proj = Projection::new(width, height);
    let t = view.now_ms / 1000.0;

    draw_background(surface, &proj, desc.scene, width, height);
    draw_ambient(surface, &proj, desc.scene, t, view.session.wind);
    for entity in &view.session.entities {
        draw_entity(surface, &proj, entity);
    }
    draw_player(surface, &proj, desc.player.sprite, view.session.player, desc.player.hitbox);
    draw_hud(surface, &proj, desc, view);
    draw_overlay(surface, &proj, desc, view, width, height);
}

// --- Layers --------------------------------------------------------------------

fn draw_background(s: &mut dyn Surface, proj: &Projection, scene: SceneStyle, w: f64, h: f64) {
    match scene {
        SceneStyle::Storm => {
            s.fill_rect(0.0, 0.0, w, h, "#1b2233");
            s.fill_rect(0.0, h * 0.6, w, h * 0.4, "#232c40");
        }
        SceneStyle::Sunny => {
            s.fill_rect(0.0, 0.0, w, h, "#8fd3ff");
            s.fill_rect(0.0, h * 0.92, w, h * 0.08, "#7cc36a");
        }
        SceneStyle::Sea => {
            let (_, horizon) = proj.xy(0.0, 52.0);
            s.fill_rect(0.0, 0.0, w, horizon, "#a7d8f0");
            s.fill_rect(0.0, horizon, w, h - horizon, "#1f6fa8");
        }
    }
}

/// Decoration derived from time alone: no state, no randomness.
fn draw_ambient(s: &mut dyn Surface, proj: &Projection, scene: SceneStyle, t: f64, wind: f64) {
    match scene {
        SceneStyle::Storm => {
            for i in 0..24 {
                let x = (i as f64 * 37.0 + t * 4.0) % FIELD;
                let y = (i as f64 * 23.0 + t * 60.0) % 110.0 - 5.0;
                s.stroke_line(proj.xy(x, y), proj.xy(x - 0.8, y + 4.0), proj.scale(0.25), "rgba(170, 190, 230, 0.5)");
            }
            for i in 0..3 {
                let x = (i as f64 * 41.0 + t * 2.0) % 130.0 - 15.0;
                draw_cloud(s, proj, Vec2::new(x, 8.0 + i as f64 * 5.0), 6.0, "#3a4356");
            }
        }
        SceneStyle::Sunny => {
            for i in 0..3 {
                let x = (i as f64 * 45.0 + t * 3.0) % 130.0 - 15.0;
                draw_cloud(s, proj, Vec2::new(x, 10.0 + i as f64 * 9.0), 5.0, "rgba(255, 255, 255, 0.85)");
            }
        }
        SceneStyle::Sea => {
            for row in 0..5 {
                let y = 58.0 + row as f64 * 8.0;
                let phase = t * 1.5 + row as f64;
                for i in 0..6 {
                    let x = (i as f64 * 20.0 + phase.sin() * 3.0 + row as f64 * 7.0) % FIELD;
                    s.stroke_line(proj.xy(x, y), proj.xy(x + 5.0, y), proj.scale(0.3), "rgba(255, 255, 255, 0.35)");
                }
            }
            // streak length and direction follow the current wind
            let dir = wind.signum();
            let length = wind.abs().min(20.0) * 0.5;
            for i in 0..8 {
                let x = (i as f64 * 29.0 + t * wind).rem_euclid(FIELD);
                let y = 10.0 + i as f64 * 5.0;
                s.stroke_line(proj.xy(x, y), proj.xy(x + dir * length, y), proj.scale(0.2), "rgba(255, 255, 255, 0.6)");
            }
        }
    }
}

fn draw_entity(s: &mut dyn Surface, proj: &Projection, e: &Entity) {
    let size = e.hitbox.extent();
    match e.sprite {
        Sprite::Bolt => {
            let (hw, hh) = match e.hitbox {
                Hitbox::Box { half_w, half_h } => (half_w, half_h),
                Hitbox::Circle { radius } => (radius * 0.4, radius),
            };
            let shape = [
                (0.3, -1.0),
                (-0.9, 0.1),
                (-0.1, 0.1),
                (-0.4, 1.0),
                (0.9, -0.2),
                (0.1, -0.2),
            ];
            let points: Vec<_> = shape.iter().map(|&(x, y)| (x * hw * 1.4, y * hh)).collect();
            s.fill_polygon(&polygon(proj, e.pos, &points, 0.0), "#ffe14d");
        }
        Sprite::Sun => {
            for ray in 0..8 {
                let a = e.rotation + ray as f64 * TAU / 8.0;
                let from = Vec2::new(e.pos.x + a.cos() * size * 0.8, e.pos.y + a.sin() * size * 0.8);
                let to = Vec2::new(e.pos.x + a.cos() * size * 1.3, e.pos.y + a.sin() * size * 1.3);
                s.stroke_line(proj.point(from), proj.point(to), proj.scale(0.5), "#ffb300");
            }
            let (x, y) = proj.point(e.pos);
            s.fill_circle(x, y, proj.scale(size * 0.75), "#ffd23f");
        }
        Sprite::StormCloud => {
            draw_cloud(s, proj, e.pos, size, "#59606e");
            let (x, y) = proj.xy(e.pos.x, e.pos.y + size * 0.7);
            s.fill_polygon(&[(x, y), (x - proj.scale(1.0), y + proj.scale(2.0)), (x + proj.scale(0.5), y + proj.scale(1.8))], "#ffe14d");
        }
        Sprite::Rock => {
            let sides = 7;
            let points: Vec<_> = (0..sides)
                .map(|i| {
                    let a = i as f64 * TAU / sides as f64;
                    let r = if i % 2 == 0 { size } else { size * 0.82 };
                    (a.cos() * r, a.sin() * r)
                })
                .collect();
            s.fill_polygon(&polygon(proj, e.pos, &points, e.rotation), "#5b5048");
        }
        Sprite::Gull => {
            let (hw, hh) = match e.hitbox {
                Hitbox::Box { half_w, half_h } => (half_w, half_h),
                Hitbox::Circle { radius } => (radius, radius * 0.5),
            };
            let left = Vec2::new(e.pos.x - hw, e.pos.y - hh);
            let right = Vec2::new(e.pos.x + hw, e.pos.y - hh);
            let width = proj.scale(0.6);
            s.stroke_line(proj.point(left), proj.point(e.pos), width, "#f5f5f5");
            s.stroke_line(proj.point(e.pos), proj.point(right), width, "#f5f5f5");
        }
    }
}

fn draw_player(s: &mut dyn Surface, proj: &Projection, sprite: PlayerSprite, at: Vec2, hitbox: Hitbox) {
    let size = hitbox.extent();
    match sprite {
        PlayerSprite::Umbrella => {
            let canopy: Vec<_> = (0..=12)
                .map(|i| {
                    let a = PI + i as f64 * PI / 12.0;
                    (a.cos() * size * 1.2, a.sin() * size)
                })
                .collect();
            s.fill_polygon(&polygon(proj, at, &canopy, 0.0), "#e84855");
            let handle_end = Vec2::new(at.x, at.y + size);
            s.stroke_line(proj.point(at), proj.point(handle_end), proj.scale(0.5), "#2d2d2d");
        }
        PlayerSprite::Basket => {
            let (x, y) = proj.xy(at.x - size, at.y - size * 0.3);
            s.fill_rect(x, y, proj.scale(size * 2.0), proj.scale(size), "#b5793b");
            let rim_l = proj.xy(at.x - size * 1.1, at.y - size * 0.3);
            let rim_r = proj.xy(at.x + size * 1.1, at.y - size * 0.3);
            s.stroke_line(rim_l, rim_r, proj.scale(0.8), "#8a5a2b");
        }
        PlayerSprite::Surfer => {
            let board = [(-size * 1.3, size * 0.6), (size * 1.3, size * 0.6), (size, size * 0.9), (-size, size * 0.9)];
            s.fill_polygon(&polygon(proj, at, &board, 0.0), "#f4d35e");
            let sail = [(0.0, -size * 1.4), (size * 0.9, size * 0.4), (0.0, size * 0.4)];
            s.fill_polygon(&polygon(proj, at, &sail, 0.0), "#ee6c4d");
            let (x, y) = proj.xy(at.x - size * 0.3, at.y - size * 0.2);
            s.fill_circle(x, y, proj.scale(size * 0.3), "#3d2c2e");
        }
    }
}

fn draw_hud(s: &mut dyn Surface, proj: &Projection, desc: &VariantDesc, view: &SceneView<'_>) {
    let session = view.session;
    if session.phase == Phase::Idle {
        return;
    }
    let size = proj.scale(4.0);
    let (x, y) = proj.xy(16.0, 6.0);
    s.text(x, y, size, INK, &format!("Score {}", session.total_score(desc)));
    let (x, y) = proj.xy(50.0, 6.0);
    s.text(x, y, size, INK, &format!("Lv {}", session.difficulty));
    let (x, y) = proj.xy(84.0, 6.0);
    s.text(x, y, size, INK, &format!("Best {}", view.high_score));
    if desc.wind.is_some() {
        let arrow = if session.wind < 0.0 { "<<" } else { ">>" };
        let (x, y) = proj.xy(50.0, 12.0);
        s.text(x, y, proj.scale(3.0), INK, &format!("Wind {arrow} {:.0}", session.wind.abs()));
    }
}

fn draw_overlay(
    s: &mut dyn Surface,
    proj: &Projection,
    desc: &VariantDesc,
    view: &SceneView<'_>,
    w: f64,
    h: f64,
) {
    let phase = view.session.phase;
    if phase == Phase::Running {
        return;
    }
    s.fill_rect(0.0, 0.0, w, h, SHADE);
    let big = proj.scale(7.0);
    let small = proj.scale(4.0);
    let line = |y: f64| proj.xy(50.0, y);

    if view.locked {
        let (x, y) = line(40.0);
        s.text(x, y, big, INK, "Locked");
        let (x, y) = line(52.0);
        s.text(x, y, small, INK, "Come back tomorrow");
        return;
    }
    match phase {
        Phase::Idle => {
            let (x, y) = line(36.0);
            s.text(x, y, big, INK, desc.title);
            let (x, y) = line(46.0);
            s.text(x, y, small, INK, desc.blurb);
            let (x, y) = line(56.0);
            s.text(x, y, small, INK, &format!("Best {}", view.high_score));
            let (x, y) = line(68.0);
            s.text(x, y, small, INK, "Press Space or tap to start");
        }
        Phase::Ended => {
            let total = view.session.total_score(desc);
            let (x, y) = line(36.0);
            s.text(x, y, big, INK, "Game over");
            let (x, y) = line(48.0);
            s.text(x, y, small, INK, &format!("Score {total}"));
            let (x, y) = line(56.0);
            let best = if view.new_best {
                "New best!".to_owned()
            } else {
                format!("Best {}", view.high_score)
            };
            s.text(x, y, small, INK, &best);
            let (x, y) = line(68.0);
            s.text(x, y, small, INK, "Press Space or tap to play again");
        }
        Phase::Running => {}
    }
}

// --- Helpers -------------------------------------------------------------------

fn draw_cloud(s: &mut dyn Surface, proj: &Projection, at: Vec2, size: f64, color: &str) {
    for (dx, dy, r) in [(-0.6, 0.1, 0.6), (0.0, -0.2, 0.8), (0.6, 0.1, 0.6)] {
        let (x, y) = proj.xy(at.x + dx * size, at.y + dy * size);
        s.fill_circle(x, y, proj.scale(r * size), color);
    }
}

/// Offsets (normalized units) rotated by `angle` around `center`, projected.
fn polygon(proj: &Projection, center: Vec2, offsets: &[(f64, f64)], angle: f64) -> Vec<(f64, f64)> {
    let (sin, cos) = angle.sin_cos();
    offsets
        .iter()
        .map(|&(dx, dy)| proj.xy(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos))
        .collect()
}

// --- Recording -----------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect { x: f64, y: f64, w: f64, h: f64, color: String },
    Circle { x: f64, y: f64, r: f64, color: String },
    Polygon { points: Vec<(f64, f64)>, color: String },
    Line { from: (f64, f64), to: (f64, f64), width: f64, color: String },
    Text { x: f64, y: f64, size: f64, color: String, text: String },
}

/// Headless surface that keeps every draw call.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, commands: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.commands.push(DrawCommand::Rect { x, y, w, h, color: color.to_owned() });
    }

    fn fill_circle(&mut self, x: f64, y: f64, r: f64, color: &str) {
        self.commands.push(DrawCommand::Circle { x, y, r, color: color.to_owned() });
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str) {
        self.commands.push(DrawCommand::Polygon { points: points.to_vec(), color: color.to_owned() });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: &str) {
        self.commands.push(DrawCommand::Line { from, to, width, color: color.to_owned() });
    }

    fn text(&mut self, x: f64, y: f64, size: f64, color: &str, text: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            size,
            color: color.to_owned(),
            text: text.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EndReason;
    use crate::games::{lightning_dodge, sunshine_collector, wind_surfer, Role};

    fn view(session: &GameSession) -> SceneView<'_> {
        SceneView { session, high_score: 12, new_best: false, locked: false, now_ms: 2_500.0 }
    }

    #[test]
    fn projection_scales_per_axis() {
        let proj = Projection::new(400.0, 200.0);
        assert_eq!(proj.point(Vec2::new(50.0, 50.0)), (200.0, 100.0));
        assert_eq!(proj.xy(100.0, 100.0), (400.0, 200.0));
        assert_eq!(proj.scale(10.0), 20.0);
    }

    #[test]
    fn idle_screen_shows_title_and_prompt() {
        let desc = lightning_dodge::descriptor();
        let session = GameSession::new(&desc, 1);
        let mut surface = RecordingSurface::new(320.0, 480.0);
        render_scene(&mut surface, &desc, &view(&session));
        let texts = surface.texts();
        assert!(texts.contains(&"Lightning Dodge"));
        assert!(texts.contains(&"Best 12"));
        assert!(texts.iter().any(|t| t.contains("to start")));
    }

    #[test]
    fn locked_screen_replaces_the_prompt() {
        let desc = sunshine_collector::descriptor();
        let session = GameSession::new(&desc, 1);
        let mut surface = RecordingSurface::new(320.0, 480.0);
        let locked = SceneView { locked: true, ..view(&session) };
        render_scene(&mut surface, &desc, &locked);
        let texts = surface.texts();
        assert!(texts.contains(&"Come back tomorrow"));
        assert!(!texts.iter().any(|t| t.contains("to start")));
    }

    #[test]
    fn running_hud_and_game_over_show_the_total() {
        let desc = sunshine_collector::descriptor();
        let mut session = GameSession::new(&desc, 1);
        session.phase = Phase::Running;
        session.elapsed_score = 4;
        session.bonus_score = 3;
        session.entities.push(Entity::new(Role::Collectible, Sprite::Sun, Vec2::new(30.0, 20.0), Hitbox::Circle { radius: 4.0 }));
        let mut surface = RecordingSurface::new(300.0, 300.0);
        render_scene(&mut surface, &desc, &view(&session));
        assert!(surface.texts().contains(&"Score 7"));
        assert!(!surface.texts().contains(&"Game over"));

        session.phase = Phase::Ended;
        session.end_reason = Some(EndReason::Collision);
        surface.clear();
        render_scene(&mut surface, &desc, &view(&session));
        let texts = surface.texts();
        assert!(texts.contains(&"Game over"));
        assert!(texts.contains(&"Score 7"));
        assert!(texts.contains(&"Best 12"));
    }

    #[test]
    fn tying_the_best_is_not_a_new_best() {
        let desc = lightning_dodge::descriptor();
        let mut session = GameSession::new(&desc, 1);
        session.phase = Phase::Ended;
        session.elapsed_score = 12;
        let mut surface = RecordingSurface::new(300.0, 300.0);
        render_scene(&mut surface, &desc, &view(&session));
        assert!(surface.texts().contains(&"Best 12"));
        assert!(!surface.texts().contains(&"New best!"));

        surface.clear();
        let improved = SceneView { new_best: true, ..view(&session) };
        render_scene(&mut surface, &desc, &improved);
        assert!(surface.texts().contains(&"New best!"));
    }

    #[test]
    fn drawing_is_deterministic_for_the_same_view() {
        let desc = wind_surfer::descriptor();
        let mut session = GameSession::new(&desc, 4);
        session.phase = Phase::Running;
        let mut a = RecordingSurface::new(640.0, 360.0);
        let mut b = RecordingSurface::new(640.0, 360.0);
        render_scene(&mut a, &desc, &view(&session));
        render_scene(&mut b, &desc, &view(&session));
        assert_eq!(a.commands, b.commands);
        assert!(a.texts().iter().any(|t| t.starts_with("Wind")));
    }

    #[test]
    fn zero_sized_surface_draws_nothing() {
        let desc = lightning_dodge::descriptor();
        let session = GameSession::new(&desc, 1);
        let mut surface = RecordingSurface::new(0.0, 240.0);
        render_scene(&mut surface, &desc, &view(&session));
        assert!(surface.commands.is_empty());
    }
}

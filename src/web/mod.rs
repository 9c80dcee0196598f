//! Browser binding: mounts a game on a canvas and exposes it to JavaScript.
//!
//! ```js
//! const game = new ArcadeGame("wind-surfer", "arcade-canvas");
//! game.on_game_end((score) => awardPoints(score));
//! game.start();
//!
//! // or through the games dialog
//! const menu = new ArcadeMenu();
//! menu.select("sunshine-collector");
//! const picked = menu.open("arcade-canvas");
//! ```

mod canvas;
mod scheduler;
mod storage;

use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent, PointerEvent};

pub use canvas::CanvasSurface;
pub use scheduler::RafScheduler;
pub use storage::LocalStorageStore;

use crate::arcade::{GameMenu, GameVariant};
use crate::config::ArcadeConfig;
use crate::engine::Phase;
use crate::engine::driver::GameLoop;
use crate::engine::geometry::{FIELD, Vec2};
use crate::engine::score::{HighScoreBook, HighScoreStore, MemoryStore};
use crate::error::ArcadeError;

/// Local storage when the browser allows it, otherwise scores last for the page.
pub fn high_score_store() -> Box<dyn HighScoreStore> {
    match LocalStorageStore::open() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(%err, "high scores will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// A DOM listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, ArcadeError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|_| ArcadeError::MissingDom("event target"))?;
        Ok(Self { target: target.clone(), event, closure })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// One mounted arcade game.
#[wasm_bindgen]
pub struct ArcadeGame {
    game: GameLoop,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ArcadeGame {
    /// Mount `variant` (`"lightning-dodge"`, `"sunshine-collector"`,
    /// `"wind-surfer"`) on the canvas with id `canvas_id`. `config_json` is an
    /// optional [`ArcadeConfig`] document.
    #[wasm_bindgen(constructor)]
    pub fn new(
        variant: &str,
        canvas_id: &str,
        config_json: Option<String>,
    ) -> Result<ArcadeGame, JsValue> {
        Ok(Self::mount(variant, canvas_id, config_json.as_deref())?)
    }

    pub fn start(&self) -> bool {
        self.game.start()
    }

    /// Stop without reporting a score (host navigated away, dialog closed).
    pub fn abort(&self) -> bool {
        self.game.abort()
    }

    pub fn reset(&self) -> bool {
        self.game.reset()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.game.set_disabled(disabled);
    }

    /// `callback(finalScore)` runs once per completed session.
    pub fn on_game_end(&self, callback: js_sys::Function) {
        self.game.on_game_end(move |score| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from(score)) {
                warn!(?err, "game end callback threw");
            }
        });
    }

    pub fn phase(&self) -> String {
        self.game.phase().as_str().to_owned()
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn high_score(&self) -> u32 {
        self.game.high_score()
    }

    pub fn variant(&self) -> String {
        self.game.variant().id().to_owned()
    }

    pub fn redraw(&self) {
        self.game.redraw();
    }
}

impl ArcadeGame {
    fn mount(variant: &str, canvas_id: &str, config_json: Option<&str>) -> Result<Self, ArcadeError> {
        let config = ArcadeConfig::from_optional_json(config_json)?;
        Self::mount_variant(GameVariant::parse(variant)?, canvas_id, &config)
    }

    fn mount_variant(variant: GameVariant, canvas_id: &str, config: &ArcadeConfig) -> Result<Self, ArcadeError> {
        let desc = config.descriptor(variant)?;

        let window = web_sys::window().ok_or(ArcadeError::MissingDom("window"))?;
        let document = window.document().ok_or(ArcadeError::MissingDom("document"))?;
        let surface = CanvasSurface::from_id(&document, canvas_id)?;
        let canvas = surface.canvas().clone();

        let scheduler = Rc::new(RafScheduler::new(window.clone()));
        let game = GameLoop::with_options(desc, scheduler, high_score_store(), config.loop_options());
        game.set_surface(Box::new(surface));

        let listeners = bind_input(&game, window.as_ref(), &canvas)?;
        Ok(Self { game, _listeners: listeners })
    }
}

/// The games dialog: lists every game with its best score and mounts the one
/// the player picks.
#[wasm_bindgen]
pub struct ArcadeMenu {
    menu: GameMenu,
    config: ArcadeConfig,
}

#[wasm_bindgen]
impl ArcadeMenu {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ArcadeMenu, JsValue> {
        let config = ArcadeConfig::from_optional_json(config_json.as_deref())?;
        let book = HighScoreBook::with_prefix(high_score_store(), config.storage_prefix.clone());
        Ok(Self { menu: GameMenu::new(&book), config })
    }

    /// `[{ id, title, blurb, best }, ...]` as JSON.
    pub fn entries(&self) -> Result<String, JsValue> {
        Ok(self.menu.to_json()?)
    }

    pub fn select(&mut self, id: &str) -> Result<String, JsValue> {
        Ok(self.menu.select(id)?.id().to_owned())
    }

    pub fn selected(&self) -> Option<String> {
        self.menu.selected().map(|v| v.id().to_owned())
    }

    pub fn close(&mut self) {
        self.menu.close();
    }

    /// Show a finished game's score on its entry.
    pub fn record(&mut self, id: &str, best: u32) -> Result<(), JsValue> {
        self.menu.record(GameVariant::parse(id)?, best);
        Ok(())
    }

    /// Mount the selected game on `canvas_id` with the menu's config.
    pub fn open(&self, canvas_id: &str) -> Result<ArcadeGame, JsValue> {
        let variant = self.menu.selected().ok_or(ArcadeError::NothingSelected)?;
        Ok(ArcadeGame::mount_variant(variant, canvas_id, &self.config)?)
    }
}

impl Drop for ArcadeGame {
    fn drop(&mut self) {
        // unmount mid-session: stop quietly, no score report
        self.game.abort();
    }
}

fn bind_input(
    game: &GameLoop,
    window: &EventTarget,
    canvas: &HtmlCanvasElement,
) -> Result<Vec<Listener>, ArcadeError> {
    let mut listeners = Vec::with_capacity(7);

    let g = game.clone();
    listeners.push(Listener::attach(window, "keydown", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
            return;
        };
        if g.key_down(&key) {
            event.prevent_default();
        }
    })?);

    let g = game.clone();
    listeners.push(Listener::attach(window, "keyup", move |event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            g.key_up(&event.key());
        }
    })?);

    let target: &EventTarget = canvas.as_ref();

    let (g, c) = (game.clone(), canvas.clone());
    listeners.push(Listener::attach(target, "pointerdown", move |event| {
        let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
            return;
        };
        event.prevent_default();
        if g.phase() != Phase::Running {
            g.start();
        }
        g.pointer_at(normalize(&c, pointer));
    })?);

    let (g, c) = (game.clone(), canvas.clone());
    listeners.push(Listener::attach(target, "pointermove", move |event| {
        if let Some(event) = event.dyn_ref::<PointerEvent>() {
            // only a held button or a touching finger steers
            if event.buttons() != 0 {
                g.pointer_at(normalize(&c, event));
            }
        }
    })?);

    for name in ["pointerup", "pointercancel", "pointerleave"] {
        let g = game.clone();
        listeners.push(Listener::attach(target, name, move |_| g.pointer_up())?);
    }
    Ok(listeners)
}

/// Canvas-local CSS pixels to the 0-100 field.
fn normalize(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Vec2 {
    let width = canvas.client_width().max(1) as f64;
    let height = canvas.client_height().max(1) as f64;
    Vec2::new(
        event.offset_x() as f64 / width * FIELD,
        event.offset_y() as f64 / height * FIELD,
    )
}

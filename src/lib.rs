//! Weather Arcade core crate.
//!
//! Three canvas mini-games (Lightning Dodge, Sunshine Collector, Wind Surfer)
//! share one real-time engine: a pure per-frame reducer over an explicit
//! session value, driven by an injectable frame scheduler and reporting the
//! final score through an `on_game_end` callback. The `web` module binds it to
//! a canvas, `requestAnimationFrame` and local storage.

use wasm_bindgen::prelude::*;

pub mod arcade;
pub mod config;
pub mod engine;
pub mod error;
pub mod games;
pub mod logging;
pub mod web;

pub use arcade::{GameMenu, GameVariant, MenuEntry};
pub use config::{ArcadeConfig, Tuning};
pub use engine::driver::{FrameScheduler, GameLoop, LoopOptions, ManualScheduler};
pub use engine::score::{HighScoreBook, HighScoreStore, MemoryStore};
pub use engine::{EndReason, GameSession, Phase, Tick, TickReport, step};
pub use error::ArcadeError;
pub use games::VariantDesc;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

/// JSON list of the games dialog entries: `[{ id, title, blurb, best }, ...]`.
/// Pass the same config as `ArcadeGame::new` so prefixed scores are found.
#[wasm_bindgen]
pub fn available_games(config_json: Option<String>) -> Result<String, JsValue> {
    let prefix = ArcadeConfig::from_optional_json(config_json.as_deref())?.storage_prefix;
    let book = HighScoreBook::with_prefix(web::high_score_store(), prefix);
    Ok(GameMenu::new(&book).to_json()?)
}

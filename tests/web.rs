// Browser-only tests: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use weather_arcade::web::{ArcadeMenu, LocalStorageStore};
use weather_arcade::{ArcadeError, HighScoreBook, HighScoreStore};

wasm_bindgen_test_configure!(run_in_browser);

fn storage() -> web_sys::Storage {
    web_sys::window().unwrap().local_storage().unwrap().unwrap()
}

#[wasm_bindgen_test]
fn local_storage_round_trips_scores() {
    let key = "test-arcade-round-trip";
    storage().remove_item(key).unwrap();
    let mut store = LocalStorageStore::open().unwrap();
    assert_eq!(store.read_high_score(key).unwrap(), 0);
    store.write_high_score(key, 42).unwrap();
    assert_eq!(store.read_high_score(key).unwrap(), 42);
    assert_eq!(storage().get_item(key).unwrap().as_deref(), Some("42"));
}

#[wasm_bindgen_test]
fn corrupt_value_reads_as_zero_through_the_book() {
    let key = "test-arcade-corrupt";
    storage().set_item(key, "lots").unwrap();
    let store = LocalStorageStore::open().unwrap();
    assert!(matches!(store.read_high_score(key), Err(ArcadeError::CorruptScore { .. })));
    let mut book = HighScoreBook::new(Box::new(store));
    assert_eq!(book.best(key), 0);
    assert_eq!(book.record(key, 3), 3);
    assert_eq!(storage().get_item(key).unwrap().as_deref(), Some("3"));
}

#[wasm_bindgen_test]
fn menu_routes_selection_to_a_game() {
    let mut menu = ArcadeMenu::new(None).unwrap();
    assert!(menu.entries().unwrap().contains(r#""id":"wind-surfer""#));
    assert!(menu.open("no-such-canvas").is_err(), "nothing selected yet");
    assert!(menu.select("pong").is_err());
    assert_eq!(menu.select("wind-surfer").unwrap(), "wind-surfer");
    assert_eq!(menu.selected().as_deref(), Some("wind-surfer"));
    menu.record("wind-surfer", 4_000_000).unwrap();
    assert!(menu.entries().unwrap().contains(r#""best":4000000"#));
    menu.close();
    assert_eq!(menu.selected(), None);
}

// Catalog and descriptor sanity checks for every shipped game.

use std::collections::HashSet;

use weather_arcade::games::{Role, Scoring};
use weather_arcade::{ArcadeConfig, GameMenu, GameVariant, HighScoreBook, MemoryStore};

#[test]
fn catalog_has_three_distinct_games() {
    let ids: Vec<_> = GameVariant::all().map(GameVariant::id).collect();
    assert_eq!(ids, ["lightning-dodge", "sunshine-collector", "wind-surfer"]);
    let keys: HashSet<_> = GameVariant::all().map(|v| v.descriptor().storage_key).collect();
    assert_eq!(keys.len(), 3);
}

#[test]
fn descriptors_are_playable() {
    for variant in GameVariant::all() {
        let desc = variant.descriptor();
        let name = desc.title;
        assert!(desc.bounds.contains(desc.player.start), "{name}: start outside bounds");
        assert!(desc.spawn.min_interval > 0.0, "{name}");
        assert!(desc.spawn.base_interval >= desc.spawn.min_interval, "{name}");
        assert!(desc.difficulty.cap >= 1 && desc.difficulty.secs_per_level >= 1, "{name}");
        assert!(desc.player.speed > 0.0 && desc.player.follow_rate > 0.0, "{name}");
        assert!(!desc.spawn.table.is_empty(), "{name}");
        for entry in &desc.spawn.table {
            assert!(entry.weight > 0 && entry.speed > 0.0, "{name}: {entry:?}");
        }
        assert!(desc.spawn.table.iter().any(|e| e.role == Role::Obstacle), "{name} can never end");
        if let Some(wind) = desc.wind {
            assert!(wind.min_speed <= wind.max_speed && wind.shift_every > 0.0, "{name}");
        }
        // only wind can carry the player past the bounds
        assert!(!desc.exit_on_boundary || desc.wind.is_some(), "{name}");
    }
}

#[test]
fn each_game_keeps_its_character() {
    let dodge = GameVariant::LightningDodge.descriptor();
    assert!(dodge.spawn.table.iter().all(|e| e.role == Role::Obstacle));
    assert_eq!(dodge.scoring, Scoring::Survival);
    assert_eq!(dodge.bounds.min.y, dodge.bounds.max.y, "umbrella moves sideways only");

    let sun = GameVariant::SunshineCollector.descriptor();
    assert!(sun.spawn.table.iter().any(|e| e.role == Role::Collectible));
    assert_eq!(sun.scoring, Scoring::SurvivalPlusBonus);

    let surf = GameVariant::WindSurfer.descriptor();
    assert!(surf.wind.is_some() && surf.exit_on_boundary);
    assert!(surf.bounds.max.y > surf.bounds.min.y, "surfer moves in two dimensions");
}

#[test]
fn games_dialog_reports_scores_under_the_configured_prefix() {
    let config = ArcadeConfig::from_json(r#"{ "storage_prefix": "guest:" }"#).unwrap();
    let key = GameVariant::WindSurfer.descriptor().storage_key;
    let store = MemoryStore::new().with(&format!("guest:{key}"), 17).with(key, 2);
    let book = HighScoreBook::with_prefix(Box::new(store), config.storage_prefix);
    let menu = GameMenu::new(&book);
    let surf = menu.entries().iter().find(|e| e.id == "wind-surfer").unwrap();
    assert_eq!(surf.best, 17);
    assert_eq!(surf.title, "Wind Surfer");
}

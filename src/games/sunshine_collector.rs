// Sunshine Collector: catch falling suns in the basket, stay clear of storm clouds.
use super::{
    DifficultyRule, PlayerRule, PlayerSprite, Role, SceneStyle, Scoring, SpawnEntry, SpawnRule,
    Sprite, VariantDesc,
};
use crate::arcade::GameVariant;
use crate::engine::geometry::{Bounds, Hitbox, Vec2};

pub const STORAGE_KEY: &str = "sunshine-collector-high-score";

const PLAYER_Y: f64 = 86.0;

pub fn descriptor() -> VariantDesc {
    VariantDesc {
        variant: GameVariant::SunshineCollector,
        title: "Sunshine Collector",
        blurb: "Catch the sunshine, avoid the storm clouds.",
        storage_key: STORAGE_KEY,
        player: PlayerRule {
            start: Vec2::new(50.0, PLAYER_Y),
            hitbox: Hitbox::Circle { radius: 5.0 },
            speed: 55.0,
            follow_rate: 10.0,
            sprite: PlayerSprite::Basket,
        },
        bounds: Bounds::new(Vec2::new(6.0, PLAYER_Y), Vec2::new(94.0, PLAYER_Y)),
        exit_on_boundary: false,
        scoring: Scoring::SurvivalPlusBonus,
        difficulty: DifficultyRule { secs_per_level: 8, cap: 10 },
        spawn: SpawnRule {
            base_interval: 0.9,
            per_level: 0.06,
            min_interval: 0.35,
            table: vec![
                SpawnEntry {
                    weight: 7,
                    role: Role::Collectible,
                    sprite: Sprite::Sun,
                    hitbox: Hitbox::Circle { radius: 4.0 },
                    speed: 20.0,
                    speed_per_level: 2.5,
                    lateral: 0.0,
                    spin: 1.5,
                    drift: 0.0,
                    zigzag: None,
                },
                SpawnEntry {
                    weight: 3,
                    role: Role::Obstacle,
                    sprite: Sprite::StormCloud,
                    hitbox: Hitbox::Circle { radius: 5.0 },
                    speed: 24.0,
                    speed_per_level: 3.0,
                    lateral: 4.0,
                    spin: 0.0,
                    drift: 0.0,
                    zigzag: Some(1.2),
                },
            ],
        },
        wind: None,
        scene: SceneStyle::Sunny,
    }
}

// Lightning Dodge: keep the umbrella out from under falling bolts.
use super::{
    DifficultyRule, PlayerRule, PlayerSprite, Role, SceneStyle, Scoring, SpawnEntry, SpawnRule,
    Sprite, VariantDesc,
};
use crate::arcade::GameVariant;
use crate::engine::geometry::{Bounds, Hitbox, Vec2};

pub const STORAGE_KEY: &str = "lightning-dodge-high-score";

const PLAYER_Y: f64 = 88.0;

pub fn descriptor() -> VariantDesc {
    VariantDesc {
        variant: GameVariant::LightningDodge,
        title: "Lightning Dodge",
        blurb: "Dodge the bolts as the storm builds.",
        storage_key: STORAGE_KEY,
        player: PlayerRule {
            start: Vec2::new(50.0, PLAYER_Y),
            hitbox: Hitbox::Circle { radius: 4.0 },
            speed: 60.0,
            follow_rate: 12.0,
            sprite: PlayerSprite::Umbrella,
        },
        bounds: Bounds::new(Vec2::new(6.0, PLAYER_Y), Vec2::new(94.0, PLAYER_Y)),
        exit_on_boundary: false,
        scoring: Scoring::Survival,
        difficulty: DifficultyRule { secs_per_level: 5, cap: 8 },
        spawn: SpawnRule {
            base_interval: 1.0,
            per_level: 0.09,
            min_interval: 0.3,
            table: vec![SpawnEntry {
                weight: 1,
                role: Role::Obstacle,
                sprite: Sprite::Bolt,
                hitbox: Hitbox::Box { half_w: 1.5, half_h: 6.0 },
                speed: 45.0,
                speed_per_level: 7.0,
                lateral: 6.0,
                spin: 0.0,
                drift: 0.0,
                zigzag: Some(0.2), // jagged fall
            }],
        },
        wind: None,
        scene: SceneStyle::Storm,
    }
}

// Wind Surfer: ride out shifting gusts without being blown off the water.
use super::{
    DifficultyRule, PlayerRule, PlayerSprite, Role, SceneStyle, Scoring, SpawnEntry, SpawnRule,
    Sprite, VariantDesc, WindRule,
};
use crate::arcade::GameVariant;
use crate::engine::geometry::{Bounds, Hitbox, Vec2};

pub const STORAGE_KEY: &str = "wind-surfer-high-score";

pub fn descriptor() -> VariantDesc {
    VariantDesc {
        variant: GameVariant::WindSurfer,
        title: "Wind Surfer",
        blurb: "Lean into the gusts and stay on the water.",
        storage_key: STORAGE_KEY,
        player: PlayerRule {
            start: Vec2::new(50.0, 75.0),
            hitbox: Hitbox::Circle { radius: 4.0 },
            speed: 45.0,
            follow_rate: 8.0,
            sprite: PlayerSprite::Surfer,
        },
        // Open water below the horizon; the side edges are where the wind wins.
        bounds: Bounds::new(Vec2::new(0.0, 55.0), Vec2::new(100.0, 90.0)),
        exit_on_boundary: true,
        scoring: Scoring::Survival,
        difficulty: DifficultyRule { secs_per_level: 6, cap: 8 },
        spawn: SpawnRule {
            base_interval: 1.4,
            per_level: 0.1,
            min_interval: 0.5,
            table: vec![
                SpawnEntry {
                    weight: 3,
                    role: Role::Obstacle,
                    sprite: Sprite::Rock,
                    hitbox: Hitbox::Circle { radius: 4.5 },
                    speed: 18.0,
                    speed_per_level: 3.0,
                    lateral: 0.0,
                    spin: 0.4,
                    drift: 0.4,
                    zigzag: None,
                },
                SpawnEntry {
                    weight: 1,
                    role: Role::Obstacle,
                    sprite: Sprite::Gull,
                    hitbox: Hitbox::Box { half_w: 3.0, half_h: 1.5 },
                    speed: 26.0,
                    speed_per_level: 3.0,
                    lateral: 10.0,
                    spin: 0.0,
                    drift: 0.8,
                    zigzag: Some(0.8),
                },
            ],
        },
        wind: Some(WindRule {
            min_speed: 6.0,
            max_speed: 16.0,
            shift_every: 3.5,
            push: 1.0,
        }),
        scene: SceneStyle::Sea,
    }
}

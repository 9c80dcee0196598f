//! Per-variant game descriptors.
//!
//! All three arcade games run on the same engine; what differs between them is
//! captured here as plain data. Each variant lives in its own file and exposes a
//! `descriptor()` builder returning an owned [`VariantDesc`], so config overrides
//! and tests can adjust any field without touching the engine.

use crate::arcade::GameVariant;
use crate::engine::geometry::{Bounds, Hitbox, Vec2};

pub mod lightning_dodge;
pub mod sunshine_collector;
pub mod wind_surfer;

// --- Entities ----------------------------------------------------------------

/// Whether touching an entity ends the session or scores a bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Obstacle,
    Collectible,
}

/// Visual identity of an entity; the renderer picks its drawing from this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Bolt,
    Sun,
    StormCloud,
    Rock,
    Gull,
}

/// One row of a variant's spawn table.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnEntry {
    pub weight: u32, // relative chance against the other rows
    pub role: Role,
    pub sprite: Sprite,
    pub hitbox: Hitbox,
    pub speed: f64,           // fall speed at difficulty 1 (units / s)
    pub speed_per_level: f64, // added per difficulty level above 1
    pub lateral: f64,         // max initial sideways speed, sign is random
    pub spin: f64,            // max rotation speed (rad / s), sign is random
    pub drift: f64,           // share of the wind applied to this entity
    pub zigzag: Option<f64>,  // flip sideways velocity every N seconds
}

// --- Rules -------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRule {
    pub base_interval: f64, // seconds between spawns at difficulty 1
    pub per_level: f64,     // interval shrink per difficulty level
    pub min_interval: f64,  // floor; always > 0
    pub table: Vec<SpawnEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyRule {
    pub secs_per_level: u32,
    pub cap: u32,
}

/// Lateral wind that shifts direction and strength periodically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindRule {
    pub min_speed: f64,
    pub max_speed: f64,
    pub shift_every: f64, // seconds between re-draws
    pub push: f64,        // share of the wind applied to the player
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerSprite {
    Umbrella,
    Basket,
    Surfer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerRule {
    pub start: Vec2,
    pub hitbox: Hitbox,
    pub speed: f64,       // key steering speed (units / s)
    pub follow_rate: f64, // pointer pull rate (1 / s)
    pub sprite: PlayerSprite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scoring {
    /// Whole seconds survived.
    Survival,
    /// Whole seconds survived plus collected items.
    SurvivalPlusBonus,
}

impl Scoring {
    pub fn total(self, elapsed: u32, bonus: u32) -> u32 {
        match self {
            Scoring::Survival => elapsed,
            Scoring::SurvivalPlusBonus => elapsed.saturating_add(bonus),
        }
    }
}

/// Background palette and ambient decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneStyle {
    Storm,
    Sunny,
    Sea,
}

/// Everything that makes one arcade game differ from the others.
#[derive(Clone, Debug, PartialEq)]
pub struct VariantDesc {
    pub variant: GameVariant,
    pub title: &'static str,
    pub blurb: &'static str,
    pub storage_key: &'static str,
    pub player: PlayerRule,
    /// Playable area for the player. A zero-height band locks vertical movement.
    pub bounds: Bounds,
    /// Leaving `bounds` under wind ends the session instead of being clamped away.
    pub exit_on_boundary: bool,
    pub scoring: Scoring,
    pub difficulty: DifficultyRule,
    pub spawn: SpawnRule,
    pub wind: Option<WindRule>,
    pub scene: SceneStyle,
}

impl VariantDesc {
    /// Same rules, nothing ever spawns. Handy for scripted sessions.
    pub fn without_spawns(mut self) -> Self {
        self.spawn.table.clear();
        self
    }
}

//! Host-supplied arcade settings.
//!
//! Parsed from the optional JSON string handed to `ArcadeGame::new`. Every field
//! has a default, so `{}` is a valid config.
//!
//! ```json
//! {
//!   "max_frame_delta_ms": 100,
//!   "storage_prefix": "guest:",
//!   "tuning": { "wind-surfer": { "wind_max": 10.0, "difficulty_cap": 5 } }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::arcade::GameVariant;
use crate::engine::driver::{DEFAULT_MAX_FRAME_DELTA, LoopOptions};
use crate::error::ArcadeError;
use crate::games::VariantDesc;

fn default_max_frame_delta_ms() -> f64 {
    DEFAULT_MAX_FRAME_DELTA * 1000.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArcadeConfig {
    /// Upper bound on one simulated step.
    pub max_frame_delta_ms: f64,
    pub seed: Option<u64>,
    pub storage_prefix: String,
    /// Per-game overrides keyed by game id (`"lightning-dodge"`, ...).
    pub tuning: BTreeMap<String, Tuning>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: default_max_frame_delta_ms(),
            seed: None,
            storage_prefix: String::new(),
            tuning: BTreeMap::new(),
        }
    }
}

/// Optional overrides for one game's tuning constants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub spawn_interval: Option<f64>,
    pub spawn_interval_per_level: Option<f64>,
    pub min_spawn_interval: Option<f64>,
    pub secs_per_level: Option<u32>,
    pub difficulty_cap: Option<u32>,
    pub player_speed: Option<f64>,
    pub follow_rate: Option<f64>,
    pub wind_min: Option<f64>,
    pub wind_max: Option<f64>,
    pub wind_shift_every: Option<f64>,
}

impl ArcadeConfig {
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let config: ArcadeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// A blank or absent document means the defaults.
    pub fn from_optional_json(json: Option<&str>) -> Result<Self, ArcadeError> {
        match json.map(str::trim) {
            Some(json) if !json.is_empty() => Self::from_json(json),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ArcadeError> {
        if !(self.max_frame_delta_ms.is_finite() && self.max_frame_delta_ms > 0.0) {
            return Err(ArcadeError::InvalidSetting {
                field: "max_frame_delta_ms",
                reason: "must be a positive number of milliseconds",
            });
        }
        for id in self.tuning.keys() {
            self.descriptor(GameVariant::parse(id)?)?;
        }
        Ok(())
    }

    /// The variant's descriptor with this config's overrides applied.
    pub fn descriptor(&self, variant: GameVariant) -> Result<VariantDesc, ArcadeError> {
        let mut desc = variant.descriptor();
        if let Some(tuning) = self.tuning.get(variant.id()) {
            tuning.apply(&mut desc)?;
        }
        Ok(desc)
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            max_frame_delta_secs: self.max_frame_delta_ms / 1000.0,
            seed: self.seed,
            storage_prefix: self.storage_prefix.clone(),
        }
    }
}

impl Tuning {
    pub fn apply(&self, desc: &mut VariantDesc) -> Result<(), ArcadeError> {
        let id = desc.variant.id();
        let fail = |reason| ArcadeError::Tuning { variant: id.to_owned(), reason };

        let spawn = &mut desc.spawn;
        if let Some(v) = self.spawn_interval {
            spawn.base_interval = positive(v).ok_or_else(|| fail("spawn_interval must be positive"))?;
        }
        if let Some(v) = self.spawn_interval_per_level {
            spawn.per_level = non_negative(v).ok_or_else(|| fail("spawn_interval_per_level must not be negative"))?;
        }
        if let Some(v) = self.min_spawn_interval {
            spawn.min_interval = positive(v).ok_or_else(|| fail("min_spawn_interval must be positive"))?;
        }
        if spawn.min_interval > spawn.base_interval {
            return Err(fail("min_spawn_interval exceeds spawn_interval"));
        }

        if let Some(v) = self.secs_per_level {
            if v == 0 {
                return Err(fail("secs_per_level must be at least 1"));
            }
            desc.difficulty.secs_per_level = v;
        }
        if let Some(v) = self.difficulty_cap {
            if v == 0 {
                return Err(fail("difficulty_cap must be at least 1"));
            }
            desc.difficulty.cap = v;
        }

        if let Some(v) = self.player_speed {
            desc.player.speed = non_negative(v).ok_or_else(|| fail("player_speed must not be negative"))?;
        }
        if let Some(v) = self.follow_rate {
            desc.player.follow_rate = positive(v).ok_or_else(|| fail("follow_rate must be positive"))?;
        }

        let wants_wind = self.wind_min.is_some() || self.wind_max.is_some() || self.wind_shift_every.is_some();
        if wants_wind {
            let Some(wind) = desc.wind.as_mut() else {
                return Err(fail("this game has no wind"));
            };
            if let Some(v) = self.wind_min {
                wind.min_speed = non_negative(v).ok_or_else(|| fail("wind_min must not be negative"))?;
            }
            if let Some(v) = self.wind_max {
                wind.max_speed = non_negative(v).ok_or_else(|| fail("wind_max must not be negative"))?;
            }
            if let Some(v) = self.wind_shift_every {
                wind.shift_every = positive(v).ok_or_else(|| fail("wind_shift_every must be positive"))?;
            }
            if wind.min_speed > wind.max_speed {
                return Err(fail("wind_min exceeds wind_max"));
            }
        }
        Ok(())
    }
}

fn positive(v: f64) -> Option<f64> {
    (v.is_finite() && v > 0.0).then_some(v)
}

fn non_negative(v: f64) -> Option<f64> {
    (v.is_finite() && v >= 0.0).then_some(v)
}

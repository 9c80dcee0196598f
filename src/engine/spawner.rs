//! Time-driven entity spawner.

use std::f64::consts::TAU;

use super::Entity;
use super::geometry::{FIELD, Vec2};
use crate::games::{SpawnEntry, SpawnRule};

/// Entities never fall slower than this, whatever the tuning says.
const MIN_FALL_SPEED: f64 = 1.0;

/// Seconds between spawns at `difficulty`; shrinks per level down to the floor.
pub fn spawn_interval(rule: &SpawnRule, difficulty: u32) -> f64 {
    let levels_above_base = difficulty.saturating_sub(1) as f64;
    (rule.base_interval - rule.per_level * levels_above_base).max(rule.min_interval)
}

/// Advance the spawn accumulator by `dt`; returns the new entity when one is due.
///
/// At most one entity per call, and the accumulator restarts from zero after a
/// spawn, so two spawns are always at least one interval of simulated time apart.
pub fn advance(
    rule: &SpawnRule,
    timer: &mut f64,
    dt: f64,
    difficulty: u32,
    next_id: &mut u32,
    rng: &mut fastrand::Rng,
) -> Option<Entity> {
    if rule.table.is_empty() {
        return None;
    }
    *timer += dt;
    if *timer < spawn_interval(rule, difficulty) {
        return None;
    }
    let entry = pick_entry(&rule.table, rng)?;
    *timer = 0.0;
    let id = *next_id;
    *next_id = next_id.wrapping_add(1);
    Some(spawn_entity(entry, difficulty, id, rng))
}

/// Weighted pick over the spawn table. `None` when every weight is zero.
pub fn pick_entry<'a>(table: &'a [SpawnEntry], rng: &mut fastrand::Rng) -> Option<&'a SpawnEntry> {
    let total: u32 = table.iter().map(|e| e.weight).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.u32(0..total);
    for entry in table {
        if roll < entry.weight {
            return Some(entry);
        }
        roll -= entry.weight;
    }
    None
}

fn spawn_entity(entry: &SpawnEntry, difficulty: u32, id: u32, rng: &mut fastrand::Rng) -> Entity {
    let extent = entry.hitbox.extent();
    let span = (FIELD - 2.0 * extent).max(0.0);
    let x = extent + rng.f64() * span;
    let level = difficulty.saturating_sub(1) as f64;
    let fall = (entry.speed + entry.speed_per_level * level).max(MIN_FALL_SPEED);
    let lateral = signed(rng, entry.lateral);
    let spin = signed(rng, entry.spin);
    Entity {
        id,
        role: entry.role,
        sprite: entry.sprite,
        pos: Vec2::new(x, -extent), // just above the visible field
        vel: Vec2::new(lateral, fall),
        rotation: if spin != 0.0 { rng.f64() * TAU } else { 0.0 },
        spin,
        hitbox: entry.hitbox,
        drift: entry.drift,
        zigzag: entry.zigzag,
        flip_in: entry.zigzag.unwrap_or(0.0),
    }
}

/// Uniform in `[-max, max]`, or exactly zero when `max` is not positive.
fn signed(rng: &mut fastrand::Rng, max: f64) -> f64 {
    if max > 0.0 { (rng.f64() * 2.0 - 1.0) * max } else { 0.0 }
}

//! Kinematics, wind, player movement and contact resolution.
//!
//! All math runs in the normalized 0-100 space, so canvas size never changes a
//! collision outcome.

use std::f64::consts::TAU;

use super::Entity;
use super::geometry::{Bounds, FIELD, Hitbox, Vec2, overlaps};
use super::input::Control;
use crate::games::{PlayerRule, Role, WindRule};

// --- Wind ----------------------------------------------------------------------

/// Random wind velocity: magnitude in `[min_speed, max_speed]`, random direction.
pub fn draw_wind(rule: &WindRule, rng: &mut fastrand::Rng) -> f64 {
    let spread = (rule.max_speed - rule.min_speed).max(0.0);
    let magnitude = rule.min_speed + rng.f64() * spread;
    if rng.bool() { magnitude } else { -magnitude }
}

/// Count down to the next gust change and re-draw the wind when it is due.
pub fn advance_wind(
    wind: &mut f64,
    shift_in: &mut f64,
    rule: &WindRule,
    dt: f64,
    rng: &mut fastrand::Rng,
) {
    *shift_in -= dt;
    if *shift_in <= 0.0 {
        *wind = draw_wind(rule, rng);
        *shift_in = rule.shift_every;
    }
}

// --- Player --------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerMove {
    /// Always inside the playable bounds.
    pub position: Vec2,
    /// The wind carried the player past the bounds this frame.
    pub left_bounds: bool,
}

/// Apply the control signal, clamp, then apply the wind push.
///
/// Steering alone can never leave the bounds; only `push` can, and that is what
/// `left_bounds` reports. The returned position is clamped either way.
pub fn move_player(
    rule: &PlayerRule,
    bounds: &Bounds,
    from: Vec2,
    control: &Control,
    push: f64,
    dt: f64,
) -> PlayerMove {
    let steered = match *control {
        Control::Idle => from,
        Control::Steer { dx, dy } => {
            Vec2::new(from.x + dx * rule.speed * dt, from.y + dy * rule.speed * dt)
        }
        Control::Seek(target) => {
            // Exponential approach: frame-rate independent and never a jump.
            let pull = 1.0 - (-rule.follow_rate * dt).exp();
            from.lerp(target, pull)
        }
    };
    let steered = bounds.clamp(steered);
    let pushed = Vec2::new(steered.x + push * dt, steered.y);
    PlayerMove {
        position: bounds.clamp(pushed),
        left_bounds: !bounds.contains(pushed),
    }
}

// --- Entities ------------------------------------------------------------------

pub fn advance_entities(entities: &mut [Entity], wind: f64, dt: f64) {
    for e in entities.iter_mut() {
        e.pos.x += (e.vel.x + wind * e.drift) * dt;
        e.pos.y += e.vel.y * dt;
        if e.spin != 0.0 {
            e.rotation = (e.rotation + e.spin * dt).rem_euclid(TAU);
        }
        if let Some(period) = e.zigzag {
            e.flip_in -= dt;
            if e.flip_in <= 0.0 {
                e.vel.x = -e.vel.x;
                e.flip_in = period;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    pub collected: u32,
    pub hit: bool,
}

/// Remove every entity touching the player; count collectibles, flag obstacles.
pub fn resolve_contacts(player: Vec2, hitbox: Hitbox, entities: &mut Vec<Entity>) -> Contacts {
    let mut contacts = Contacts::default();
    entities.retain(|e| {
        if !overlaps(player, hitbox, e.pos, e.hitbox) {
            return true;
        }
        match e.role {
            Role::Collectible => contacts.collected += 1,
            Role::Obstacle => contacts.hit = true,
        }
        false
    });
    contacts
}

/// Drop entities that are fully past the bottom or either side of the field.
pub fn prune(entities: &mut Vec<Entity>) -> usize {
    let before = entities.len();
    entities.retain(|e| {
        let extent = e.hitbox.extent();
        e.pos.y - extent <= FIELD && e.pos.x + extent >= 0.0 && e.pos.x - extent <= FIELD
    });
    before - entities.len()
}

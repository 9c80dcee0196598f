//! Shared real-time engine for the arcade games.
//!
//! A session is an explicit value ([`GameSession`]) and one frame of gameplay is
//! the pure reducer [`step`]: it takes the session by value together with the
//! sampled control signal and the frame timing, and hands back the next session
//! plus a small [`TickReport`]. Scheduling, persistence and drawing live in
//! [`driver`], [`score`] and [`render`] so the reducer stays testable without a
//! browser.

pub mod driver;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod render;
pub mod score;
pub mod spawner;

use tracing::debug;

use crate::games::{Role, Sprite, VariantDesc};
use geometry::{Hitbox, Vec2};
use input::Control;

// --- Session -------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Ended,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Ended => "ended",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// Player touched an obstacle.
    Collision,
    /// Wind carried the player past the playable bounds.
    LeftBounds,
    /// Host stopped the session; no score is reported.
    Aborted,
}

/// A spawned obstacle or collectible.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub role: Role,
    pub sprite: Sprite,
    pub pos: Vec2,
    pub vel: Vec2, // units / s, y always > 0 for spawned entities
    pub rotation: f64,
    pub spin: f64,
    pub hitbox: Hitbox,
    pub drift: f64,
    pub zigzag: Option<f64>,
    pub flip_in: f64, // seconds until the next zig-zag flip
}

impl Entity {
    /// A motionless entity; the spawner fills in kinematics for real spawns.
    pub fn new(role: Role, sprite: Sprite, pos: Vec2, hitbox: Hitbox) -> Self {
        Self {
            id: 0,
            role,
            sprite,
            pos,
            vel: Vec2::default(),
            rotation: 0.0,
            spin: 0.0,
            hitbox,
            drift: 0.0,
            zigzag: None,
            flip_in: 0.0,
        }
    }
}

/// Per-session game state. Owned by the running game; replaced on every start.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub phase: Phase,
    pub player: Vec2,
    /// Whole seconds since the session's first frame (wall clock).
    pub elapsed_score: u32,
    /// Collected items; only contact events change it.
    pub bonus_score: u32,
    pub difficulty: u32,
    pub entities: Vec<Entity>,
    pub wind: f64,
    pub wind_shift_in: f64,
    pub spawn_timer: f64,
    /// Sum of simulated (clamped) frame deltas.
    pub sim_time: f64,
    /// Timestamp of the first frame; anchors `elapsed_score`.
    pub started_ms: Option<f64>,
    pub end_reason: Option<EndReason>,
    next_id: u32,
    rng: fastrand::Rng,
}

impl GameSession {
    /// Fresh Idle session: player at the start position, scores zeroed,
    /// difficulty at baseline, no entities.
    pub fn new(desc: &VariantDesc, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let (wind, wind_shift_in) = match &desc.wind {
            Some(rule) => (physics::draw_wind(rule, &mut rng), rule.shift_every),
            None => (0.0, f64::INFINITY),
        };
        Self {
            phase: Phase::Idle,
            player: desc.bounds.clamp(desc.player.start),
            elapsed_score: 0,
            bonus_score: 0,
            difficulty: 1,
            entities: Vec::new(),
            wind,
            wind_shift_in,
            spawn_timer: 0.0,
            sim_time: 0.0,
            started_ms: None,
            end_reason: None,
            next_id: 1,
            rng,
        }
    }

    pub fn total_score(&self, desc: &VariantDesc) -> u32 {
        desc.scoring.total(self.elapsed_score, self.bonus_score)
    }
}

// --- Reducer -------------------------------------------------------------------

/// Timing of one frame: host timestamp and the clamped simulation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub now_ms: f64,
    pub dt: f64, // seconds
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: u32,
    pub collected: u32,
    pub pruned: u32,
    /// Final total score when this frame ended the session.
    pub ended: Option<u32>,
}

/// Advance a running session by one frame.
///
/// Order: score clock and difficulty, player movement (input, then wind and the
/// boundary check), spawn timer, entity kinematics, contacts, pruning. Sessions
/// that are not Running come back untouched.
pub fn step(
    desc: &VariantDesc,
    mut session: GameSession,
    control: &Control,
    tick: Tick,
) -> (GameSession, TickReport) {
    let mut report = TickReport::default();
    if session.phase != Phase::Running {
        return (session, report);
    }
    let dt = if tick.dt.is_finite() { tick.dt.max(0.0) } else { 0.0 };
    let anchor = *session.started_ms.get_or_insert(tick.now_ms);
    session.sim_time += dt;

    // Score clock & difficulty escalation
    session.elapsed_score = score::elapsed_score(anchor, tick.now_ms).max(session.elapsed_score);
    session.difficulty =
        score::difficulty_for(&desc.difficulty, session.elapsed_score).max(session.difficulty);

    // Player: input first, then wind
    let push = match &desc.wind {
        Some(rule) => {
            physics::advance_wind(
                &mut session.wind,
                &mut session.wind_shift_in,
                rule,
                dt,
                &mut session.rng,
            );
            session.wind * rule.push
        }
        None => 0.0,
    };
    let moved = physics::move_player(&desc.player, &desc.bounds, session.player, control, push, dt);
    session.player = moved.position;
    if moved.left_bounds && desc.exit_on_boundary {
        return finish(desc, session, EndReason::LeftBounds, report);
    }

    // Spawns
    if let Some(entity) = spawner::advance(
        &desc.spawn,
        &mut session.spawn_timer,
        dt,
        session.difficulty,
        &mut session.next_id,
        &mut session.rng,
    ) {
        session.entities.push(entity);
        report.spawned = 1;
    }

    // Entities & contacts
    physics::advance_entities(&mut session.entities, session.wind, dt);
    let contacts =
        physics::resolve_contacts(session.player, desc.player.hitbox, &mut session.entities);
    session.bonus_score += contacts.collected;
    report.collected = contacts.collected;
    if contacts.hit {
        return finish(desc, session, EndReason::Collision, report);
    }
    report.pruned = physics::prune(&mut session.entities) as u32;

    (session, report)
}

fn finish(
    desc: &VariantDesc,
    mut session: GameSession,
    reason: EndReason,
    mut report: TickReport,
) -> (GameSession, TickReport) {
    session.phase = Phase::Ended;
    session.end_reason = Some(reason);
    let total = session.total_score(desc);
    debug!(
        game = %desc.variant,
        ?reason,
        elapsed = session.elapsed_score,
        bonus = session.bonus_score,
        total,
        "session ended"
    );
    report.ended = Some(total);
    (session, report)
}

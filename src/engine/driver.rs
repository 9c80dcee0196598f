//! Game loop driver: frame scheduling and the Idle/Running/Ended machine.
//!
//! [`GameLoop`] owns one [`GameSession`] behind `Rc<RefCell<_>>`. Every frame
//! callback holds only weak handles plus the generation it was scheduled for,
//! so a frame that fires after `abort()`, a restart, or after the loop was
//! dropped does nothing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use super::geometry::Vec2;
use super::input::{InputSampler, Key, is_start_key};
use super::render::{SceneView, Surface, render_scene};
use super::score::{HighScoreBook, HighScoreStore};
use super::{EndReason, GameSession, Phase, Tick, step};
use crate::arcade::GameVariant;
use crate::games::VariantDesc;

/// Default upper bound on one simulated step, in seconds.
pub const DEFAULT_MAX_FRAME_DELTA: f64 = 0.1;

pub type FrameCallback = Box<dyn FnOnce(f64)>;
pub type EndCallback = Box<dyn FnMut(u32)>;

/// The end callback plus a version bumped on every install or clear, so a
/// change made from inside the running callback is not undone.
#[derive(Default)]
struct EndSlot {
    callback: Option<EndCallback>,
    version: u64,
}

impl EndSlot {
    fn set(&mut self, callback: Option<EndCallback>) {
        self.callback = callback;
        self.version = self.version.wrapping_add(1);
    }
}

// --- Scheduling ----------------------------------------------------------------

/// "Run this before the next repaint". The callback receives a monotonic
/// timestamp in milliseconds. Returns `false` when the frame could not be queued.
pub trait FrameScheduler {
    fn schedule(&self, frame: FrameCallback) -> bool;
}

/// Scheduler driven by hand; frames run only when the test says so.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the oldest queued frame at `timestamp_ms`. `false` if none was queued.
    pub fn run_frame(&self, timestamp_ms: f64) -> bool {
        // pop first: the frame usually schedules its successor
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(frame) => {
                frame(timestamp_ms);
                true
            }
            None => false,
        }
    }

    /// Run frames at `start_ms`, `start_ms + step_ms`, ... until the queue runs
    /// dry or `count` frames ran. Returns the timestamp of the next frame slot.
    pub fn run_frames(&self, start_ms: f64, step_ms: f64, count: usize) -> f64 {
        let mut now = start_ms;
        for _ in 0..count {
            if !self.run_frame(now) {
                break;
            }
            now += step_ms;
        }
        now
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&self, frame: FrameCallback) -> bool {
        self.queue.borrow_mut().push_back(frame);
        true
    }
}

/// Turns frame timestamps into clamped deltas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    max_delta: f64,
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(max_delta_secs: f64) -> Self {
        Self { max_delta: max_delta_secs.max(0.0), last_ms: None }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Seconds since the previous timestamp, within `[0, max_delta]`. The first
    /// call after a reset returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_ms {
            Some(prev) => ((now_ms - prev) / 1000.0).clamp(0.0, self.max_delta),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }
}

// --- Loop ----------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct LoopOptions {
    pub max_frame_delta_secs: f64,
    /// Fixed seed for reproducible sessions; random when `None`.
    pub seed: Option<u64>,
    /// Prepended to every high-score storage key.
    pub storage_prefix: String,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            max_frame_delta_secs: DEFAULT_MAX_FRAME_DELTA,
            seed: None,
            storage_prefix: String::new(),
        }
    }
}

struct LoopState {
    desc: VariantDesc,
    session: GameSession,
    input: InputSampler,
    clock: FrameClock,
    book: HighScoreBook,
    high_score: u32,
    new_best: bool,
    disabled: bool,
    generation: u64,
    seeds: fastrand::Rng,
    surface: Option<Box<dyn Surface>>,
    last_now_ms: f64,
}

impl LoopState {
    fn fresh_session(&mut self) -> GameSession {
        GameSession::new(&self.desc, self.seeds.u64(..))
    }

    fn draw(&mut self, now_ms: f64) {
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };
        let view = SceneView {
            session: &self.session,
            high_score: self.high_score,
            new_best: self.new_best,
            locked: self.disabled,
            now_ms,
        };
        render_scene(surface, &self.desc, &view);
    }

    /// End a running session without a score report. Pending frames become
    /// no-ops.
    fn halt(&mut self) {
        self.session.phase = Phase::Ended;
        self.session.end_reason = Some(EndReason::Aborted);
        self.input.clear();
        self.generation = self.generation.wrapping_add(1);
        let now = self.last_now_ms;
        self.draw(now);
    }
}

/// One arcade game bound to a scheduler and a high-score store.
///
/// Cloning yields another handle to the same game.
#[derive(Clone)]
pub struct GameLoop {
    state: Rc<RefCell<LoopState>>,
    scheduler: Rc<dyn FrameScheduler>,
    on_end: Rc<RefCell<EndSlot>>,
}

impl GameLoop {
    pub fn new(
        desc: VariantDesc,
        scheduler: Rc<dyn FrameScheduler>,
        store: Box<dyn HighScoreStore>,
    ) -> Self {
        Self::with_options(desc, scheduler, store, LoopOptions::default())
    }

    pub fn with_options(
        desc: VariantDesc,
        scheduler: Rc<dyn FrameScheduler>,
        store: Box<dyn HighScoreStore>,
        options: LoopOptions,
    ) -> Self {
        let book = HighScoreBook::with_prefix(store, options.storage_prefix);
        let high_score = book.best(desc.storage_key);
        let mut seeds = match options.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let session = GameSession::new(&desc, seeds.u64(..));
        debug!(game = %desc.variant, high_score, "game mounted");
        let state = LoopState {
            desc,
            session,
            input: InputSampler::new(),
            clock: FrameClock::new(options.max_frame_delta_secs),
            book,
            high_score,
            new_best: false,
            disabled: false,
            generation: 0,
            seeds,
            surface: None,
            last_now_ms: 0.0,
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            scheduler,
            on_end: Rc::new(RefCell::new(EndSlot::default())),
        }
    }

    /// Attach the drawing surface and paint the current screen.
    pub fn set_surface(&self, surface: Box<dyn Surface>) {
        let mut st = self.state.borrow_mut();
        st.surface = Some(surface);
        let now = st.last_now_ms;
        st.draw(now);
    }

    /// Called with the final score once per completed session. Replaces any
    /// earlier callback.
    pub fn on_game_end(&self, callback: impl FnMut(u32) + 'static) {
        self.on_end.borrow_mut().set(Some(Box::new(callback)));
    }

    pub fn clear_game_end(&self) {
        self.on_end.borrow_mut().set(None);
    }

    /// A disabled game shows the locked screen and refuses to start. A session
    /// already running is left alone.
    pub fn set_disabled(&self, disabled: bool) {
        let mut st = self.state.borrow_mut();
        st.disabled = disabled;
        if st.session.phase != Phase::Running {
            let now = st.last_now_ms;
            st.draw(now);
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    /// Begin a fresh session. Accepted from Idle or Ended when not disabled.
    pub fn start(&self) -> bool {
        let generation = {
            let mut guard = self.state.borrow_mut();
            let st = &mut *guard;
            if st.disabled || st.session.phase == Phase::Running {
                debug!(game = %st.desc.variant, phase = st.session.phase.as_str(), disabled = st.disabled, "start refused");
                return false;
            }
            // Ended goes back through a fresh Idle session before running.
            st.session = st.fresh_session();
            st.session.phase = Phase::Running;
            st.input.clear();
            st.clock.reset();
            st.high_score = st.book.best(st.desc.storage_key);
            st.new_best = false;
            st.generation = st.generation.wrapping_add(1);
            if st.surface.is_none() {
                warn!(game = %st.desc.variant, "no surface attached; frames will not be drawn");
            }
            debug!(game = %st.desc.variant, generation = st.generation, "session started");
            st.generation
        };
        if !self.link().schedule(generation) {
            let mut st = self.state.borrow_mut();
            warn!(game = %st.desc.variant, "could not schedule the first frame");
            if st.generation == generation && st.session.phase == Phase::Running {
                st.halt();
            }
            return false;
        }
        true
    }

    /// Stop a running session without reporting a score or touching the high
    /// score. Pending frames become no-ops.
    pub fn abort(&self) -> bool {
        let mut st = self.state.borrow_mut();
        if st.session.phase != Phase::Running {
            return false;
        }
        st.halt();
        debug!(game = %st.desc.variant, "session aborted");
        true
    }

    /// Back from the game-over screen to the idle screen.
    pub fn reset(&self) -> bool {
        let mut st = self.state.borrow_mut();
        if st.session.phase != Phase::Ended {
            return false;
        }
        st.session = st.fresh_session();
        let now = st.last_now_ms;
        st.draw(now);
        true
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().session.phase
    }

    /// Current total score (frozen once the session ended).
    pub fn score(&self) -> u32 {
        let st = self.state.borrow();
        st.session.total_score(&st.desc)
    }

    pub fn high_score(&self) -> u32 {
        self.state.borrow().high_score
    }

    pub fn variant(&self) -> GameVariant {
        self.state.borrow().desc.variant
    }

    pub fn snapshot(&self) -> GameSession {
        self.state.borrow().session.clone()
    }

    /// Direct access to the live session, for scripted scenarios.
    pub fn with_session<R>(&self, f: impl FnOnce(&mut GameSession) -> R) -> R {
        f(&mut self.state.borrow_mut().session)
    }

    /// Feed a `KeyboardEvent.key`. Returns `true` when the key was used, so the
    /// host can suppress the browser default (page scrolling).
    pub fn key_down(&self, key: &str) -> bool {
        if is_start_key(key) {
            // swallowed while playing so Space does not scroll the page
            return self.phase() == Phase::Running || self.start();
        }
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        let mut st = self.state.borrow_mut();
        if st.session.phase != Phase::Running {
            return false;
        }
        st.input.press(key);
        true
    }

    pub fn key_up(&self, key: &str) {
        if let Some(key) = Key::from_dom(key) {
            self.state.borrow_mut().input.release(key);
        }
    }

    /// Pointer position already normalized to the 0-100 field.
    pub fn pointer_at(&self, at: Vec2) {
        let mut st = self.state.borrow_mut();
        if st.session.phase == Phase::Running {
            st.input.point(at);
        }
    }

    pub fn pointer_up(&self) {
        self.state.borrow_mut().input.lift_pointer();
    }

    /// Repaint the current screen (after a resize, for example).
    pub fn redraw(&self) {
        let mut st = self.state.borrow_mut();
        let now = st.last_now_ms;
        st.draw(now);
    }

    fn link(&self) -> Link {
        Link {
            state: Rc::downgrade(&self.state),
            on_end: Rc::downgrade(&self.on_end),
            scheduler: Rc::downgrade(&self.scheduler),
        }
    }
}

impl std::fmt::Debug for GameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("GameLoop")
            .field("variant", &st.desc.variant)
            .field("phase", &st.session.phase)
            .field("generation", &st.generation)
            .finish_non_exhaustive()
    }
}

// --- Frames --------------------------------------------------------------------

/// Weak handles carried by a pending frame.
#[derive(Clone)]
struct Link {
    state: Weak<RefCell<LoopState>>,
    on_end: Weak<RefCell<EndSlot>>,
    scheduler: Weak<dyn FrameScheduler>,
}

impl Link {
    fn schedule(&self, generation: u64) -> bool {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return false;
        };
        let link = self.clone();
        scheduler.schedule(Box::new(move |now_ms| run_frame(&link, generation, now_ms)))
    }
}

fn run_frame(link: &Link, generation: u64, now_ms: f64) {
    let Some(state) = link.state.upgrade() else {
        return;
    };
    let ended = {
        let mut guard = state.borrow_mut();
        let st = &mut *guard;
        if st.generation != generation || st.session.phase != Phase::Running {
            return;
        }
        let dt = st.clock.advance(now_ms);
        let control = st.input.sample();
        let current = std::mem::replace(&mut st.session, GameSession::new(&st.desc, 0));
        let (next, report) = step(&st.desc, current, &control, Tick { now_ms, dt });
        st.session = next;
        st.last_now_ms = now_ms;

        if let Some(total) = report.ended {
            st.input.clear();
            let previous = st.high_score;
            st.high_score = st.book.record(st.desc.storage_key, total);
            st.new_best = total > previous;
            info!(
                game = %st.desc.variant,
                total,
                best = st.high_score,
                reason = ?st.session.end_reason,
                "game over"
            );
        }
        st.draw(now_ms);
        report.ended
    };

    match ended {
        Some(total) => notify(&link.on_end, total),
        None => {
            if !link.schedule(generation) {
                let mut st = state.borrow_mut();
                warn!(game = %st.desc.variant, "frame scheduling failed; session halted");
                if st.generation == generation && st.session.phase == Phase::Running {
                    st.halt();
                }
            }
        }
    }
}

/// Invoke the end callback with no borrow held, so it may restart the game or
/// install a new callback.
fn notify(slot: &Weak<RefCell<EndSlot>>, total: u32) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let (taken, version) = {
        let mut current = slot.borrow_mut();
        (current.callback.take(), current.version)
    };
    if let Some(mut callback) = taken {
        callback(total);
        let mut current = slot.borrow_mut();
        if current.version == version {
            current.callback = Some(callback);
        }
    }
}

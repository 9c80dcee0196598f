//! Input sampling: DOM events are recorded here and read once per tick.

use std::collections::BTreeSet;

use super::geometry::{Bounds, Vec2};

/// Discrete steering keys. Several DOM key names map to each one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Map a `KeyboardEvent.key` value to a steering key.
    pub fn from_dom(key: &str) -> Option<Key> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            _ => None,
        }
    }
}

/// Keys that start a session from the idle or game-over screen.
pub fn is_start_key(key: &str) -> bool {
    matches!(key, " " | "Spacebar" | "Enter")
}

/// The control signal one tick consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    Idle,
    /// Constant-speed steering; each component is -1, 0 or 1.
    Steer { dx: f64, dy: f64 },
    /// Pull toward a normalized pointer position.
    Seek(Vec2),
}

#[derive(Clone, Debug, Default)]
pub struct InputSampler {
    pressed: BTreeSet<Key>,
    pointer: Option<Vec2>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// Record a pointer/touch position, already normalized to 0-100.
    pub fn point(&mut self, at: Vec2) {
        let field = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        self.pointer = Some(field.clamp(at));
    }

    pub fn lift_pointer(&mut self) {
        self.pointer = None;
    }

    /// Drop every held key and the pointer (phase left Running).
    pub fn clear(&mut self) {
        self.pressed.clear();
        self.pointer = None;
    }

    pub fn is_clear(&self) -> bool {
        self.pressed.is_empty() && self.pointer.is_none()
    }

    /// Pointer wins over keys when both are live (touch-first).
    pub fn sample(&self) -> Control {
        if let Some(target) = self.pointer {
            return Control::Seek(target);
        }
        let axis = |neg: Key, pos: Key| -> f64 {
            let n = self.pressed.contains(&neg) as i32;
            let p = self.pressed.contains(&pos) as i32;
            (p - n) as f64
        };
        let dx = axis(Key::Left, Key::Right);
        let dy = axis(Key::Up, Key::Down);
        if dx == 0.0 && dy == 0.0 {
            Control::Idle
        } else {
            Control::Steer { dx, dy }
        }
    }
}

//! Normalized 0-100 coordinate space shared by physics, collision and rendering.
//!
//! x grows to the right, y grows downward (0 is the top edge of the play field).
//! Nothing in here knows about pixels; the renderer owns that transform.

use serde::{Deserialize, Serialize};

/// Extent of the normalized space on each axis.
pub const FIELD: f64 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn lerp(self, to: Vec2, t: f64) -> Vec2 {
        Vec2::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

/// Axis-aligned rectangle in normalized space (inclusive on both ends).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }

    pub fn center(&self) -> Vec2 {
        self.min.lerp(self.max, 0.5)
    }
}

/// Collision shape, centered on the owner's position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hitbox {
    Circle { radius: f64 },
    Box { half_w: f64, half_h: f64 },
}

impl Hitbox {
    /// Largest distance from the center to the shape's edge on either axis.
    pub fn extent(&self) -> f64 {
        match *self {
            Hitbox::Circle { radius } => radius,
            Hitbox::Box { half_w, half_h } => half_w.max(half_h),
        }
    }
}

/// Overlap test between two positioned shapes. Touching counts as overlapping.
pub fn overlaps(a: Vec2, a_shape: Hitbox, b: Vec2, b_shape: Hitbox) -> bool {
    match (a_shape, b_shape) {
        (Hitbox::Circle { radius: ra }, Hitbox::Circle { radius: rb }) => {
            let reach = ra + rb;
            a.distance_squared(b) <= reach * reach
        }
        (
            Hitbox::Box { half_w: aw, half_h: ah },
            Hitbox::Box { half_w: bw, half_h: bh },
        ) => (a.x - b.x).abs() <= aw + bw && (a.y - b.y).abs() <= ah + bh,
        (Hitbox::Circle { radius }, Hitbox::Box { half_w, half_h }) => {
            circle_box(a, radius, b, half_w, half_h)
        }
        (Hitbox::Box { half_w, half_h }, Hitbox::Circle { radius }) => {
            circle_box(b, radius, a, half_w, half_h)
        }
    }
}

fn circle_box(center: Vec2, radius: f64, box_center: Vec2, half_w: f64, half_h: f64) -> bool {
    // Closest point of the box to the circle center
    let nearest = Vec2::new(
        center.x.clamp(box_center.x - half_w, box_center.x + half_w),
        center.y.clamp(box_center.y - half_h, box_center.y + half_h),
    );
    center.distance_squared(nearest) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const R4: Hitbox = Hitbox::Circle { radius: 4.0 };
    const R2: Hitbox = Hitbox::Circle { radius: 2.0 };

    #[test]
    fn circles_touching_exactly_overlap() {
        let a = Vec2::new(10.0, 10.0);
        assert!(overlaps(a, R4, Vec2::new(16.0, 10.0), R2));
        assert!(!overlaps(a, R4, Vec2::new(16.001, 10.0), R2));
    }

    #[test]
    fn boxes_use_half_extents() {
        let b = Hitbox::Box { half_w: 1.0, half_h: 3.0 };
        let a = Vec2::new(50.0, 50.0);
        assert!(overlaps(a, b, Vec2::new(52.0, 50.0), b));
        assert!(!overlaps(a, b, Vec2::new(52.5, 50.0), b));
        assert!(overlaps(a, b, Vec2::new(50.0, 56.0), b));
    }

    #[test]
    fn circle_against_box_corner() {
        let bolt = Hitbox::Box { half_w: 2.0, half_h: 2.0 };
        // corner at (12, 12); circle center 3-4-5 away from it
        assert!(overlaps(Vec2::new(15.0, 16.0), Hitbox::Circle { radius: 5.0 }, Vec2::new(10.0, 10.0), bolt));
        assert!(!overlaps(Vec2::new(15.0, 16.0), Hitbox::Circle { radius: 4.9 }, Vec2::new(10.0, 10.0), bolt));
        // argument order does not matter
        assert!(overlaps(Vec2::new(10.0, 10.0), bolt, Vec2::new(15.0, 16.0), Hitbox::Circle { radius: 5.0 }));
    }

    #[test]
    fn bounds_clamp_and_contain() {
        let b = Bounds::new(Vec2::new(0.0, 80.0), Vec2::new(100.0, 90.0));
        assert_eq!(b.clamp(Vec2::new(-3.0, 95.0)), Vec2::new(0.0, 90.0));
        assert!(b.contains(Vec2::new(100.0, 80.0)));
        assert!(!b.contains(Vec2::new(100.5, 85.0)));
        assert_eq!(b.center(), Vec2::new(50.0, 85.0));
    }
}

//! 2D vector in normalized scene coordinates.
//!
//! Scene space runs from `(0, 0)` at the top-left corner to `(1, 1)` at the
//! bottom-right corner, so positive `y` points down the screen.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Vectors shorter than this are treated as zero when normalizing.
const NORMALIZE_EPSILON: f32 = 0.001;

/// Immutable 2D vector value type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or [`Vec2::ZERO`] for (near) zero input.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > NORMALIZE_EPSILON {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    /// Clamp both components into `[min, max]`.
    pub fn clamp_components(self, min: f32, max: f32) -> Vec2 {
        Vec2::new(self.x.clamp(min, max), self.y.clamp(min, max))
    }

    /// Rescale so the length is at most `max_len`, preserving direction.
    pub fn clamp_length(self, max_len: f32) -> Vec2 {
        let len = self.length();
        if len > max_len && len > 0.0 {
            self * (max_len / len)
        } else {
            self
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

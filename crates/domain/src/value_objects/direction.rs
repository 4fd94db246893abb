use serde::{Deserialize, Serialize};
use std::fmt;

use super::Vec2;

/// Facing direction of a character on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Pick the dominant axis of a velocity.
    ///
    /// Ties (including zero velocity) resolve to the vertical axis, and a
    /// non-positive `vy` reads as `Up` because scene `y` grows downward.
    pub fn from_velocity(vx: f32, vy: f32) -> Self {
        if vx.abs() > vy.abs() {
            if vx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if vy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn from_vec(v: Vec2) -> Self {
        Self::from_velocity(v.x, v.y)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", s)
    }
}

//! Player movement and collision resolution.
//!
//! Collision is deliberately coarse: every obstacle is an axis-aligned box
//! grown by a fixed padding, and a blocked step is simply discarded. There is
//! no sliding along walls and no push-out.

use serde::{Deserialize, Serialize};

use super::SimulationConfig;
use crate::entities::SceneDefinition;
use crate::value_objects::{Direction, Vec2};

/// A movable character body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub position: Vec2,
    pub direction: Direction,
    pub moving: bool,
}

impl Avatar {
    pub fn new(position: Vec2, direction: Direction) -> Self {
        Self {
            position,
            direction,
            moving: false,
        }
    }
}

/// What happened to the player this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Input inside the dead zone; nothing but `moving` changed.
    NoInput,
    Moved,
    /// A step was computed but landed inside an obstacle.
    Blocked,
}

/// Clamp a point so a character of radius `radius` stays inside the scene.
pub fn clamp_to_bounds(point: Vec2, radius: f32) -> Vec2 {
    point.clamp_components(radius, 1.0 - radius)
}

/// Advance `avatar` by one frame of joystick `input`.
pub fn resolve_player_movement(
    avatar: &mut Avatar,
    input: Vec2,
    dt: f32,
    scene: &SceneDefinition,
    config: &SimulationConfig,
) -> MoveOutcome {
    if input.length() < config.dead_zone {
        avatar.moving = false;
        return MoveOutcome::NoInput;
    }

    avatar.moving = true;
    avatar.direction = Direction::from_vec(input);

    let step = input.normalized() * (config.player_speed * dt);
    let candidate = clamp_to_bounds(avatar.position + step, config.character_radius);

    if scene.blocks(candidate, config.object_padding) {
        return MoveOutcome::Blocked;
    }

    avatar.position = candidate;
    MoveOutcome::Moved
}

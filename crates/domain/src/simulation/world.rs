//! The live scene: both characters, display timers and the proximity flag.

use serde::{Deserialize, Serialize};

use super::movement::{resolve_player_movement, Avatar, MoveOutcome};
use super::npc::{Npc, NpcBehavior};
use super::timers::{AffectionBadge, TimedText};
use super::SimulationConfig;
use crate::entities::SceneDefinition;
use crate::value_objects::{Direction, Vec2};

/// Per-frame mutable world. Replaced wholesale when a mission starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub player: Avatar,
    pub npc: Npc,
    /// Last joystick vector; magnitude never exceeds 1.
    pub joystick: Vec2,
    pub speech: TimedText,
    pub action_text: TimedText,
    pub badge: AffectionBadge,
    pub near_npc: bool,
    /// Seconds of animated weather; frozen in scenes without weather.
    pub particle_clock: f32,
}

/// What changed during one [`World::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub movement: MoveOutcome,
    /// Previous NPC behavior, when it changed this frame.
    pub npc_transition: Option<NpcBehavior>,
    pub near_npc_changed: bool,
}

impl World {
    pub fn spawn(scene: &SceneDefinition, config: &SimulationConfig) -> Self {
        let player = Avatar::new(scene.player_spawn, Direction::Up);
        let npc = Npc::spawn(scene.npc_spawn);
        let near_npc = player.position.distance_to(npc.position) < config.interaction_range;
        Self {
            player,
            npc,
            joystick: Vec2::ZERO,
            speech: TimedText::default(),
            action_text: TimedText::default(),
            badge: AffectionBadge::default(),
            near_npc,
            particle_clock: 0.0,
        }
    }

    pub fn set_joystick(&mut self, input: Vec2) {
        self.joystick = if input.is_finite() {
            input.clamp_length(1.0)
        } else {
            Vec2::ZERO
        };
    }

    pub fn distance_to_npc(&self) -> f32 {
        self.player.position.distance_to(self.npc.position)
    }

    /// Run one frame of movement, NPC behavior, timers and proximity.
    pub fn tick(&mut self, dt: f32, scene: &SceneDefinition, config: &SimulationConfig) -> TickReport {
        let movement = resolve_player_movement(&mut self.player, self.joystick, dt, scene, config);
        let npc_transition = self.npc.update(self.player.position, dt, config);

        self.speech.tick(dt);
        self.action_text.tick(dt);
        self.badge.tick(dt);

        let was_near = self.near_npc;
        self.near_npc = self.distance_to_npc() < config.interaction_range;

        if scene.weather.is_animated() {
            self.particle_clock += dt;
        }

        TickReport {
            movement,
            npc_transition,
            near_npc_changed: was_near != self.near_npc,
        }
    }
}

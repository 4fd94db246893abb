//! Deterministic per-frame simulation.

mod clock;
mod config;
mod movement;
mod npc;
mod timers;
mod world;

pub use clock::FrameClock;
pub use config::SimulationConfig;
pub use movement::{clamp_to_bounds, resolve_player_movement, Avatar, MoveOutcome};
pub use npc::{Npc, NpcBehavior};
pub use timers::{AffectionBadge, TimedText};
pub use world::{TickReport, World};

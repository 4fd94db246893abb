//! HeartQuest domain: spatial model, per-frame simulation, mission content
//! and the session aggregate. Pure data and deterministic logic; no I/O.

pub mod aggregates;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod ids;
pub mod simulation;
pub mod value_objects;

pub use aggregates::{ActionRequest, SessionSnapshot, SessionState, FAILED_EXCHANGE_SPEECH};
pub use catalog::Catalog;
pub use entities::{
    ExchangeContext, ExchangeKind, ExchangeTicket, InteractionRecord, MergeOutcome, Mission,
    MissionAnalysis, NpcReaction, ObjectShape, PlayerAction, SceneDefinition, SceneObject,
    WeatherEffect,
};
pub use error::DomainError;
pub use ids::ExchangeId;
pub use simulation::{
    Avatar, FrameClock, MoveOutcome, Npc, NpcBehavior, SimulationConfig, TickReport, World,
};
pub use value_objects::{Affection, AffectionBand, BehaviorDirective, Direction, NpcMood, Vec2};

//! Entities - static content and records.

mod exchange;
mod mission;
mod scene;

pub use exchange::{ExchangeContext, ExchangeKind, ExchangeTicket, MergeOutcome, NpcReaction};
pub use mission::{InteractionRecord, Mission, MissionAnalysis};
pub use scene::{ObjectShape, PlayerAction, SceneDefinition, SceneObject, WeatherEffect};

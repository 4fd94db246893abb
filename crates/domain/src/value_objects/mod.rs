//! Value objects - immutable types compared by value.

mod affection;
mod direction;
mod directive;
mod mood;
mod vec2;

pub use affection::{Affection, AffectionBand};
pub use direction::Direction;
pub use directive::BehaviorDirective;
pub use mood::NpcMood;
pub use vec2::Vec2;

//! NPC mood value object
//!
//! The oracle reports mood as a free-form label; the game only understands a
//! small fixed vocabulary. Anything outside the vocabulary reads as neutral.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotional state the NPC displays in the mood badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NpcMood {
    #[default]
    Neutral,
    Happy,
    Flirty,
    Annoyed,
    Shy,
}

impl NpcMood {
    /// Get all moods in prompt order
    pub fn all() -> &'static [NpcMood] {
        &[
            NpcMood::Neutral,
            NpcMood::Happy,
            NpcMood::Flirty,
            NpcMood::Annoyed,
            NpcMood::Shy,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NpcMood::Neutral => "neutral",
            NpcMood::Happy => "happy",
            NpcMood::Flirty => "flirty",
            NpcMood::Annoyed => "annoyed",
            NpcMood::Shy => "shy",
        }
    }

    /// Get an emoji representation for the mood badge
    pub fn emoji(&self) -> &'static str {
        match self {
            NpcMood::Neutral => "😐",
            NpcMood::Happy => "😊",
            NpcMood::Flirty => "😏",
            NpcMood::Annoyed => "😤",
            NpcMood::Shy => "☺️",
        }
    }

    /// Lenient parse used for oracle output: unknown labels become `Neutral`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for NpcMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NpcMood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutral" => Ok(NpcMood::Neutral),
            "happy" => Ok(NpcMood::Happy),
            "flirty" => Ok(NpcMood::Flirty),
            "annoyed" => Ok(NpcMood::Annoyed),
            "shy" => Ok(NpcMood::Shy),
            _ => Err(format!("Unknown mood: {}", s)),
        }
    }
}

//! Oracle exchanges: what is sent out, what comes back.
//!
//! An exchange is admitted by the session (which hands out an
//! [`ExchangeTicket`]), runs off the frame loop, and is folded back in by a
//! merge that checks the ticket's epoch.

use serde::{Deserialize, Serialize};

use super::{InteractionRecord, Mission, PlayerAction};
use crate::ids::ExchangeId;
use crate::value_objects::{Affection, BehaviorDirective, NpcMood};

/// Validated NPC response to one player action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcReaction {
    pub dialogue: String,
    pub mood: NpcMood,
    /// Untrusted; the session clamps after applying.
    pub affection_delta: i32,
    pub directive: BehaviorDirective,
}

impl NpcReaction {
    /// A reaction that only speaks, with every other field neutral.
    pub fn speech_only(dialogue: impl Into<String>) -> Self {
        Self {
            dialogue: dialogue.into(),
            mood: NpcMood::Neutral,
            affection_delta: 0,
            directive: BehaviorDirective::Idle,
        }
    }
}

/// Snapshot of session state the prompt is built from.
///
/// Captured at admission so the oracle sees the world as it was when the
/// player acted, not whatever the frame loop did meanwhile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeContext {
    pub mission: Mission,
    pub affection: Affection,
    pub mood: NpcMood,
    pub history: Vec<InteractionRecord>,
    /// Set by the host from stored preferences.
    pub player_name: Option<String>,
}

impl ExchangeContext {
    pub fn with_player_name(mut self, name: Option<String>) -> Self {
        self.player_name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    /// Most recent `n` records, oldest first.
    pub fn recent_history(&self, n: usize) -> &[InteractionRecord] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExchangeKind {
    Action { action: PlayerAction },
    MissionAnalysis,
}

/// Admission receipt for one in-flight oracle exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeTicket {
    pub id: ExchangeId,
    /// Session epoch at admission; a merge under a different epoch is stale.
    pub epoch: u64,
    pub kind: ExchangeKind,
    pub context: ExchangeContext,
}

impl ExchangeTicket {
    pub fn action(&self) -> Option<&PlayerAction> {
        match &self.kind {
            ExchangeKind::Action { action } => Some(action),
            ExchangeKind::MissionAnalysis => None,
        }
    }
}

/// Result of folding an exchange back into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Applied,
    /// The session was reset or moved on; nothing changed.
    Stale,
}

impl MergeOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, MergeOutcome::Applied)
    }
}

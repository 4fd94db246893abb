use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::NpcMood;

/// A bounded scenario with its own scene and completion threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Narrative setup handed to the oracle.
    pub scenario: String,
    /// Upper bound suggested to the oracle for the end-of-mission bonus.
    pub target_affection_gain: i32,
    /// Minimum number of completed exchanges before the mission can end.
    pub completion_threshold: u32,
}

impl Mission {
    pub fn can_complete(&self, interaction_count: u32) -> bool {
        interaction_count >= self.completion_threshold
    }
}

/// Holistic review of a finished mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionAnalysis {
    pub summary: String,
    pub affection_change: i32,
    pub npc_mood: NpcMood,
    pub advice: String,
}

impl MissionAnalysis {
    /// Neutral stand-in used when no analysis could be produced.
    ///
    /// Keeps the current mood and changes nothing, so the player can still move on.
    pub fn fallback(reason: Option<&str>, current_mood: NpcMood) -> Self {
        let summary = match reason {
            Some(reason) => format!("The mission has concluded. (Analysis unavailable: {reason})"),
            None => "The mission has concluded.".to_string(),
        };
        Self {
            summary,
            affection_change: 0,
            npc_mood: current_mood,
            advice: "Keep trying your best!".to_string(),
        }
    }
}

/// One completed exchange with the NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub action_id: String,
    pub action_label: String,
    pub npc_dialogue: String,
    pub npc_mood: NpcMood,
    pub timestamp: DateTime<Utc>,
}

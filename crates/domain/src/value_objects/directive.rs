//! Behavior directives issued by the dialogue oracle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical reaction the oracle asks the NPC to perform.
///
/// Parsing is total: any label the game does not recognize maps to `Idle`,
/// so a creative oracle can never leave the NPC without a behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorDirective {
    #[default]
    Idle,
    ApproachPlayer,
    StepBack,
    TurnAway,
    FacePlayer,
    Emote,
}

impl BehaviorDirective {
    pub fn all() -> &'static [BehaviorDirective] {
        &[
            BehaviorDirective::Idle,
            BehaviorDirective::ApproachPlayer,
            BehaviorDirective::StepBack,
            BehaviorDirective::TurnAway,
            BehaviorDirective::FacePlayer,
            BehaviorDirective::Emote,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorDirective::Idle => "idle",
            BehaviorDirective::ApproachPlayer => "approach_player",
            BehaviorDirective::StepBack => "step_back",
            BehaviorDirective::TurnAway => "turn_away",
            BehaviorDirective::FacePlayer => "face_player",
            BehaviorDirective::Emote => "emote",
        }
    }

    /// Short explanation included in the oracle instructions.
    pub fn meaning(&self) -> &'static str {
        match self {
            BehaviorDirective::Idle => "stay in place calmly",
            BehaviorDirective::ApproachPlayer => "walk closer to the player (positive reaction)",
            BehaviorDirective::StepBack => "back away slightly (uncomfortable)",
            BehaviorDirective::TurnAway => "turn around (embarrassed or annoyed)",
            BehaviorDirective::FacePlayer => "turn to look at the player directly",
            BehaviorDirective::Emote => "express emotion physically (laugh, blush, gesture)",
        }
    }

    /// Normalize an oracle label (case and surrounding whitespace ignored).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "approach_player" => BehaviorDirective::ApproachPlayer,
            "step_back" => BehaviorDirective::StepBack,
            "turn_away" => BehaviorDirective::TurnAway,
            "face_player" => BehaviorDirective::FacePlayer,
            "emote" => BehaviorDirective::Emote,
            _ => BehaviorDirective::Idle,
        }
    }
}

impl fmt::Display for BehaviorDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

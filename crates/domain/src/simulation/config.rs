use serde::{Deserialize, Serialize};

/// Tunable constants for the per-frame simulation.
///
/// Distances are in normalized scene units, speeds in units per second and
/// durations in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub player_speed: f32,
    pub npc_speed: f32,
    /// Player/NPC distance below which actions become available.
    pub interaction_range: f32,
    pub character_radius: f32,
    /// Extra margin added around every obstacle's half extents.
    pub object_padding: f32,
    /// Joystick magnitudes below this are treated as no input.
    pub dead_zone: f32,
    /// Distance at which a walking NPC snaps onto its target.
    pub arrive_epsilon: f32,
    pub speech_bubble_base: f32,
    pub speech_bubble_max_bonus: f32,
    /// Characters of dialogue that earn one extra second of bubble time.
    pub speech_chars_per_second: f32,
    pub action_text_duration: f32,
    pub affection_badge_duration: f32,
    pub step_back_duration: f32,
    pub emote_duration: f32,
    /// Longest frame delta the simulation will integrate in one tick.
    pub max_frame_dt: f32,
}

impl SimulationConfig {
    /// Idle NPCs turn toward a player inside this radius.
    pub fn notice_range(&self) -> f32 {
        self.interaction_range * 1.5
    }

    /// An approaching NPC stops once inside this radius.
    pub fn approach_stop_range(&self) -> f32 {
        self.interaction_range * 0.7
    }

    pub fn speech_duration(&self, text: &str) -> f32 {
        let bonus = text.chars().count() as f32 / self.speech_chars_per_second;
        self.speech_bubble_base + bonus.min(self.speech_bubble_max_bonus)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            player_speed: 0.25,
            npc_speed: 0.12,
            interaction_range: 0.12,
            character_radius: 0.025,
            object_padding: 0.02,
            dead_zone: 0.01,
            arrive_epsilon: 0.02,
            speech_bubble_base: 4.0,
            speech_bubble_max_bonus: 3.0,
            speech_chars_per_second: 30.0,
            action_text_duration: 2.0,
            affection_badge_duration: 2.0,
            step_back_duration: 0.5,
            emote_duration: 1.0,
            max_frame_dt: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_duration_grows_with_length_up_to_cap() {
        let cfg = SimulationConfig::default();
        assert!((cfg.speech_duration("") - 4.0).abs() < f32::EPSILON);
        assert!((cfg.speech_duration(&"a".repeat(30)) - 5.0).abs() < 1e-5);
        assert!((cfg.speech_duration(&"a".repeat(500)) - 7.0).abs() < 1e-5);
    }

    #[test]
    fn derived_ranges() {
        let cfg = SimulationConfig::default();
        assert!((cfg.notice_range() - 0.18).abs() < 1e-6);
        assert!((cfg.approach_stop_range() - 0.084).abs() < 1e-6);
    }
}

//! Repository port traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepoError;

/// Name shown in prompts when the player never set one.
pub const DEFAULT_PLAYER_NAME: &str = "You";

/// Credential and display name, as entered in settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub api_key: String,
    pub player_name: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

impl PlayerSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Display name for prompts; the placeholder default counts as unset.
    pub fn display_name(&self) -> Option<String> {
        let name = self.player_name.trim();
        (!name.is_empty() && name != DEFAULT_PLAYER_NAME).then(|| name.to_string())
    }
}

/// Saved campaign position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedProgress {
    pub mission_index: usize,
    pub affection: i32,
}

impl SavedProgress {
    /// A fresh game at mission 0 with no affection counts as nothing saved.
    pub fn is_meaningful(&self) -> bool {
        self.mission_index > 0 || self.affection > 0
    }
}

/// Persisted preferences. Last write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferencesRepo: Send + Sync {
    async fn load_settings(&self) -> Result<PlayerSettings, RepoError>;
    async fn save_settings(&self, settings: &PlayerSettings) -> Result<(), RepoError>;
    async fn load_progress(&self) -> Result<SavedProgress, RepoError>;
    async fn save_progress(&self, progress: SavedProgress) -> Result<(), RepoError>;
    async fn clear_progress(&self) -> Result<(), RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_is_not_a_display_name() {
        let settings = PlayerSettings::default();
        assert_eq!(settings.display_name(), None);
        assert!(!settings.has_api_key());

        let named = PlayerSettings {
            api_key: "k".into(),
            player_name: "  Riley ".into(),
        };
        assert_eq!(named.display_name().as_deref(), Some("Riley"));
        assert!(named.has_api_key());
    }

    #[test]
    fn empty_progress_is_not_meaningful() {
        assert!(!SavedProgress::default().is_meaningful());
        assert!(SavedProgress {
            mission_index: 0,
            affection: 3
        }
        .is_meaningful());
    }
}

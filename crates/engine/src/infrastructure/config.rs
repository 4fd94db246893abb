//! Engine configuration read from the environment.

use crate::infrastructure::anthropic::{DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MODEL};
use crate::infrastructure::resilient_llm::RetryConfig;

/// Runtime settings for the engine binary.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub anthropic_base_url: String,
    pub anthropic_model: String,
    pub llm_max_retries: u32,
    pub preferences_db: String,
    pub server_host: String,
    pub server_port: u16,
    pub frame_rate_hz: u32,
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            llm_max_retries: RetryConfig::default().max_retries,
            preferences_db: "heartquest.db".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            frame_rate_hz: 60,
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            anthropic_base_url: get("ANTHROPIC_BASE_URL").unwrap_or(defaults.anthropic_base_url),
            anthropic_model: get("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
            llm_max_retries: get("LLM_MAX_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.llm_max_retries),
            preferences_db: get("PREFERENCES_DB").unwrap_or(defaults.preferences_db),
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: get("SERVER_PORT")
                .or_else(|| get("PORT"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            frame_rate_hz: get("FRAME_RATE_HZ")
                .and_then(|v| v.parse().ok())
                .filter(|hz| (1..=240).contains(hz))
                .unwrap_or(defaults.frame_rate_hz),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.llm_max_retries,
            ..RetryConfig::default()
        }
    }
}

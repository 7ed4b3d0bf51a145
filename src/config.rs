//! Fusion configuration
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. CLI flags (applied by `main` through the `with_*` setters)
//! 2. Environment variables (`API_KEY`/`GEMINI_API_KEY`, `FUSION_MODEL`,
//!    `FUSION_PROVIDER`, `FUSION_LOAD_DELAY_MS`), including a `.env` file
//! 3. Defaults
//!
//! Nothing is persisted: every process starts from these sources.

use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for the Gemini credential, in order
const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Clone, PartialEq)]
pub struct FusionConfig {
    /// Credential gating the provider layer
    pub api_key: Option<String>,
    /// Provider name (gemini, mock)
    pub provider: String,
    /// Model passed to the provider
    pub model: String,
    /// Base URL of the Gemini API
    pub endpoint: String,
    /// Artificial delay before a view module resolves (0 = immediate)
    pub load_delay: Duration,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            load_delay: Duration::ZERO,
        }
    }
}

impl FusionConfig {
    /// Load from the process environment (after `.env`, if present)
    pub fn from_env() -> Self {
        // A missing .env is not an error
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty());
        let mut config = Self {
            api_key,
            ..Self::default()
        };

        if let Some(model) = lookup("FUSION_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model;
        }
        if let Some(provider) = lookup("FUSION_PROVIDER").filter(|p| !p.trim().is_empty()) {
            config.provider = provider.to_lowercase();
        }
        if let Some(raw) = lookup("FUSION_LOAD_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.load_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid FUSION_LOAD_DELAY_MS"),
            }
        }

        config
    }

    pub fn with_provider(mut self, provider: Option<String>) -> Self {
        if let Some(p) = provider {
            self.provider = p.to_lowercase();
        }
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(m) = model {
            self.model = m;
        }
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

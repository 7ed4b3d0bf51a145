//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum FusionError {
    // ─────────────────────────────────────────────────────────────
    // Provider layer
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Config(String),

    /// Message is shown to the user as-is
    #[error("{0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown provider: '{name}'. Available: gemini, mock")]
    UnknownProvider { name: String },

    // ─────────────────────────────────────────────────────────────
    // Shell
    // ─────────────────────────────────────────────────────────────
    #[error("Render error: {0}")]
    Render(String),

    #[error("Failed to load view '{path}': {reason}")]
    ViewLoad { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for FusionError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FusionError::Config(_) => Some("Set API_KEY (or GEMINI_API_KEY) in the environment or .env"),
            FusionError::Provider(_) => Some("Retry later or switch provider with --provider mock"),
            FusionError::Http(_) => Some("Check network connectivity and the provider endpoint"),
            FusionError::Json(_) => Some("The provider returned an unexpected payload"),
            FusionError::UnknownProvider { .. } => Some("Use --provider gemini or --provider mock"),
            FusionError::Render(_) => Some("Press Ctrl+R to retry the view"),
            FusionError::ViewLoad { .. } => Some("Check that the path is registered in the view registry"),
            FusionError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

//! # Provider Abstraction Layer
//!
//! Trait and implementations for text-generation backends.
//!
//! - [`Provider`] - Core trait for generating text from a prompt
//! - [`GeminiProvider`] - Production provider using the Gemini API
//! - [`MockProvider`] - Test provider with configurable responses
//!
//! Providers are consumed by the operations in [`crate::operations`], which
//! are in turn wrapped by a [`crate::runner::TaskRunner`]. Nothing in the
//! runner or the shell knows about HTTP, models or credentials.
//!
//! ```rust
//! use fusion::config::FusionConfig;
//! use fusion::provider::create_provider;
//!
//! let config = FusionConfig::default();
//! assert!(create_provider("mock", &config).is_ok());
//! assert!(create_provider("gemini", &config).is_ok()); // fails per call without a key
//! assert!(create_provider("invalid", &config).is_err());
//! ```

mod gemini;
mod mock;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::FusionConfig;
use crate::error::FusionError;

// ============================================================================
// PROVIDER TRAIT (ASYNC)
// ============================================================================

/// Core trait that all text-generation providers implement
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider name (e.g., "gemini", "mock")
    fn name(&self) -> &str;

    /// Generate text for a prompt
    ///
    /// Returns the raw text of the first candidate. When the request carries a
    /// response schema, the text is expected to be JSON matching it, but
    /// providers do not validate that.
    async fn generate(&self, request: GenerateRequest) -> Result<String, FusionError>;

    /// Check if this provider can serve requests (e.g., API key set)
    fn is_available(&self) -> bool {
        true
    }
}

// ============================================================================
// REQUEST TYPE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,

    /// Model override; providers fall back to their configured model
    pub model: Option<String>,

    /// Ask for JSON output matching this schema
    pub response_schema: Option<Value>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            response_schema: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_json_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

// ============================================================================
// PROVIDER FACTORY
// ============================================================================

/// Create a provider instance by name
///
/// | Name | Description | Requires |
/// |------|-------------|----------|
/// | `gemini` | Gemini API | `API_KEY` env var (calls fail without it) |
/// | `mock` | Testing | Nothing |
pub fn create_provider(name: &str, config: &FusionConfig) -> Result<Arc<dyn Provider>, FusionError> {
    match name.to_lowercase().as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::from_config(config))),
        "mock" => Ok(Arc::new(MockProvider::new())),
        _ => Err(FusionError::UnknownProvider {
            name: name.to_string(),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================

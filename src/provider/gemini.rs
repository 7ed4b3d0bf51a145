//! Gemini provider using the Generative Language API
//!
//! Sends prompts to `models/{model}:generateContent`.
//! Requires `API_KEY` (or `GEMINI_API_KEY`). Without a key every call fails
//! immediately with a configuration error and no request is sent.

use super::{GenerateRequest, Provider};
use crate::config::FusionConfig;
use crate::error::FusionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MISSING_KEY_MESSAGE: &str = "Gemini API key not configured. This feature is disabled.";

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiProvider {
    pub fn from_config(config: &FusionConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!(
                provider = "gemini",
                "API_KEY environment variable not set. Gemini features will be disabled."
            );
        }
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let config = FusionConfig {
            api_key: Some(api_key.into()),
            ..FusionConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }

    fn build_payload(request: &GenerateRequest) -> GenerateContentRequest {
        let generation_config = request.response_schema.as_ref().map(|schema| GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: schema.clone(),
        });

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config,
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, FusionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FusionError::Config(MISSING_KEY_MESSAGE.to_string()))?;

        let model = request.model.as_deref().unwrap_or(&self.model);
        let payload = Self::build_payload(&request);

        tracing::debug!(
            provider = "gemini",
            model = %model,
            prompt_len = request.prompt.len(),
            json = request.response_schema.is_some(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                provider = "gemini",
                status = %status,
                error = %error_text,
                "Gemini API error"
            );
            return Err(FusionError::Provider(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response.json().await?;
        let text = api_response.text().ok_or_else(|| {
            FusionError::Provider("Gemini API returned no candidates".to_string())
        })?;

        tracing::debug!(provider = "gemini", output_len = text.len(), "Gemini API response received");

        Ok(text)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

// ============================================================================
// API TYPES
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        Some(content.parts.iter().map(|p| p.text.as_str()).collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================

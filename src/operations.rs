//! Remote operations used by the views
//!
//! Each operation builds a prompt, calls the [`Provider`] and shapes the
//! answer. They are the concrete [`Operation`]s wrapped by task runners:
//!
//! | Operation | Params | Output |
//! |-----------|--------|--------|
//! | [`DataInsights`] | `Vec<QuarterlyFigure>` | `String` |
//! | [`BlogPostWriter`] | `String` (topic) | [`BlogPost`] |
//! | [`ProductCopywriter`] | [`ProductConfig`] | `String` |

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::FusionError;
use crate::provider::{GenerateRequest, Provider};
use crate::runner::Operation;

// ============================================================================
// DATA INSIGHTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyFigure {
    pub name: String,
    pub revenue: u64,
    pub profit: u64,
}

impl QuarterlyFigure {
    pub fn new(name: &str, revenue: u64, profit: u64) -> Self {
        Self {
            name: name.to_string(),
            revenue,
            profit,
        }
    }
}

/// Built-in dataset shown by the analytics view
pub fn quarterly_dataset() -> Vec<QuarterlyFigure> {
    vec![
        QuarterlyFigure::new("Q1", 4000, 2400),
        QuarterlyFigure::new("Q2", 3000, 1398),
        QuarterlyFigure::new("Q3", 5500, 4100),
        QuarterlyFigure::new("Q4", 4780, 3908),
    ]
}

pub struct DataInsights {
    provider: Arc<dyn Provider>,
}

impl DataInsights {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    fn prompt(data: &[QuarterlyFigure]) -> Result<String, FusionError> {
        Ok(format!(
            "You are a senior data analyst. Based on the following JSON data representing \
             quarterly performance, provide a brief, insightful analysis with 2-3 key takeaways \
             in bullet points. Data: {}",
            serde_json::to_string(data)?
        ))
    }
}

#[async_trait]
impl Operation<Vec<QuarterlyFigure>, String> for DataInsights {
    async fn invoke(&self, data: Vec<QuarterlyFigure>) -> Result<String, FusionError> {
        let prompt = Self::prompt(&data)?;
        self.provider.generate(GenerateRequest::new(prompt)).await
    }
}

// ============================================================================
// BLOG POST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub content: String,
    /// Set when the provider answer could not be parsed
    #[serde(skip)]
    pub is_fallback: bool,
}

impl BlogPost {
    pub fn fallback() -> Self {
        Self {
            title: "Error".to_string(),
            content: "Could not generate blog post content.".to_string(),
            is_fallback: true,
        }
    }

    /// Parse the provider answer, substituting [`BlogPost::fallback`] on a shape error
    pub fn parse_or_fallback(raw: &str) -> Self {
        match serde_json::from_str::<BlogPost>(strip_code_fence(raw)) {
            Ok(post) => post,
            Err(error) => {
                tracing::warn!(error = %error, "blog post response did not match the schema");
                Self::fallback()
            }
        }
    }
}

/// Models sometimes wrap JSON in a ```json fence despite the mime type
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

pub struct BlogPostWriter {
    provider: Arc<dyn Provider>,
}

impl BlogPostWriter {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    fn request(topic: &str) -> GenerateRequest {
        GenerateRequest::new(format!(
            "Generate a short blog post about \"{}\". The post should be engaging and \
             informative for a general audience.",
            topic
        ))
        .with_json_schema(json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "content": { "type": "STRING" }
            },
            "required": ["title", "content"]
        }))
    }
}

#[async_trait]
impl Operation<String, BlogPost> for BlogPostWriter {
    async fn invoke(&self, topic: String) -> Result<BlogPost, FusionError> {
        let raw = self.provider.generate(Self::request(&topic)).await?;
        Ok(BlogPost::parse_or_fallback(&raw))
    }
}

// ============================================================================
// PRODUCT DESCRIPTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductConfig {
    /// Color name or `#RRGGBB`
    pub color: String,
    pub shape: String,
}

impl ProductConfig {
    pub fn new(color: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            shape: shape.into(),
        }
    }
}

pub struct ProductCopywriter {
    provider: Arc<dyn Provider>,
}

impl ProductCopywriter {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    fn prompt(config: &ProductConfig) -> String {
        format!(
            "Generate a short, punchy, and enticing marketing description for a futuristic \
             product. The product is a {} and its primary color is {}. Focus on innovation, \
             luxury, and the feeling it evokes. Maximum 3 sentences.",
            config.shape, config.color
        )
    }
}

#[async_trait]
impl Operation<ProductConfig, String> for ProductCopywriter {
    async fn invoke(&self, config: ProductConfig) -> Result<String, FusionError> {
        self.provider
            .generate(GenerateRequest::new(Self::prompt(&config)))
            .await
    }
}

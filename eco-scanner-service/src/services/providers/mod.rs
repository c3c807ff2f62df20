//! Remote model abstraction.
//!
//! Everything that actually identifies and scores a product happens behind
//! [`GenerativeProvider`]. The HTTP layer and the retry loop only see this
//! trait, so tests can swap in [`mock::MockProvider`].

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Upstream asked us to slow down (HTTP 429).
    #[error("[429 Too Many Requests] {0}")]
    RateLimited(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Response blocked: {0}")]
    Blocked(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Max retries exceeded")]
    MaxRetriesExceeded,
}

impl ProviderError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_))
    }
}

/// Base64 image bytes sent alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub data: String,
    pub mime_type: String,
}

/// Content of a single model request: prompt text, optionally with an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContent {
    pub text: String,
    pub image: Option<InlineImage>,
}

impl PromptContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(text: impl Into<String>, image: InlineImage) -> Self {
        Self {
            text: text.into(),
            image: Some(image),
        }
    }
}

/// A generative model that turns prompt content into free-form reply text.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Generate a reply for the given content. The text is untrusted.
    async fn generate(&self, content: &PromptContent) -> Result<String, ProviderError>;
}

//! Runs an analysis request against the remote model.

use crate::models::{AnalysisRequest, ImagePayload};
use crate::services::parser::parse_model_reply;
use crate::services::prompt;
use crate::services::providers::{GenerativeProvider, InlineImage, PromptContent, ProviderError};
use crate::services::retry::{with_retry, RetryPolicy};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The reply was not JSON even after fence removal.
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

impl From<ImagePayload> for InlineImage {
    fn from(image: ImagePayload) -> Self {
        Self {
            data: image.data,
            mime_type: image.mime_type,
        }
    }
}

pub struct Analyzer {
    provider: Arc<dyn GenerativeProvider>,
    retry: RetryPolicy,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn GenerativeProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Build the prompt for `request`, call the model with retry and parse
    /// the reply. The parsed value is passed through unvalidated.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<Value, AnalysisError> {
        let operation = request.kind();
        let content = match request {
            AnalysisRequest::Image(image) => {
                PromptContent::with_image(prompt::image_prompt(), image.into())
            }
            AnalysisRequest::Barcode(barcode) => {
                PromptContent::text(prompt::barcode_prompt(&barcode))
            }
        };

        let reply = with_retry(&self.retry, operation, || self.provider.generate(&content)).await?;
        let data = parse_model_reply(&reply)?;

        let product_name = data
            .pointer("/product/name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let product_brand = data
            .pointer("/product/brand")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        tracing::info!(
            kind = operation,
            product_name,
            product_brand,
            "Product identified"
        );

        Ok(data)
    }
}

//! Mock provider implementation for testing.

use super::{GenerativeProvider, PromptContent, ProviderError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted stand-in for the remote model.
///
/// Replies are served from the script in order; once it runs dry every call
/// gets the fallback reply. Every request is recorded for later inspection.
pub struct MockProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: Fallback,
    calls: Mutex<Vec<PromptContent>>,
}

enum Fallback {
    Reply(String),
    Fail(String),
    Exhausted,
}

impl MockProvider {
    /// Always answer with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Fallback::Reply(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer with each scripted outcome in turn.
    pub fn scripted(outcomes: impl IntoIterator<Item = Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            fallback: Fallback::Exhausted,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Fallback::Fail(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PromptContent> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl GenerativeProvider for MockProvider {
    async fn generate(&self, content: &PromptContent) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(content.clone());
        }

        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        if let Some(outcome) = next {
            return outcome;
        }

        match &self.fallback {
            Fallback::Reply(reply) => Ok(reply.clone()),
            Fallback::Fail(message) => Err(ProviderError::ApiError(message.clone())),
            Fallback::Exhausted => Err(ProviderError::NotConfigured(
                "Mock provider script exhausted".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_script_in_order_then_fails() {
        let provider = MockProvider::scripted(vec![
            Err(ProviderError::RateLimited("slow down".to_string())),
            Ok("second".to_string()),
        ]);
        let content = PromptContent::text("p");

        assert!(provider.generate(&content).await.unwrap_err().is_rate_limited());
        assert_eq!(provider.generate(&content).await.unwrap(), "second");
        assert!(matches!(
            provider.generate(&content).await,
            Err(ProviderError::NotConfigured(_))
        ));
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn replying_always_returns_fallback() {
        let provider = MockProvider::replying("{}");
        for _ in 0..3 {
            assert_eq!(provider.generate(&PromptContent::text("p")).await.unwrap(), "{}");
        }
    }
}

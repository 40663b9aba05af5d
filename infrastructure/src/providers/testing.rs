//! Offline provider with canned answers
//!
//! Used for smoke tests and demos; it needs no key and never touches the
//! network.

use async_trait::async_trait;
use team_application::{GatewayError, ProviderClient};
use team_domain::ResolvedTarget;
use tracing::info;

/// Phrase that makes the testing provider fail
pub const ERROR_TRIGGER: &str = "test error";

pub struct TestingClient {
    provider: String,
}

impl TestingClient {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }

    /// Deterministic answer for `prompt`
    pub fn answer(prompt: &str) -> Result<String, GatewayError> {
        if prompt.contains("capital of France") {
            Ok("Paris is the capital of France.".to_string())
        } else if prompt.contains("largest planet") {
            Ok("Jupiter is the largest planet in our solar system.".to_string())
        } else if prompt.contains(ERROR_TRIGGER) {
            Err(GatewayError::RequestFailed(
                "Test error triggered by request".to_string(),
            ))
        } else {
            Ok(format!("Testing response for: {}", prompt))
        }
    }
}

#[async_trait]
impl ProviderClient for TestingClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn send(&self, target: &ResolvedTarget, prompt: &str) -> Result<String, GatewayError> {
        info!("Testing provider received prompt for model {}", target.model);
        Self::answer(prompt)
    }

    // No live listing: any model name is accepted unverified.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn canned_answers() {
        let client = TestingClient::new("testing");
        let target = ResolvedTarget::new("testing", "anything");
        assert_eq!(
            client.send(&target, "What is the capital of France?").await.unwrap(),
            "Paris is the capital of France."
        );
        assert_eq!(
            client.send(&target, "Name the largest planet").await.unwrap(),
            "Jupiter is the largest planet in our solar system."
        );
        assert_eq!(
            client.send(&target, "hello").await.unwrap(),
            "Testing response for: hello"
        );
    }

    #[tokio::test]
    async fn error_trigger_fails() {
        let client = TestingClient::new("testing");
        let err = client
            .send(&ResolvedTarget::new("testing", "m"), "please raise a test error")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request failed: Test error triggered by request");
    }

    #[tokio::test]
    async fn reports_no_live_models() {
        assert!(TestingClient::new("testing").list_models().await.unwrap().is_empty());
    }
}

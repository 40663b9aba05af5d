//! Provider client port
//!
//! Defines the interface for talking to one LLM provider. Implementations
//! (HTTP adapters, the offline testing provider) live in the infrastructure
//! layer.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use team_domain::{ProviderDescriptor, ProviderSettings, ResolvedTarget};
use thiserror::Error;

/// Errors that can occur while talking to a provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Missing credential or unusable client settings
    #[error("{0}")]
    Configuration(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Cancelled")]
    Cancelled,
}

impl GatewayError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::Configuration(_))
    }
}

/// Client for a single provider
///
/// One instance serves every model of its provider and is shared between
/// concurrent dispatches.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Full name of the provider this client talks to
    fn provider(&self) -> &str;

    /// Send one prompt and return the response text
    async fn send(&self, target: &ResolvedTarget, prompt: &str) -> Result<String, GatewayError>;

    /// Models the provider reports as available.
    ///
    /// Providers without a listing endpoint return an empty list.
    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        Ok(Vec::new())
    }
}

/// Builds provider clients from their descriptor
pub trait ProviderClientFactory: Send + Sync {
    /// `api_key` is `None` for providers that do not need one
    fn create(
        &self,
        descriptor: &ProviderDescriptor,
        settings: &ProviderSettings,
        api_key: Option<String>,
    ) -> Result<Arc<dyn ProviderClient>, GatewayError>;
}

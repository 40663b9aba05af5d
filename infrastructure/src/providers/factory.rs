//! Client factory: descriptor + settings → concrete client

use super::{
    AnthropicClient, ClientSettings, GeminiClient, OllamaClient, OpenAiCompatibleClient,
    TestingClient,
};
use std::sync::Arc;
use team_application::{GatewayError, ProviderClient, ProviderClientFactory};
use team_domain::{ProviderApi, ProviderDescriptor, ProviderSettings};
use tracing::debug;

/// Builds the HTTP (or in-process) client matching a descriptor's API
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClientFactory;

impl HttpClientFactory {
    pub fn new() -> Self {
        Self
    }

    fn client_settings(
        descriptor: &ProviderDescriptor,
        settings: &ProviderSettings,
    ) -> Result<ClientSettings, GatewayError> {
        let name = &descriptor.full_name;
        let base_url = settings.base_url_for(descriptor).ok_or_else(|| {
            GatewayError::Configuration(format!(
                "No base_url configured for provider '{}'",
                name
            ))
        })?;

        Ok(ClientSettings::new(name.clone(), base_url)
            .with_max_tokens(settings.max_tokens_for(name))
            .with_temperature(settings.temperature_for(name)))
    }
}

/// Local servers run without a key; every other provider must have one
fn checked_key(
    descriptor: &ProviderDescriptor,
    api_key: Option<String>,
) -> Result<Option<String>, GatewayError> {
    if descriptor.is_local {
        return Ok(api_key);
    }
    api_key.map(Some).ok_or_else(|| {
        GatewayError::Configuration(format!(
            "API key is required for {} provider",
            descriptor.full_name
        ))
    })
}

impl ProviderClientFactory for HttpClientFactory {
    fn create(
        &self,
        descriptor: &ProviderDescriptor,
        settings: &ProviderSettings,
        api_key: Option<String>,
    ) -> Result<Arc<dyn ProviderClient>, GatewayError> {
        if descriptor.api == ProviderApi::Testing {
            return Ok(Arc::new(TestingClient::new(descriptor.full_name.clone())));
        }

        let client_settings = Self::client_settings(descriptor, settings)?;
        debug!(
            "Creating {} client at {}",
            descriptor.full_name, client_settings.base_url
        );

        let client: Arc<dyn ProviderClient> = match descriptor.api {
            ProviderApi::OpenAiCompatible => Arc::new(OpenAiCompatibleClient::new(
                client_settings,
                checked_key(descriptor, api_key)?.as_deref(),
            )?),
            ProviderApi::Anthropic => Arc::new(AnthropicClient::new(
                client_settings,
                checked_key(descriptor, api_key)?.as_deref(),
            )?),
            ProviderApi::Gemini => Arc::new(GeminiClient::new(
                client_settings,
                checked_key(descriptor, api_key)?.as_deref(),
            )?),
            ProviderApi::Ollama => Arc::new(OllamaClient::new(client_settings)?),
            ProviderApi::Testing => Arc::new(TestingClient::new(descriptor.full_name.clone())),
        };
        Ok(client)
    }
}

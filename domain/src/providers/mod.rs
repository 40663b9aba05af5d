//! Providers: the registry of known vendors and their runtime settings.
//!
//! [`ProviderSettings`] is provider-neutral and serde-free; the
//! infrastructure config loader maps the TOML `[providers]` section onto it.

pub mod registry;

pub use registry::{
    ProviderApi, ProviderDescriptor, ProviderListing, ProviderRegistry, ProviderRegistryBuilder,
};

use std::collections::HashMap;

/// Runtime settings shared by all provider clients.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Max tokens per response unless a provider overrides it (default: 4096).
    pub max_tokens: u32,
    /// Sampling temperature; `None` leaves the provider default.
    pub temperature: Option<f32>,
    /// Per-provider overrides keyed by full provider name.
    pub overrides: HashMap<String, ProviderOverride>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: None,
            overrides: HashMap::new(),
        }
    }
}

impl ProviderSettings {
    pub fn override_for(&self, provider: &str) -> Option<&ProviderOverride> {
        self.overrides.get(provider)
    }

    pub fn max_tokens_for(&self, provider: &str) -> u32 {
        self.override_for(provider)
            .and_then(|o| o.max_tokens)
            .unwrap_or(self.max_tokens)
    }

    pub fn temperature_for(&self, provider: &str) -> Option<f32> {
        self.override_for(provider)
            .and_then(|o| o.temperature)
            .or(self.temperature)
    }

    /// Base URL from the override, else the descriptor default
    pub fn base_url_for<'a>(&'a self, descriptor: &'a ProviderDescriptor) -> Option<&'a str> {
        self.override_for(&descriptor.full_name)
            .and_then(|o| o.base_url.as_deref())
            .or(descriptor.default_base_url.as_deref())
    }

    /// Credential variable from the override, else `<NAME>_API_KEY`
    pub fn api_key_env_for(&self, descriptor: &ProviderDescriptor) -> String {
        self.override_for(&descriptor.full_name)
            .and_then(|o| o.api_key_env.clone())
            .unwrap_or_else(|| descriptor.api_key_env())
    }
}

/// Settings for a single provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOverride {
    /// Base URL (e.g. a proxy or a self-hosted gateway).
    pub base_url: Option<String>,
    /// Environment variable name for the API key.
    pub api_key_env: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

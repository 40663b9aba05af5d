//! Provider client cache
//!
//! Builds one client per provider on first use and hands out the same
//! instance afterwards. Credentials are checked when the client is built.

use crate::ports::credentials::CredentialSource;
use crate::ports::llm_gateway::{GatewayError, ProviderClient, ProviderClientFactory};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use team_domain::{ProviderDescriptor, ProviderRegistry, ProviderSettings};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

type ClientCell = Arc<OnceCell<Arc<dyn ProviderClient>>>;

/// Memoizes provider clients by full provider name
pub struct ProviderClientCache {
    registry: Arc<ProviderRegistry>,
    settings: ProviderSettings,
    factory: Arc<dyn ProviderClientFactory>,
    credentials: Arc<dyn CredentialSource>,
    clients: Mutex<HashMap<String, ClientCell>>,
}

impl ProviderClientCache {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        factory: Arc<dyn ProviderClientFactory>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            registry,
            settings: ProviderSettings::default(),
            factory,
            credentials,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_settings(mut self, settings: ProviderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Client for `provider` (full name or alias).
    ///
    /// Concurrent first calls for the same provider build exactly one
    /// client. A failed build is not remembered; the next call retries.
    pub async fn get_client(&self, provider: &str) -> Result<Arc<dyn ProviderClient>, GatewayError> {
        let descriptor = self
            .registry
            .resolve_alias(provider)
            .map_err(|_| GatewayError::UnsupportedProvider(provider.to_string()))?;

        let cell = {
            let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(clients.entry(descriptor.full_name.clone()).or_default())
        };

        let client = cell
            .get_or_try_init(|| async { self.build(descriptor) })
            .await?;
        Ok(Arc::clone(client))
    }

    /// Full names of providers with a ready client
    #[cfg(test)]
    fn cached_providers(&self) -> Vec<String> {
        let clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = clients
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    fn build(&self, descriptor: &ProviderDescriptor) -> Result<Arc<dyn ProviderClient>, GatewayError> {
        let env_var = self.settings.api_key_env_for(descriptor);
        let api_key = self.credentials.get(&env_var);

        if descriptor.requires_api_key && api_key.is_none() {
            return Err(GatewayError::Configuration(format!(
                "{} environment variable is required for {} provider",
                env_var, descriptor.full_name
            )));
        }
        if descriptor.is_local && api_key.is_none() {
            warn!(
                "Using local provider {} without credentials",
                descriptor.full_name
            );
        }

        debug!("Creating client for provider {}", descriptor.full_name);
        self.factory.create(descriptor, &self.settings, api_key)
    }
}

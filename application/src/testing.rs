//! In-memory port implementations shared by the use case tests.

use crate::ports::artifact_store::{ArtifactError, ArtifactStore};
use crate::ports::llm_gateway::{GatewayError, ProviderClient, ProviderClientFactory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use team_domain::{ProviderDescriptor, ProviderSettings, ResolvedTarget};

/// Client answering from a per-model script.
///
/// Unscripted models answer `"{model} says: {prompt}"`.
pub struct ScriptedClient {
    provider: String,
    replies: HashMap<String, Result<String, GatewayError>>,
    delays: HashMap<String, Duration>,
    models: Result<Vec<String>, GatewayError>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            replies: HashMap::new(),
            delays: HashMap::new(),
            models: Ok(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(mut self, model: &str, text: &str) -> Self {
        self.replies.insert(model.to_string(), Ok(text.to_string()));
        self
    }

    pub fn fail(mut self, model: &str, error: GatewayError) -> Self {
        self.replies.insert(model.to_string(), Err(error));
        self
    }

    pub fn delay(mut self, model: &str, delay: Duration) -> Self {
        self.delays.insert(model.to_string(), delay);
        self
    }

    pub fn live_models(mut self, models: Result<Vec<String>, GatewayError>) -> Self {
        self.models = models;
        self
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderClient for ScriptedClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn send(&self, target: &ResolvedTarget, prompt: &str) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.model.clone(), prompt.to_string()));
        if let Some(delay) = self.delays.get(&target.model) {
            tokio::time::sleep(*delay).await;
        }
        match self.replies.get(&target.model) {
            Some(reply) => reply.clone(),
            None => Ok(format!("{} says: {}", target.model, prompt)),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        self.models.clone()
    }
}

/// Factory handing out pre-built clients by provider name
#[derive(Default)]
pub struct StubFactory {
    clients: HashMap<String, Arc<ScriptedClient>>,
    /// Number of `create` calls that must fail before creation succeeds
    failures_left: AtomicUsize,
    pub created: AtomicUsize,
    pub keys_seen: Mutex<Vec<Option<String>>>,
}

impl StubFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(mut self, client: ScriptedClient) -> Self {
        self.clients
            .insert(client.provider.clone(), Arc::new(client));
        self
    }

    pub fn failing_first(self, times: usize) -> Self {
        self.failures_left.store(times, Ordering::SeqCst);
        self
    }

    pub fn client(&self, provider: &str) -> Arc<ScriptedClient> {
        Arc::clone(&self.clients[provider])
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ProviderClientFactory for StubFactory {
    fn create(
        &self,
        descriptor: &ProviderDescriptor,
        _settings: &ProviderSettings,
        api_key: Option<String>,
    ) -> Result<Arc<dyn ProviderClient>, GatewayError> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(GatewayError::Configuration("flaky factory".to_string()));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        self.keys_seen.lock().unwrap().push(api_key);
        self.clients
            .get(&descriptor.full_name)
            .map(|c| Arc::clone(c) as Arc<dyn ProviderClient>)
            .ok_or_else(|| GatewayError::UnsupportedProvider(descriptor.full_name.clone()))
    }
}

/// Artifact store backed by a map
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, String>>,
    read_only_prefix: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_string());
        self
    }

    /// Writes below `prefix` fail
    pub fn read_only_under(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.read_only_prefix = Some(prefix.into());
        self
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn read(&self, path: &Path) -> Result<String, ArtifactError> {
        self.get(path)
            .ok_or_else(|| ArtifactError::NotFound(path.to_path_buf()))
    }

    async fn write(&self, path: &Path, content: &str) -> Result<(), ArtifactError> {
        if let Some(prefix) = &self.read_only_prefix
            && path.starts_with(prefix)
        {
            return Err(ArtifactError::Write {
                path: path.to_path_buf(),
                message: "read-only".to_string(),
            });
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

//! Model resolution use case
//!
//! Turns caller-supplied `provider:model` strings into validated targets.
//! Provider names are normalized through the registry; model names are
//! corrected against the provider's known models, asking the provider
//! itself when the registry has none.

use crate::use_cases::client_cache::ProviderClientCache;
use std::sync::Arc;
use team_domain::resolution::{correct, correct_provider};
use team_domain::{DomainError, ModelCorrection, ModelSpec, ProviderDescriptor, ResolvedTarget};
use tracing::{debug, warn};

/// A validated target together with how its model name was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: ResolvedTarget,
    pub correction: ModelCorrection,
}

/// Resolves model specifiers
pub struct ModelResolver {
    clients: Arc<ProviderClientCache>,
}

impl ModelResolver {
    pub fn new(clients: Arc<ProviderClientCache>) -> Self {
        Self { clients }
    }

    /// Resolve every specifier, preserving order.
    ///
    /// Fails with [`DomainError::Validation`] on an empty list, a malformed
    /// specifier or an unknown provider. Nothing is sent to any model.
    pub async fn validate_and_correct(
        &self,
        specs: &[String],
    ) -> Result<Vec<ResolvedTarget>, DomainError> {
        Ok(self
            .resolve(specs)
            .await?
            .into_iter()
            .map(|r| r.target)
            .collect())
    }

    /// Like [`validate_and_correct`](Self::validate_and_correct), keeping the
    /// correction applied to each entry
    pub async fn resolve(&self, specs: &[String]) -> Result<Vec<Resolution>, DomainError> {
        if specs.is_empty() {
            return Err(DomainError::Validation("No models provided".to_string()));
        }

        let mut resolved = Vec::with_capacity(specs.len());
        for spec in specs {
            resolved.push(self.resolve_one(spec).await?);
        }
        Ok(resolved)
    }

    async fn resolve_one(&self, raw: &str) -> Result<Resolution, DomainError> {
        let spec = ModelSpec::parse(raw)
            .map_err(|e| DomainError::Validation(format!("Invalid model '{}': {}", raw, e)))?;

        let registry = self.clients.registry();
        let descriptor = registry
            .resolve_alias(&correct_provider(registry, &spec.provider))
            .map_err(|_| {
                DomainError::Validation(format!(
                    "Unsupported provider '{}' in model '{}'",
                    spec.provider, raw
                ))
            })?;

        let available = self.available_models(descriptor).await;
        let pair = correct(registry, &spec.provider, &spec.model, &available);
        let (model, correction) = (pair.model, pair.correction);
        if model.is_empty() {
            return Err(DomainError::Validation(format!("Empty model name in '{}'", raw)));
        }

        match &correction {
            ModelCorrection::Fuzzy { requested } => warn!(
                "Model '{}' corrected to '{}' for provider {}",
                requested, model, pair.provider
            ),
            ModelCorrection::Fallback { requested } => warn!(
                "Model '{}' not found for provider {}; using '{}' instead",
                requested, pair.provider, model
            ),
            ModelCorrection::Exact | ModelCorrection::Unverified => {}
        }

        Ok(Resolution {
            target: ResolvedTarget::new(pair.provider, model)
                .with_reasoning_effort(spec.reasoning_effort),
            correction,
        })
    }

    /// Registry list, else the provider's live listing. Listing failures
    /// count as "no known models".
    async fn available_models(&self, descriptor: &ProviderDescriptor) -> Vec<String> {
        if !descriptor.known_models.is_empty() {
            return descriptor.known_models.clone();
        }

        let client = match self.clients.get_client(&descriptor.full_name).await {
            Ok(client) => client,
            Err(e) => {
                debug!("No client for {} while listing models: {}", descriptor.full_name, e);
                return Vec::new();
            }
        };
        match client.list_models().await {
            Ok(models) => models,
            Err(e) => {
                debug!("Listing models of {} failed: {}", descriptor.full_name, e);
                Vec::new()
            }
        }
    }
}

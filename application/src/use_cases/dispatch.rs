//! Prompt dispatcher
//!
//! Sends one prompt to every resolved target. Failures are per target: a
//! batch always yields exactly one [`DispatchResult`] per target, in target
//! order, whatever happens to the individual calls.

use crate::config::DispatchParams;
use crate::ports::llm_gateway::GatewayError;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::client_cache::ProviderClientCache;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use team_domain::{DispatchResult, Phase, ResolvedTarget};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Fans a prompt out to resolved targets
pub struct PromptDispatcher {
    clients: Arc<ProviderClientCache>,
    params: DispatchParams,
    cancellation: Option<CancellationToken>,
}

impl PromptDispatcher {
    pub fn new(clients: Arc<ProviderClientCache>) -> Self {
        Self {
            clients,
            params: DispatchParams::default(),
            cancellation: None,
        }
    }

    pub fn with_params(mut self, params: DispatchParams) -> Self {
        self.params = params;
        self
    }

    /// Calls still in flight when the token fires fail with
    /// [`GatewayError::Cancelled`]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn clients(&self) -> &Arc<ProviderClientCache> {
        &self.clients
    }

    /// Dispatch without progress reporting
    pub async fn dispatch(&self, prompt: &str, targets: &[ResolvedTarget]) -> Vec<DispatchResult> {
        self.dispatch_with_progress(prompt, targets, &Phase::FanOut, &NoProgress)
            .await
    }

    /// Dispatch with progress callbacks, one per completed target
    pub async fn dispatch_with_progress(
        &self,
        prompt: &str,
        targets: &[ResolvedTarget],
        phase: &Phase,
        progress: &dyn ProgressNotifier,
    ) -> Vec<DispatchResult> {
        info!(
            "{}: sending prompt to {} target(s)",
            phase,
            targets.len()
        );
        progress.on_phase_start(phase, targets.len());

        let results: Vec<DispatchResult> = stream::iter(targets.iter().cloned())
            .map(|target| async move {
                let result = match self.send_one(&target, prompt).await {
                    Ok(text) => {
                        info!("{} responded", target);
                        DispatchResult::success(target, text)
                    }
                    Err(e) => {
                        warn!("{} failed: {}", target, e);
                        DispatchResult::failure(target, e)
                    }
                };
                progress.on_task_complete(phase, &result.target, result.is_success());
                result
            })
            .buffered(self.params.concurrency.max(1))
            .collect()
            .await;

        progress.on_phase_complete(phase);
        results
    }

    /// Send to a single target with the per-call timeout
    pub async fn send_one(&self, target: &ResolvedTarget, prompt: &str) -> Result<String, GatewayError> {
        let client = self.clients.get_client(&target.provider).await?;
        debug!("Sending {} bytes to {}", prompt.len(), target);

        let call = async {
            tokio::time::timeout(self.params.timeout, client.send(target, prompt))
                .await
                .map_err(|_| GatewayError::Timeout(self.params.timeout))?
        };

        match &self.cancellation {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(GatewayError::Cancelled),
                result = call => result,
            },
            None => call.await,
        }
    }
}

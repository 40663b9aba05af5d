//! Prompt tools use case
//!
//! The plain fan-out operations: send text or a file's content to several
//! models and return the answers, optionally writing one file per model.

use crate::config::ModelDefaults;
use crate::ports::artifact_store::ArtifactStore;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::dispatch::PromptDispatcher;
use crate::use_cases::error::PipelineError;
use crate::use_cases::resolve_models::ModelResolver;
use crate::use_cases::shared::persist_results;
use std::path::Path;
use std::sync::Arc;
use team_domain::{
    ArtifactFlavor, ArtifactRecord, DispatchResult, OutputOptions, Phase, ResolvedTarget,
};
use tracing::info;

/// Use case behind `prompt`, `prompt_from_file` and `prompt_from_file_to_file`
pub struct PromptToolsUseCase {
    resolver: Arc<ModelResolver>,
    dispatcher: Arc<PromptDispatcher>,
    store: Arc<dyn ArtifactStore>,
    defaults: ModelDefaults,
}

impl PromptToolsUseCase {
    pub fn new(
        resolver: Arc<ModelResolver>,
        dispatcher: Arc<PromptDispatcher>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            store,
            defaults: ModelDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ModelDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Send `text` to every model. An empty model list means the configured
    /// default model.
    pub async fn prompt(
        &self,
        text: &str,
        models: &[String],
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<DispatchResult>, PipelineError> {
        let targets = self.targets(models).await?;
        Ok(self
            .dispatcher
            .dispatch_with_progress(text, &targets, &Phase::FanOut, progress)
            .await)
    }

    /// Read the prompt from `file`, then as [`prompt`](Self::prompt)
    pub async fn prompt_from_file(
        &self,
        file: &Path,
        models: &[String],
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<DispatchResult>, PipelineError> {
        let targets = self.targets(models).await?;
        let text = self.store.read(file).await?;
        Ok(self
            .dispatcher
            .dispatch_with_progress(&text, &targets, &Phase::FanOut, progress)
            .await)
    }

    /// Read the prompt from `file`, send it to every model and write one
    /// artifact per model. Returns the written files in model order; failed
    /// models are represented by their error artifact.
    pub async fn prompt_from_file_to_file(
        &self,
        file: &Path,
        models: &[String],
        options: &OutputOptions,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<ArtifactRecord>, PipelineError> {
        let targets = self.targets(models).await?;
        let text = self.store.read(file).await?;

        let results = self
            .dispatcher
            .dispatch_with_progress(&text, &targets, &Phase::FanOut, progress)
            .await;
        let records =
            persist_results(self.store.as_ref(), &results, file, options, ArtifactFlavor::Raw)
                .await?;

        info!(
            "Wrote {} artifact(s), {} error(s)",
            records.len(),
            records.iter().filter(|r| r.is_error).count()
        );
        Ok(records)
    }

    async fn targets(&self, models: &[String]) -> Result<Vec<ResolvedTarget>, PipelineError> {
        if models.is_empty() {
            let default = std::slice::from_ref(&self.defaults.default_model);
            return Ok(self.resolver.validate_and_correct(default).await?);
        }
        Ok(self.resolver.validate_and_correct(models).await?)
    }
}

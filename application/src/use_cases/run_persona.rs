//! Run Persona use case
//!
//! Wraps the input document in a persona prompt and either asks a single
//! model or runs the full team decision on the wrapped prompt.

use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::error::PipelineError;
use crate::use_cases::run_decision::{RunDecisionUseCase, Stages};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use team_domain::{
    ArtifactFlavor, ArtifactName, ArtifactPathResolver, ArtifactRecord, ArtifactRequest,
    DecisionOutcome, DispatchResult, OutputOptions, Persona, Phase, sanitize_model,
};
use tracing::{info, warn};

/// Input for the RunPersona use case
#[derive(Debug, Clone)]
pub struct RunPersonaInput {
    pub persona: Persona,
    pub source_file: PathBuf,
    /// Single-model mode: the first entry is used; empty means the default model
    pub models: Vec<String>,
    /// Run the team decision instead of a single model
    pub use_decision_maker: bool,
    /// Decision mode team; `None` uses the configured team
    pub team: Option<Vec<String>>,
    pub decision_model: Option<String>,
    pub options: OutputOptions,
    pub decision_template: Option<String>,
}

impl RunPersonaInput {
    pub fn new(persona: Persona, source_file: impl Into<PathBuf>) -> Self {
        Self {
            persona,
            source_file: source_file.into(),
            models: Vec::new(),
            use_decision_maker: false,
            team: None,
            decision_model: None,
            options: OutputOptions::default(),
            decision_template: None,
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn with_decision(mut self, team: Option<Vec<String>>, decision_model: Option<String>) -> Self {
        self.use_decision_maker = true;
        self.team = team;
        self.decision_model = decision_model;
        self
    }

    pub fn with_options(mut self, options: OutputOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_decision_template(mut self, template: impl Into<String>) -> Self {
        self.decision_template = Some(template.into());
        self
    }
}

/// Result of a persona run
#[derive(Debug, Clone)]
pub enum PersonaOutcome {
    Single(ArtifactRecord),
    Decision(DecisionOutcome),
}

impl PersonaOutcome {
    /// Path of the persona document
    pub fn path(&self) -> &Path {
        match self {
            PersonaOutcome::Single(record) => &record.path,
            PersonaOutcome::Decision(outcome) => &outcome.decision_path,
        }
    }
}

/// Use case for running a persona
pub struct RunPersonaUseCase {
    decision: Arc<RunDecisionUseCase>,
}

impl RunPersonaUseCase {
    pub fn new(decision: Arc<RunDecisionUseCase>) -> Self {
        Self { decision }
    }

    pub async fn execute(&self, input: RunPersonaInput) -> Result<PersonaOutcome, PipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: RunPersonaInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<PersonaOutcome, PipelineError> {
        if input.use_decision_maker {
            self.run_decision(input, progress)
                .await
                .map(PersonaOutcome::Decision)
        } else {
            self.run_single(input, progress)
                .await
                .map(PersonaOutcome::Single)
        }
    }

    async fn run_single(
        &self,
        input: RunPersonaInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ArtifactRecord, PipelineError> {
        let models = if input.models.is_empty() {
            vec![self.decision.defaults().default_model.clone()]
        } else {
            input.models.clone()
        };
        let target = self
            .decision
            .resolver()
            .validate_and_correct(&models)
            .await?
            .remove(0);

        let document = self.decision.store().read(&input.source_file).await?;
        let prompt = input.persona.render(&document);
        info!("Running persona {} with {}", input.persona.name, target);

        let request = |name: ArtifactName| ArtifactRequest {
            source_file: &input.source_file,
            name,
            options: &input.options,
            single_target: true,
            flavor: ArtifactFlavor::Persona,
        };
        let output = ArtifactPathResolver::resolve(&request(ArtifactName::label(format!(
            "{}_{}_{}",
            input.persona.name,
            target.provider,
            sanitize_model(&target.model)
        ))));
        let error_output =
            ArtifactPathResolver::resolve_error(&request(ArtifactName::label(&input.persona.name)));

        progress.on_phase_start(&Phase::FanOut, 1);
        let sent = self.decision.dispatcher().send_one(&target, &prompt).await;
        progress.on_task_complete(&Phase::FanOut, &target, sent.is_ok());
        progress.on_phase_complete(&Phase::FanOut);

        let written = match sent {
            Ok(text) => self
                .decision
                .store()
                .write(&output, &text)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match written {
            Ok(()) => Ok(ArtifactRecord::response(target.label(), output)),
            Err(detail) => {
                let failure = DispatchResult::failure(target, detail);
                warn!("Persona {} failed: {}", input.persona.name, failure.text());
                if let Err(e) = self.decision.store().write(&error_output, failure.text()).await {
                    warn!("Could not write {}: {}", error_output.display(), e);
                }
                Err(PipelineError::Tool(failure.text().to_string()))
            }
        }
    }

    async fn run_decision(
        &self,
        input: RunPersonaInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DecisionOutcome, PipelineError> {
        let panel = self
            .decision
            .panel(input.team.as_deref(), input.decision_model.as_deref())
            .await?;

        let document = self.decision.store().read(&input.source_file).await?;
        let prompt = input.persona.render(&document);

        self.decision
            .run_stages(
                &panel,
                Stages {
                    prompt: &prompt,
                    source_file: &input.source_file,
                    options: &input.options,
                    template: input.decision_template.as_deref(),
                    final_label: &input.persona.name,
                },
                progress,
            )
            .await
    }
}

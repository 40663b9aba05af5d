//! Run Decision use case
//!
//! Orchestrates the two-stage decision flow:
//!
//! 1. **Fan-out**: every team member answers the prompt; each answer (or
//!    error) is written under the team directory.
//! 2. **Synthesis**: the successful answers are read back, rendered into the
//!    decision template and sent once to the decision maker, whose answer
//!    becomes the final artifact.

use crate::config::ModelDefaults;
use crate::ports::artifact_store::ArtifactStore;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::dispatch::PromptDispatcher;
use crate::use_cases::error::PipelineError;
use crate::use_cases::resolve_models::ModelResolver;
use crate::use_cases::shared::persist_results;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use team_domain::artifact::parent_dir;
use team_domain::{
    ArtifactFlavor, ArtifactName, ArtifactPathResolver, ArtifactRecord, ArtifactRequest,
    DecisionOutcome, DispatchResult, MIN_TEAM_SIZE, OutputOptions, Phase, ResolvedTarget,
    SynthesisRequest, TeamResponse,
};
use tracing::{info, warn};

/// Label of the final artifact of a plain decision run
pub const DECISION_LABEL: &str = "decision";

/// Input for the RunDecision use case
#[derive(Debug, Clone)]
pub struct RunDecisionInput {
    /// File holding the original prompt
    pub source_file: PathBuf,
    /// Team specifiers; `None` uses the configured team
    pub team: Option<Vec<String>>,
    /// Decision maker specifier; `None` uses the configured one
    pub decision_model: Option<String>,
    pub options: OutputOptions,
    /// Custom template with `{original_prompt}` and `{team_responses}`
    pub template: Option<String>,
}

impl RunDecisionInput {
    pub fn new(source_file: impl Into<PathBuf>) -> Self {
        Self {
            source_file: source_file.into(),
            team: None,
            decision_model: None,
            options: OutputOptions::default(),
            template: None,
        }
    }

    pub fn with_team(mut self, team: Vec<String>) -> Self {
        self.team = Some(team);
        self
    }

    pub fn with_decision_model(mut self, model: impl Into<String>) -> Self {
        self.decision_model = Some(model.into());
        self
    }

    pub fn with_options(mut self, options: OutputOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Validated team and decision maker
#[derive(Debug, Clone)]
pub(crate) struct Panel {
    pub team: Vec<ResolvedTarget>,
    pub judge: ResolvedTarget,
}

/// What stage 2 needs besides the panel
pub(crate) struct Stages<'a> {
    pub prompt: &'a str,
    pub source_file: &'a Path,
    pub options: &'a OutputOptions,
    pub template: Option<&'a str>,
    /// Seed of the final artifact name
    pub final_label: &'a str,
}

/// Use case for running a team decision
pub struct RunDecisionUseCase {
    resolver: Arc<ModelResolver>,
    dispatcher: Arc<PromptDispatcher>,
    store: Arc<dyn ArtifactStore>,
    defaults: ModelDefaults,
}

impl RunDecisionUseCase {
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

    pub fn defaults(&self) -> &ModelDefaults {
        &self.defaults
    }

    pub(crate) fn store(&self) -> &dyn ArtifactStore {
        self.store.as_ref()
    }

    pub(crate) fn resolver(&self) -> &ModelResolver {
        &self.resolver
    }

    pub(crate) fn dispatcher(&self) -> &PromptDispatcher {
        &self.dispatcher
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDecisionInput) -> Result<DecisionOutcome, PipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDecisionInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DecisionOutcome, PipelineError> {
        let panel = self
            .panel(input.team.as_deref(), input.decision_model.as_deref())
            .await?;

        let prompt = self.store.read(&input.source_file).await?;

        self.run_stages(
            &panel,
            Stages {
                prompt: &prompt,
                source_file: &input.source_file,
                options: &input.options,
                template: input.template.as_deref(),
                final_label: DECISION_LABEL,
            },
            progress,
        )
        .await
    }

    /// Check team size and resolve every specifier. Nothing is read or sent.
    pub(crate) async fn panel(
        &self,
        team: Option<&[String]>,
        decision_model: Option<&str>,
    ) -> Result<Panel, PipelineError> {
        let team = team.unwrap_or(self.defaults.team.as_slice());
        if team.len() < MIN_TEAM_SIZE {
            return Err(PipelineError::Validation(format!(
                "At least {} team member models must be provided for decision making",
                MIN_TEAM_SIZE
            )));
        }

        let team = self.resolver.validate_and_correct(team).await?;
        let judge_spec = decision_model.unwrap_or(self.defaults.decision_maker.as_str());
        let judge = self
            .resolver
            .validate_and_correct(&[judge_spec.to_string()])
            .await?
            .remove(0);

        Ok(Panel { team, judge })
    }

    /// Both stages on an already-read prompt
    pub(crate) async fn run_stages(
        &self,
        panel: &Panel,
        stages: Stages<'_>,
        progress: &dyn ProgressNotifier,
    ) -> Result<DecisionOutcome, PipelineError> {
        info!(
            "Starting decision with {} team member(s), decided by {}",
            panel.team.len(),
            panel.judge
        );

        let team_dir = team_directory(stages.source_file, stages.options);
        let team_options = OutputOptions {
            output_path: None,
            output_dir: Some(team_dir.clone()),
            output_extension: stages.options.output_extension.clone(),
        };

        // Phase 1: Fan-out
        let results = self
            .dispatcher
            .dispatch_with_progress(stages.prompt, &panel.team, &Phase::FanOut, progress)
            .await;
        let team = persist_results(
            self.store.as_ref(),
            &results,
            stages.source_file,
            &team_options,
            ArtifactFlavor::Raw,
        )
        .await?;

        // Phase 2: Synthesis
        let final_options = OutputOptions {
            output_path: stages.options.output_path.clone(),
            output_dir: Some(team_dir),
            output_extension: stages.options.output_extension.clone(),
        };
        let location = ArtifactPathResolver::locate(&ArtifactRequest {
            source_file: stages.source_file,
            name: ArtifactName::label(stages.final_label),
            options: &final_options,
            single_target: true,
            flavor: ArtifactFlavor::Persona,
        });

        progress.on_phase_start(&Phase::Synthesis, 1);
        let decision = self
            .synthesize(panel, &team, stages.prompt, stages.template)
            .await;
        progress.on_task_complete(&Phase::Synthesis, &panel.judge, decision.is_ok());
        progress.on_phase_complete(&Phase::Synthesis);

        let written = match decision {
            Ok(text) => {
                let path = location.path();
                self.store
                    .write(&path, &text)
                    .await
                    .map(|_| path)
                    .map_err(|e| e.to_string())
            }
            Err(detail) => Err(detail),
        };

        match written {
            Ok(decision_path) => {
                info!("Decision written to {}", decision_path.display());
                Ok(DecisionOutcome {
                    decision_path,
                    decision_model: panel.judge.label(),
                    team,
                })
            }
            Err(detail) => {
                let failure = DispatchResult::failure(panel.judge.clone(), detail);
                let error_path = location.error_path();
                warn!("Decision failed: {}", failure.text());
                if let Err(e) = self.store.write(&error_path, failure.text()).await {
                    warn!("Could not write {}: {}", error_path.display(), e);
                }
                Err(PipelineError::Tool(failure.text().to_string()))
            }
        }
    }

    /// Read the successful team artifacts back and ask the decision maker.
    /// Errors are returned as plain detail text.
    async fn synthesize(
        &self,
        panel: &Panel,
        team: &[ArtifactRecord],
        prompt: &str,
        template: Option<&str>,
    ) -> Result<String, String> {
        let mut request = SynthesisRequest::new(prompt);
        for record in team.iter().filter(|r| !r.is_error) {
            let text = self
                .store
                .read(&record.path)
                .await
                .map_err(|e| e.to_string())?;
            request = request.with_response(TeamResponse::new(record.label.clone(), text));
        }
        if request.team_responses.is_empty() {
            warn!("Every team member failed; the decision maker only sees the prompt");
        }

        let rendered = match template {
            Some(template) => request.render(template),
            None => request.render_default(),
        };
        self.dispatcher
            .send_one(&panel.judge, &rendered)
            .await
            .map_err(|e| e.to_string())
    }
}

/// `output_dir`, else the directory of `output_path`, else
/// `{source dir}/responses`
pub fn team_directory(source_file: &Path, options: &OutputOptions) -> PathBuf {
    if let Some(dir) = &options.output_dir {
        return dir.clone();
    }
    if let Some(path) = &options.output_path {
        return parent_dir(path);
    }
    parent_dir(source_file).join("responses")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::credentials::StaticCredentials;
    use crate::ports::llm_gateway::GatewayError;
    use crate::testing::{MemoryStore, ScriptedClient, StubFactory};
    use crate::use_cases::client_cache::ProviderClientCache;
    use team_domain::ProviderRegistry;

    struct Fixture {
        use_case: RunDecisionUseCase,
        store: Arc<MemoryStore>,
        factory: Arc<StubFactory>,
    }

    fn fixture(factory: StubFactory, store: MemoryStore) -> Fixture {
        let factory = Arc::new(factory);
        let store = Arc::new(store);
        let cache = Arc::new(ProviderClientCache::new(
            Arc::new(ProviderRegistry::builtin()),
            Arc::clone(&factory) as Arc<dyn crate::ports::llm_gateway::ProviderClientFactory>,
            Arc::new(StaticCredentials::new()),
        ));
        let use_case = RunDecisionUseCase::new(
            Arc::new(ModelResolver::new(Arc::clone(&cache))),
            Arc::new(PromptDispatcher::new(cache)),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
        );
        Fixture {
            use_case,
            store,
            factory,
        }
    }

    fn france_client() -> ScriptedClient {
        ScriptedClient::new("testing")
            .reply("model1", "Paris is the capital of France.")
            .reply("model2", "The capital of France is Paris.")
            .reply("judge", "Team Decision: Paris")
    }

    fn team(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn france_end_to_end() {
        let fx = fixture(
            StubFactory::new().with_client(france_client()),
            MemoryStore::new().with_file("/test/prompt.txt", "What is the capital of France?"),
        );
        let input = RunDecisionInput::new("/test/prompt.txt")
            .with_team(team(&["testing:model1", "t:model2"]))
            .with_decision_model("testing:judge");

        let outcome = fx.use_case.execute(input).await.unwrap();

        assert_eq!(outcome.decision_path, PathBuf::from("/test/responses/prompt_decision.md"));
        assert_eq!(outcome.decision_model, "testing:judge");
        assert_eq!(
            outcome.team.iter().map(|r| r.path.clone()).collect::<Vec<_>>(),
            vec![
                PathBuf::from("/test/responses/prompt_testing_model1.txt"),
                PathBuf::from("/test/responses/prompt_testing_model2.txt"),
            ]
        );
        assert_eq!(
            fx.store.get("/test/responses/prompt_decision.md").unwrap(),
            "Team Decision: Paris"
        );

        // the judge saw both labelled answers and the original question
        let calls = fx.factory.client("testing").prompts();
        let (model, judge_prompt) = calls.last().unwrap();
        assert_eq!(model, "judge");
        assert!(judge_prompt.contains("What is the capital of France?"));
        assert!(judge_prompt.contains("<model-name>testing:model1</model-name>"));
        assert!(judge_prompt.contains("The capital of France is Paris."));
    }

    #[tokio::test]
    async fn one_member_team_fails_before_any_activity() {
        let fx = fixture(
            StubFactory::new().with_client(france_client()),
            MemoryStore::new().with_file("/test/prompt.txt", "q"),
        );
        let err = fx
            .use_case
            .execute(RunDecisionInput::new("/test/prompt.txt").with_team(team(&["t:model1"])))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "validation");
        assert_eq!(fx.store.paths(), vec![PathBuf::from("/test/prompt.txt")]);
        assert!(fx.factory.client("testing").prompts().is_empty());
    }

    #[tokio::test]
    async fn invalid_decision_model_fails_before_any_activity() {
        let fx = fixture(
            StubFactory::new().with_client(france_client()),
            MemoryStore::new().with_file("/test/prompt.txt", "q"),
        );
        let err = fx
            .use_case
            .execute(
                RunDecisionInput::new("/test/prompt.txt")
                    .with_team(team(&["t:model1", "t:model2"]))
                    .with_decision_model("judge-without-provider"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(fx.factory.client("testing").prompts().is_empty());
    }

    #[tokio::test]
    async fn missing_prompt_file_is_a_resource_error() {
        let fx = fixture(StubFactory::new().with_client(france_client()), MemoryStore::new());
        let err = fx
            .use_case
            .execute(
                RunDecisionInput::new("/test/none.txt")
                    .with_team(team(&["t:model1", "t:model2"]))
                    .with_decision_model("t:judge"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "resource");
    }

    #[tokio::test]
    async fn failing_member_only_produces_its_error_artifact() {
        let client = france_client().fail(
            "model2",
            GatewayError::RequestFailed("overloaded".to_string()),
        );
        let fx = fixture(
            StubFactory::new().with_client(client),
            MemoryStore::new().with_file("/test/prompt.txt", "What is the capital of France?"),
        );

        let outcome = fx
            .use_case
            .execute(
                RunDecisionInput::new("/test/prompt.txt")
                    .with_team(team(&["t:model1", "t:model2"]))
                    .with_decision_model("t:judge"),
            )
            .await
            .unwrap();

        assert_eq!(outcome.successful_team().count(), 1);
        let failed: Vec<_> = outcome.failed_team().collect();
        assert_eq!(
            failed[0].path,
            PathBuf::from("/test/responses/prompt_testing_model2_error.txt")
        );

        let (_, judge_prompt) = fx.factory.client("testing").prompts().pop().unwrap();
        assert!(judge_prompt.contains("testing:model1"));
        assert!(!judge_prompt.contains("overloaded"));
    }

    #[tokio::test]
    async fn failing_judge_writes_error_artifact_and_keeps_team_files() {
        let client = france_client().fail(
            "judge",
            GatewayError::RequestFailed("quota".to_string()),
        );
        let fx = fixture(
            StubFactory::new().with_client(client),
            MemoryStore::new().with_file("/test/prompt.txt", "q"),
        );

        let err = fx
            .use_case
            .execute(
                RunDecisionInput::new("/test/prompt.txt")
                    .with_team(team(&["t:model1", "t:model2"]))
                    .with_decision_model("t:judge"),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PipelineError::Tool("Error from testing:judge: Request failed: quota".to_string())
        );
        assert_eq!(
            fx.store.get("/test/responses/prompt_decision_error.md").unwrap(),
            "Error from testing:judge: Request failed: quota"
        );
        assert!(fx.store.get("/test/responses/prompt_testing_model1.txt").is_some());
        assert!(fx.store.get("/test/responses/prompt_decision.md").is_none());
    }

    #[tokio::test]
    async fn output_path_sets_team_dir_and_final_file() {
        let fx = fixture(
            StubFactory::new().with_client(france_client()),
            MemoryStore::new().with_file("/test/prompt.txt", "q"),
        );
        let outcome = fx
            .use_case
            .execute(
                RunDecisionInput::new("/test/prompt.txt")
                    .with_team(team(&["t:model1", "t:model2"]))
                    .with_decision_model("t:judge")
                    .with_options(OutputOptions::default().with_output_path("/out/final.md")),
            )
            .await
            .unwrap();

        assert_eq!(outcome.decision_path, PathBuf::from("/out/final.md"));
        assert_eq!(outcome.team[0].path, PathBuf::from("/out/prompt_testing_model1.txt"));
    }

    #[tokio::test]
    async fn custom_template_is_used() {
        let fx = fixture(
            StubFactory::new().with_client(france_client()),
            MemoryStore::new().with_file("/test/prompt.txt", "Q?"),
        );
        fx.use_case
            .execute(
                RunDecisionInput::new("/test/prompt.txt")
                    .with_team(team(&["t:model1", "t:model2"]))
                    .with_decision_model("t:judge")
                    .with_template("PROMPT={original_prompt}"),
            )
            .await
            .unwrap();

        let (_, judge_prompt) = fx.factory.client("testing").prompts().pop().unwrap();
        assert_eq!(judge_prompt, "PROMPT=Q?");
    }

    #[test]
    fn team_directory_precedence() {
        let source = Path::new("/in/p.txt");
        assert_eq!(
            team_directory(source, &OutputOptions::default()),
            PathBuf::from("/in/responses")
        );
        assert_eq!(
            team_directory(source, &OutputOptions::default().with_output_path("/o/x.md")),
            PathBuf::from("/o")
        );
        assert_eq!(
            team_directory(
                source,
                &OutputOptions::default()
                    .with_output_path("/o/x.md")
                    .with_output_dir("/d")
            ),
            PathBuf::from("/d")
        );
    }
}

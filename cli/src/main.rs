//! CLI entrypoint for agile-team
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use team_application::{
    ArtifactStore, ModelResolver, NoProgress, ProgressNotifier, PromptDispatcher,
    PromptToolsUseCase, ProviderClientCache, RunDecisionInput, RunDecisionUseCase,
    RunPersonaInput, RunPersonaUseCase, TeamConfig,
};
use team_infrastructure::{
    ConfigLoader, EnvCredentials, FileConfig, HttpClientFactory, LocalArtifactStore,
};
use team_presentation::{
    Cli, Command, ConsoleFormatter, DecisionArgs, ProgressReporter, SimpleProgress,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Use cases and shared services built once per invocation
struct App {
    cache: Arc<ProviderClientCache>,
    store: Arc<dyn ArtifactStore>,
    prompt_tools: PromptToolsUseCase,
    decision: Arc<RunDecisionUseCase>,
    persona: RunPersonaUseCase,
}

impl App {
    fn new(file_config: &FileConfig, cancel: CancellationToken) -> Result<Self> {
        let config: TeamConfig = file_config.to_team_config();
        let registry = file_config
            .registry()
            .context("invalid [providers] configuration")?;

        // === Dependency Injection ===
        let cache = Arc::new(
            ProviderClientCache::new(
                Arc::new(registry),
                Arc::new(HttpClientFactory::new()),
                Arc::new(EnvCredentials::new()),
            )
            .with_settings(config.providers().clone()),
        );
        let resolver = Arc::new(ModelResolver::new(Arc::clone(&cache)));
        let dispatcher = Arc::new(
            PromptDispatcher::new(Arc::clone(&cache))
                .with_params(config.dispatch().clone())
                .with_cancellation(cancel),
        );
        let store: Arc<dyn ArtifactStore> = Arc::new(LocalArtifactStore::new());

        let prompt_tools = PromptToolsUseCase::new(
            Arc::clone(&resolver),
            Arc::clone(&dispatcher),
            Arc::clone(&store),
        )
        .with_defaults(config.models().clone());
        let decision = Arc::new(
            RunDecisionUseCase::new(resolver, dispatcher, Arc::clone(&store))
                .with_defaults(config.models().clone()),
        );
        let persona = RunPersonaUseCase::new(Arc::clone(&decision));

        Ok(Self {
            cache,
            store,
            prompt_tools,
            decision,
            persona,
        })
    }

    async fn read_template(&self, args: &DecisionArgs) -> Result<Option<String>> {
        match &args.template {
            Some(path) => Ok(Some(self.store.read(path).await?)),
            None => Ok(None),
        }
    }

    /// Run one subcommand and return what goes to stdout
    async fn run(&self, command: Command, json: bool, progress: &dyn ProgressNotifier) -> Result<String> {
        let output = match command {
            Command::Prompt { text, models } => {
                let results = self.prompt_tools.prompt(&text, &models, progress).await?;
                if json {
                    ConsoleFormatter::format_json(&results)
                } else {
                    ConsoleFormatter::format_results(&results)
                }
            }
            Command::PromptFile { file, models } => {
                let results = self
                    .prompt_tools
                    .prompt_from_file(&file, &models, progress)
                    .await?;
                if json {
                    ConsoleFormatter::format_json(&results)
                } else {
                    ConsoleFormatter::format_results(&results)
                }
            }
            Command::PromptFileToFile {
                file,
                models,
                output,
            } => {
                let records = self
                    .prompt_tools
                    .prompt_from_file_to_file(&file, &models, &output.to_options(), progress)
                    .await?;
                if json {
                    ConsoleFormatter::format_json(&records)
                } else {
                    ConsoleFormatter::format_records(&records)
                }
            }
            Command::Decide {
                file,
                models,
                decision,
                output,
            } => {
                let mut input = RunDecisionInput::new(file).with_options(output.to_options());
                if !models.is_empty() {
                    input = input.with_team(models);
                }
                if let Some(model) = &decision.decision_model {
                    input = input.with_decision_model(model);
                }
                if let Some(template) = self.read_template(&decision).await? {
                    input = input.with_template(template);
                }

                let outcome = self.decision.execute_with_progress(input, progress).await?;
                if json {
                    ConsoleFormatter::format_json(&outcome)
                } else {
                    ConsoleFormatter::format_decision(&outcome)
                }
            }
            Command::Persona {
                persona,
                file,
                models,
                decision,
                decision_args,
                output,
            } => {
                let mut input = RunPersonaInput::new(persona.persona(), file)
                    .with_options(output.to_options());
                if decision {
                    let team = (!models.is_empty()).then_some(models);
                    input = input.with_decision(team, decision_args.decision_model.clone());
                    if let Some(template) = self.read_template(&decision_args).await? {
                        input = input.with_decision_template(template);
                    }
                } else {
                    input = input.with_models(models);
                }

                let outcome = self.persona.execute_with_progress(input, progress).await?;
                if json {
                    ConsoleFormatter::format_persona_json(&outcome)
                } else {
                    ConsoleFormatter::format_persona(&outcome)
                }
            }
            Command::Providers { detailed } => {
                let listing = self.cache.registry().list_providers(detailed);
                if json {
                    ConsoleFormatter::format_json(&listing)
                } else {
                    ConsoleFormatter::format_providers(&listing)
                }
            }
            Command::Models { provider, live } => {
                let models = if live {
                    self.cache.get_client(&provider).await?.list_models().await?
                } else {
                    self.cache.registry().list_models(&provider)?.to_vec()
                };
                if json {
                    ConsoleFormatter::format_json(&models)
                } else {
                    ConsoleFormatter::format_models(&provider, &models)
                }
            }
        };
        Ok(output)
    }
}

fn init_logging(verbose: u8) {
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.clone())
        .collect();
    if !errors.is_empty() {
        bail!("invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(config)
}

fn show_config(explicit: Option<&Path>, config: &FileConfig) -> Result<()> {
    ConfigLoader::print_config_sources(explicit);
    eprintln!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("Starting agile-team");

    let config = load_config(&cli)?;

    if cli.show_config {
        return show_config(cli.config.as_deref(), &config);
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling outstanding requests");
                cancel.cancel();
            }
        });
    }

    let app = App::new(&config, cancel)?;

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let output = app.run(command, cli.json, progress.as_ref()).await?;
    print!("{}", output);
    if cli.json {
        println!();
    }

    Ok(())
}

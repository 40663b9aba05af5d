//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use team_domain::{OutputOptions, Persona};

/// Built-in personas
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PersonaKind {
    /// Project brief from a rough idea
    BusinessAnalyst,
    /// Product requirements document from a brief
    ProductManager,
    /// Technical design from requirements
    SoftwareEngineer,
}

impl PersonaKind {
    pub fn persona(self) -> Persona {
        match self {
            PersonaKind::BusinessAnalyst => Persona::business_analyst(),
            PersonaKind::ProductManager => Persona::product_manager(),
            PersonaKind::SoftwareEngineer => Persona::software_engineer(),
        }
    }
}

/// Where response files go
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Directory for response files (default: next to the input file)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extension for response files, with or without the dot
    #[arg(long, value_name = "EXT")]
    pub output_extension: Option<String>,

    /// Exact output file; with several models it becomes a name template
    #[arg(long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,
}

impl OutputArgs {
    pub fn to_options(&self) -> OutputOptions {
        OutputOptions {
            output_path: self.output_path.clone(),
            output_dir: self.output_dir.clone(),
            output_extension: self.output_extension.clone(),
        }
    }
}

/// Decision-maker settings shared by `decide` and `persona --decision`
#[derive(Args, Debug, Clone, Default)]
pub struct DecisionArgs {
    /// Model that synthesizes the team responses
    #[arg(long, value_name = "MODEL")]
    pub decision_model: Option<String>,

    /// Custom synthesis template with `{original_prompt}` and
    /// `{team_responses}` placeholders
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Send a prompt to one or more models and print the answers
    Prompt {
        /// The prompt text
        text: String,

        /// Model specifier `provider:model[:effort]` (repeatable)
        #[arg(short, long = "model", value_name = "MODEL")]
        models: Vec<String>,
    },

    /// Send the content of a file to one or more models and print the answers
    PromptFile {
        file: PathBuf,

        #[arg(short, long = "model", value_name = "MODEL")]
        models: Vec<String>,
    },

    /// Send the content of a file to models and write one file per model
    PromptFileToFile {
        file: PathBuf,

        #[arg(short, long = "model", value_name = "MODEL")]
        models: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Ask a team of models, then let a decision maker synthesize their answers
    Decide {
        file: PathBuf,

        /// Team member (repeatable, at least two; default: configured team)
        #[arg(short, long = "model", value_name = "MODEL")]
        models: Vec<String>,

        #[command(flatten)]
        decision: DecisionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run a document through a persona prompt
    Persona {
        #[arg(value_enum)]
        persona: PersonaKind,

        file: PathBuf,

        /// Single mode: the model to use; decision mode: team member (repeatable)
        #[arg(short, long = "model", value_name = "MODEL")]
        models: Vec<String>,

        /// Use a team plus decision maker instead of a single model
        #[arg(long)]
        decision: bool,

        #[command(flatten)]
        decision_args: DecisionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List provider names and aliases
    Providers {
        /// Show each provider with its aliases
        #[arg(long)]
        detailed: bool,
    },

    /// List the models known for a provider
    Models {
        /// Provider name or alias
        provider: String,

        /// Ask the provider API instead of the built-in list
        #[arg(long)]
        live: bool,
    },
}

/// CLI arguments for agile-team
#[derive(Parser, Debug)]
#[command(name = "agile-team")]
#[command(author, version, about = "Route prompts to many LLMs and let a team decide")]
#[command(long_about = r#"
agile-team sends prompts to several LLM providers at once and can turn
their answers into one decision.

Models are given as provider:model or provider:model:effort. Providers may be
abbreviated: o=openai a=anthropic g=gemini q=groq d=deepseek l=ollama t=testing.

Configuration files are loaded from (in priority order):
1. AGILE_TEAM_* environment variables
2. --config <path>           Explicit config file
3. ./agile-team.toml         Project-level config
4. ~/.config/agile-team/config.toml   Global config

Example:
  agile-team prompt "What is the capital of France?" -m o:gpt-4o -m a:claude-3-5-haiku
  agile-team decide question.md -m o:gpt-4.1 -m g:gemini-2.5-pro --decision-model o:o4-mini:high
  agile-team persona business-analyst idea.md --decision
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_models() {
        let cli = Cli::parse_from(["agile-team", "prompt", "hi", "-m", "o:gpt-4o", "--model", "t:x"]);
        let Some(Command::Prompt { text, models }) = cli.command else {
            panic!("expected prompt");
        };
        assert_eq!(text, "hi");
        assert_eq!(models, vec!["o:gpt-4o", "t:x"]);
    }

    #[test]
    fn parses_output_options() {
        let cli = Cli::parse_from([
            "agile-team",
            "prompt-file-to-file",
            "in.txt",
            "-m",
            "t:a",
            "--output-dir",
            "out",
            "--output-extension",
            "py",
        ]);
        let Some(Command::PromptFileToFile { output, .. }) = cli.command else {
            panic!("expected prompt-file-to-file");
        };
        let options = output.to_options();
        assert_eq!(options.output_dir, Some(PathBuf::from("out")));
        assert_eq!(options.output_extension.as_deref(), Some("py"));
        assert!(options.output_path.is_none());
    }

    #[test]
    fn parses_persona_with_decision() {
        let cli = Cli::parse_from([
            "agile-team",
            "-vv",
            "persona",
            "product-manager",
            "brief.md",
            "--decision",
            "--decision-model",
            "a:claude-3-opus",
        ]);
        assert_eq!(cli.verbose, 2);
        let Some(Command::Persona {
            persona,
            decision,
            decision_args,
            ..
        }) = cli.command
        else {
            panic!("expected persona");
        };
        assert_eq!(persona.persona().name, "product_manager");
        assert!(decision);
        assert_eq!(decision_args.decision_model.as_deref(), Some("a:claude-3-opus"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["agile-team", "providers", "--detailed", "--json", "-q"]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Command::Providers { detailed: true })));
    }
}

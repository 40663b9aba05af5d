//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Conversion into application types happens in [`FileConfig::to_team_config`].

mod dispatch;
mod models;
mod providers;

pub use dispatch::FileDispatchConfig;
pub use models::FileModelsConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};

use super::validation::ConfigIssue;
use serde::{Deserialize, Serialize};
use team_application::TeamConfig;
use team_domain::{DomainError, ProviderRegistry};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Default models for single-model and decision runs
    pub models: FileModelsConfig,
    /// Fan-out settings
    pub dispatch: FileDispatchConfig,
    /// Provider settings and custom providers
    pub providers: FileProvidersConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.models.validate());
        issues.extend(self.dispatch.validate());
        issues.extend(self.providers.validate(&ProviderRegistry::builtin()));
        issues
    }

    pub fn to_team_config(&self) -> TeamConfig {
        TeamConfig::new(
            self.models.to_model_defaults(),
            self.dispatch.to_dispatch_params(),
            self.providers.to_provider_settings(),
        )
    }

    /// Provider registry including custom `[providers.<name>]` entries
    pub fn registry(&self) -> Result<ProviderRegistry, DomainError> {
        self.providers.to_registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[models]
default_model = "anthropic:claude-3-5-haiku"
team = ["o:gpt-4o", "g:gemini-2.5-flash"]
decision_maker = "openai:o3:high"

[dispatch]
concurrency = 2
timeout_seconds = 30

[providers]
max_tokens = 2048

[providers.ollama]
base_url = "http://gpu-box:11434"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let team = config.to_team_config();
        assert_eq!(team.models().default_model, "anthropic:claude-3-5-haiku");
        assert_eq!(team.models().team, vec!["o:gpt-4o", "g:gemini-2.5-flash"]);
        assert_eq!(team.dispatch().concurrency, 2);
        assert_eq!(team.dispatch().timeout, Duration::from_secs(30));
        assert_eq!(team.providers().max_tokens, 2048);

        let registry = config.registry().unwrap();
        let ollama = registry.resolve_alias("ollama").unwrap();
        assert_eq!(team.providers().base_url_for(ollama), Some("http://gpu-box:11434"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[dispatch]\nconcurrency = 1\n").unwrap();
        assert_eq!(config.dispatch.concurrency, 1);
        assert_eq!(config.dispatch.timeout_seconds, 120);
        assert_eq!(config.models, FileModelsConfig::default());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_default_config_serializes() {
        let text = toml::to_string_pretty(&FileConfig::default()).unwrap();
        assert!(text.contains("[dispatch]"));
        assert!(text.contains("timeout_seconds = 120"));
    }
}

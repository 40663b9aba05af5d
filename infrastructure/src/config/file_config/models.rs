//! Model defaults from TOML (`[models]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use team_application::ModelDefaults;
use team_domain::ModelSpec;

/// Model specifiers used when a command does not name any
///
/// # Example
///
/// ```toml
/// [models]
/// default_model = "openai:gpt-4o-mini"
/// team = ["openai:gpt-4.1", "anthropic:claude-3-7-sonnet", "gemini:gemini-2.5-pro"]
/// decision_maker = "openai:o4-mini:high"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Model for `prompt`, `prompt-file` and single-model personas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    /// Team members for decision runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<String>>,
    /// Model that synthesizes the team responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_maker: Option<String>,
}

impl FileModelsConfig {
    fn check_spec(field: &str, value: &str, issues: &mut Vec<ConfigIssue>) {
        if let Err(e) = ModelSpec::parse(value) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MalformedModel {
                    field: field.to_string(),
                    value: value.to_string(),
                },
                format!("{}: {}", field, e),
            ));
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(model) = &self.default_model {
            Self::check_spec("models.default_model", model, &mut issues);
        }
        if let Some(team) = &self.team {
            if team.is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyTeam,
                    "models.team: team cannot be empty",
                ));
            }
            for member in team {
                Self::check_spec("models.team", member, &mut issues);
            }
        }
        if let Some(model) = &self.decision_maker {
            Self::check_spec("models.decision_maker", model, &mut issues);
        }

        issues
    }

    /// Overlay the configured values on the built-in defaults
    pub fn to_model_defaults(&self) -> ModelDefaults {
        let defaults = ModelDefaults::default();
        ModelDefaults {
            default_model: self.default_model.clone().unwrap_or(defaults.default_model),
            team: self.team.clone().unwrap_or(defaults.team),
            decision_maker: self
                .decision_maker
                .clone()
                .unwrap_or(defaults.decision_maker),
        }
    }
}

//! Team configuration container.
//!
//! [`TeamConfig`] groups the configuration slices the use cases need: the
//! default model specifiers, dispatch parameters and provider settings. The
//! infrastructure config loader builds it from the merged config files.

use crate::config::DispatchParams;
use team_domain::{ModelSpec, ProviderSettings};

/// Default model for single-model operations
pub const DEFAULT_MODEL: &str = "openai:gpt-4o-mini";
/// Default team for decision runs
pub const DEFAULT_TEAM: [&str; 3] = [
    "openai:gpt-4.1",
    "anthropic:claude-3-7-sonnet",
    "gemini:gemini-2.5-pro",
];
/// Default decision maker
pub const DEFAULT_DECISION_MAKER: &str = "openai:o4-mini";

/// Model specifiers used when the caller gives none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefaults {
    pub default_model: String,
    pub team: Vec<String>,
    pub decision_maker: String,
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            team: DEFAULT_TEAM.iter().map(|s| s.to_string()).collect(),
            decision_maker: DEFAULT_DECISION_MAKER.to_string(),
        }
    }
}

impl ModelDefaults {
    /// Specifiers that do not parse, as `(field, value)` pairs
    pub fn malformed(&self) -> Vec<(String, String)> {
        let mut issues = Vec::new();
        if ModelSpec::parse(&self.default_model).is_err() {
            issues.push(("models.default_model".to_string(), self.default_model.clone()));
        }
        for spec in &self.team {
            if ModelSpec::parse(spec).is_err() {
                issues.push(("models.team".to_string(), spec.clone()));
            }
        }
        if ModelSpec::parse(&self.decision_maker).is_err() {
            issues.push(("models.decision_maker".to_string(), self.decision_maker.clone()));
        }
        issues
    }
}

/// Configuration container handed to the use cases
#[derive(Debug, Clone, Default)]
pub struct TeamConfig {
    models: ModelDefaults,
    dispatch: DispatchParams,
    providers: ProviderSettings,
}

impl TeamConfig {
    pub fn new(models: ModelDefaults, dispatch: DispatchParams, providers: ProviderSettings) -> Self {
        Self {
            models,
            dispatch,
            providers,
        }
    }

    // ==================== Accessors ====================

    pub fn models(&self) -> &ModelDefaults {
        &self.models
    }

    pub fn dispatch(&self) -> &DispatchParams {
        &self.dispatch
    }

    pub fn providers(&self) -> &ProviderSettings {
        &self.providers
    }

    // ==================== Builder Methods ====================

    pub fn with_models(mut self, models: ModelDefaults) -> Self {
        self.models = models;
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchParams) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_providers(mut self, providers: ProviderSettings) -> Self {
        self.providers = providers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        assert!(ModelDefaults::default().malformed().is_empty());
        assert_eq!(ModelDefaults::default().team.len(), 3);
    }

    #[test]
    fn malformed_specs_are_reported_with_field() {
        let models = ModelDefaults {
            default_model: "gpt-4o".to_string(),
            team: vec!["openai:gpt-4o".to_string(), ":x".to_string()],
            decision_maker: "openai:o4-mini".to_string(),
        };
        assert_eq!(
            models.malformed(),
            vec![
                ("models.default_model".to_string(), "gpt-4o".to_string()),
                ("models.team".to_string(), ":x".to_string()),
            ]
        );
    }
}

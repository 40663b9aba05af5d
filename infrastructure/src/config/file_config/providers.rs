//! Provider configuration from TOML (`[providers]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use team_domain::{
    DomainError, ProviderApi, ProviderDescriptor, ProviderOverride, ProviderRegistry,
    ProviderSettings,
};

const API_VALUES: [&str; 4] = ["openai", "anthropic", "gemini", "ollama"];

/// Settings for one `[providers.<name>]` table.
///
/// For a built-in provider every field is an override. A table naming an
/// unknown provider registers it, provided it has a `base_url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL (e.g. a proxy or a self-hosted gateway).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable name for the API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Custom providers only: wire protocol (default: "openai")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    /// Custom providers only: short alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Custom providers only: known models, first is the fallback
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
    /// Custom providers only: runs locally and needs no key
    pub local: bool,
}

impl FileProviderConfig {
    fn parse_api(value: Option<&str>) -> Option<ProviderApi> {
        match value.unwrap_or("openai").to_lowercase().as_str() {
            "openai" => Some(ProviderApi::OpenAiCompatible),
            "anthropic" => Some(ProviderApi::Anthropic),
            "gemini" => Some(ProviderApi::Gemini),
            "ollama" => Some(ProviderApi::Ollama),
            _ => None,
        }
    }

    fn to_override(&self) -> ProviderOverride {
        ProviderOverride {
            base_url: self.base_url.clone(),
            api_key_env: self.api_key_env.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// ```toml
/// [providers]
/// max_tokens = 4096
///
/// [providers.groq]
/// base_url = "http://proxy.local/groq/v1"
///
/// [providers.openrouter]
/// base_url = "https://openrouter.ai/api/v1"
/// alias = "r"
/// models = ["meta-llama/llama-3.3-70b-instruct"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Max tokens per response unless a provider overrides it
    pub max_tokens: u32,
    /// Sampling temperature; unset leaves the provider default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Per-provider tables keyed by provider full name
    #[serde(flatten)]
    pub entries: BTreeMap<String, FileProviderConfig>,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            max_tokens: ProviderSettings::default().max_tokens,
            temperature: None,
            entries: BTreeMap::new(),
        }
    }
}

impl FileProvidersConfig {
    pub fn validate(&self, builtin: &ProviderRegistry) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.max_tokens == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "providers.max_tokens".to_string(),
                },
                "providers.max_tokens cannot be 0",
            ));
        }
        check_temperature("providers.temperature", self.temperature, &mut issues);

        for (name, entry) in &self.entries {
            let prefix = format!("providers.{}", name);
            check_temperature(&format!("{}.temperature", prefix), entry.temperature, &mut issues);

            if entry.max_tokens == Some(0) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroValue {
                        field: format!("{}.max_tokens", prefix),
                    },
                    format!("{}.max_tokens cannot be 0", prefix),
                ));
            }

            if builtin.resolve_alias(name).is_ok() {
                continue;
            }
            if entry.base_url.is_none() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownProvider { name: name.clone() },
                    format!(
                        "[{}] names an unknown provider and has no base_url; it is ignored",
                        prefix
                    ),
                ));
            }
            if FileProviderConfig::parse_api(entry.api.as_deref()).is_none() {
                let value = entry.api.clone().unwrap_or_default();
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: format!("{}.api", prefix),
                        value: value.clone(),
                        valid_values: API_VALUES.iter().map(|s| s.to_string()).collect(),
                    },
                    format!(
                        "{}.api: unknown value '{}', expected one of {}",
                        prefix,
                        value,
                        API_VALUES.join(", ")
                    ),
                ));
            }
        }

        issues
    }

    pub fn to_provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            overrides: self
                .entries
                .iter()
                .map(|(name, entry)| (name.clone(), entry.to_override()))
                .collect(),
        }
    }

    /// Built-in registry plus every custom provider with a `base_url` and a
    /// known `api`
    pub fn to_registry(&self) -> Result<ProviderRegistry, DomainError> {
        let builtin = ProviderRegistry::builtin();
        let mut builder = ProviderRegistry::builtin_builder();

        for (name, entry) in &self.entries {
            if builtin.resolve_alias(name).is_ok() {
                continue;
            }
            let (Some(base_url), Some(api)) = (
                entry.base_url.as_deref(),
                FileProviderConfig::parse_api(entry.api.as_deref()),
            ) else {
                continue;
            };

            let mut descriptor = if entry.local {
                ProviderDescriptor::local(name.clone(), api)
            } else {
                ProviderDescriptor::cloud(name.clone(), api)
            }
            .with_base_url(base_url)
            .with_models(entry.models.iter().cloned());
            if let Some(alias) = &entry.alias {
                descriptor = descriptor.with_alias(alias.clone());
            }
            builder = builder.register(descriptor);
        }

        builder.build()
    }
}

fn check_temperature(field: &str, value: Option<f32>, issues: &mut Vec<ConfigIssue>) {
    if let Some(t) = value.filter(|t| !(0.0..=2.0).contains(t)) {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: field.to_string(),
            },
            format!("{}: {} is outside 0.0..=2.0", field, t),
        ));
    }
}

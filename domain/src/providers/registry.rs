//! Provider registry: the single source of truth for provider names,
//! aliases and capability metadata.
//!
//! The registry is built once at startup and passed by reference (usually
//! behind an `Arc`) to whatever needs to resolve provider names. There is no
//! global table.

use crate::core::error::DomainError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Wire protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderApi {
    /// `POST /chat/completions` (OpenAI, DeepSeek, Groq)
    OpenAiCompatible,
    /// `POST /v1/messages`
    Anthropic,
    /// `POST /models/{model}:generateContent`
    Gemini,
    /// `POST /api/chat` on a local daemon
    Ollama,
    /// In-process canned responses, no network
    Testing,
}

/// Static description of one provider (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub full_name: String,
    pub short_alias: Option<String>,
    pub requires_api_key: bool,
    pub is_local: bool,
    /// Known models, in preference order. The first entry is the fallback
    /// used by model correction.
    pub known_models: Vec<String>,
    pub api: ProviderApi,
    pub default_base_url: Option<String>,
}

impl ProviderDescriptor {
    /// A hosted provider that needs `<NAME>_API_KEY`
    pub fn cloud(full_name: impl Into<String>, api: ProviderApi) -> Self {
        Self {
            full_name: full_name.into(),
            short_alias: None,
            requires_api_key: true,
            is_local: false,
            known_models: Vec::new(),
            api,
            default_base_url: None,
        }
    }

    /// A provider running on this machine; no credentials required
    pub fn local(full_name: impl Into<String>, api: ProviderApi) -> Self {
        Self {
            requires_api_key: false,
            is_local: true,
            ..Self::cloud(full_name, api)
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.short_alias = Some(alias.into());
        self
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.default_base_url = Some(url.into());
        self
    }

    /// Name of the environment variable holding the API key,
    /// e.g. `OPENAI_API_KEY`
    pub fn api_key_env(&self) -> String {
        format!("{}_API_KEY", self.full_name.to_uppercase().replace('-', "_"))
    }

    /// Whether `name` is this provider's full name or alias (exact match)
    pub fn matches(&self, name: &str) -> bool {
        self.full_name == name || self.short_alias.as_deref() == Some(name)
    }
}

/// Result of [`ProviderRegistry::list_providers`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderListing {
    /// Every full name followed by every alias
    Flat(Vec<String>),
    /// Full name → aliases, in registration order
    Detailed(Vec<(String, Vec<String>)>),
}

impl Serialize for ProviderListing {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ProviderListing::Flat(names) => names.serialize(serializer),
            ProviderListing::Detailed(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (name, aliases) in entries {
                    map.serialize_entry(name, aliases)?;
                }
                map.end()
            }
        }
    }
}

/// Lookup table of providers
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    descriptors: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    /// Start an empty registry
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Start from the built-in provider table
    pub fn builtin_builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder {
            descriptors: builtin_descriptors(),
        }
    }

    /// The built-in provider table
    pub fn builtin() -> Self {
        Self {
            descriptors: builtin_descriptors(),
        }
    }

    /// Resolve a full name or single-letter alias. Case-sensitive.
    pub fn resolve_alias(&self, name: &str) -> Result<&ProviderDescriptor, DomainError> {
        self.descriptors
            .iter()
            .find(|d| d.matches(name))
            .ok_or_else(|| DomainError::UnknownProvider(name.to_string()))
    }

    /// Known models of a provider given by name or alias
    pub fn list_models(&self, name: &str) -> Result<&[String], DomainError> {
        self.resolve_alias(name).map(|d| d.known_models.as_slice())
    }

    pub fn list_providers(&self, detailed: bool) -> ProviderListing {
        if detailed {
            ProviderListing::Detailed(
                self.descriptors
                    .iter()
                    .map(|d| (d.full_name.clone(), d.short_alias.iter().cloned().collect()))
                    .collect(),
            )
        } else {
            let mut names: Vec<String> =
                self.descriptors.iter().map(|d| d.full_name.clone()).collect();
            names.extend(self.descriptors.iter().filter_map(|d| d.short_alias.clone()));
            ProviderListing::Flat(names)
        }
    }

    pub fn descriptors(&self) -> &[ProviderDescriptor] {
        &self.descriptors
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builder that rejects duplicate names and aliases
#[derive(Debug, Default)]
pub struct ProviderRegistryBuilder {
    descriptors: Vec<ProviderDescriptor>,
}

impl ProviderRegistryBuilder {
    /// Add a descriptor. A descriptor with the same full name as an existing
    /// one replaces it.
    pub fn register(mut self, descriptor: ProviderDescriptor) -> Self {
        if let Some(existing) = self
            .descriptors
            .iter_mut()
            .find(|d| d.full_name == descriptor.full_name)
        {
            *existing = descriptor;
        } else {
            self.descriptors.push(descriptor);
        }
        self
    }

    pub fn build(self) -> Result<ProviderRegistry, DomainError> {
        let mut seen: Vec<&str> = Vec::new();
        for descriptor in &self.descriptors {
            let names = std::iter::once(descriptor.full_name.as_str())
                .chain(descriptor.short_alias.as_deref());
            for name in names {
                if seen.contains(&name) {
                    return Err(DomainError::DuplicateProvider(name.to_string()));
                }
                seen.push(name);
            }
        }
        Ok(ProviderRegistry {
            descriptors: self.descriptors,
        })
    }
}

fn builtin_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        ProviderDescriptor::cloud("openai", ProviderApi::OpenAiCompatible)
            .with_alias("o")
            .with_base_url("https://api.openai.com/v1")
            .with_models(["gpt-4.1", "gpt-4.1-mini", "gpt-4o", "gpt-4o-mini", "o3", "o4-mini"]),
        ProviderDescriptor::cloud("anthropic", ProviderApi::Anthropic)
            .with_alias("a")
            .with_base_url("https://api.anthropic.com")
            .with_models([
                "claude-3-7-sonnet-20250219",
                "claude-3-5-sonnet-20241022",
                "claude-3-5-haiku-20241022",
                "claude-3-opus-20240229",
            ]),
        ProviderDescriptor::cloud("gemini", ProviderApi::Gemini)
            .with_alias("g")
            .with_base_url("https://generativelanguage.googleapis.com/v1beta")
            .with_models(["gemini-2.5-pro", "gemini-2.5-flash", "gemini-1.5-pro"]),
        ProviderDescriptor::cloud("groq", ProviderApi::OpenAiCompatible)
            .with_alias("q")
            .with_base_url("https://api.groq.com/openai/v1")
            .with_models([
                "llama-3.3-70b-versatile",
                "llama-3.1-8b-instant",
                "mixtral-8x7b-32768",
                "gemma2-9b-it",
            ]),
        ProviderDescriptor::cloud("deepseek", ProviderApi::OpenAiCompatible)
            .with_alias("d")
            .with_base_url("https://api.deepseek.com/v1")
            .with_models(["deepseek-chat", "deepseek-reasoner"]),
        ProviderDescriptor::local("ollama", ProviderApi::Ollama)
            .with_alias("l")
            .with_base_url("http://localhost:11434")
            .with_models(["llama3", "mistral", "phi3"]),
        ProviderDescriptor::local("testing", ProviderApi::Testing).with_alias("t"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIASES: &[(&str, &str)] = &[
        ("o", "openai"),
        ("a", "anthropic"),
        ("g", "gemini"),
        ("q", "groq"),
        ("d", "deepseek"),
        ("l", "ollama"),
        ("t", "testing"),
    ];

    #[test]
    fn resolves_every_builtin_alias() {
        let registry = ProviderRegistry::builtin();
        for (alias, full) in ALIASES {
            assert_eq!(registry.resolve_alias(alias).unwrap().full_name, *full);
            assert_eq!(registry.resolve_alias(full).unwrap().full_name, *full);
        }
    }

    #[test]
    fn resolve_is_case_sensitive() {
        let registry = ProviderRegistry::builtin();
        assert!(matches!(
            registry.resolve_alias("OpenAI"),
            Err(DomainError::UnknownProvider(_))
        ));
        assert!(registry.resolve_alias("O").is_err());
    }

    #[test]
    fn flat_listing_has_names_then_aliases() {
        let registry = ProviderRegistry::builtin();
        let ProviderListing::Flat(names) = registry.list_providers(false) else {
            panic!("expected flat listing");
        };
        assert_eq!(names.len(), ALIASES.len() * 2);
        assert_eq!(names[0], "openai");
        assert!(names.contains(&"l".to_string()));
    }

    #[test]
    fn detailed_listing_maps_names_to_aliases() {
        let registry = ProviderRegistry::builtin();
        let ProviderListing::Detailed(entries) = registry.list_providers(true) else {
            panic!("expected detailed listing");
        };
        assert_eq!(entries[1], ("anthropic".to_string(), vec!["a".to_string()]));

        let json = serde_json::to_value(registry.list_providers(true)).unwrap();
        assert_eq!(json["groq"], serde_json::json!(["q"]));
    }

    #[test]
    fn local_providers_do_not_need_keys() {
        let registry = ProviderRegistry::builtin();
        let ollama = registry.resolve_alias("l").unwrap();
        assert!(ollama.is_local);
        assert!(!ollama.requires_api_key);
        assert!(registry.resolve_alias("openai").unwrap().requires_api_key);
    }

    #[test]
    fn api_key_env_is_upper_snake() {
        let d = ProviderDescriptor::cloud("my-vendor", ProviderApi::OpenAiCompatible);
        assert_eq!(d.api_key_env(), "MY_VENDOR_API_KEY");
        assert_eq!(
            ProviderRegistry::builtin().resolve_alias("d").unwrap().api_key_env(),
            "DEEPSEEK_API_KEY"
        );
    }

    #[test]
    fn builder_rejects_alias_collisions() {
        let result = ProviderRegistry::builtin_builder()
            .register(
                ProviderDescriptor::cloud("openrouter", ProviderApi::OpenAiCompatible)
                    .with_alias("o"),
            )
            .build();
        assert_eq!(result.unwrap_err(), DomainError::DuplicateProvider("o".to_string()));
    }

    #[test]
    fn builder_replaces_descriptor_with_same_name() {
        let registry = ProviderRegistry::builtin_builder()
            .register(
                ProviderDescriptor::local("ollama", ProviderApi::Ollama)
                    .with_alias("l")
                    .with_models(["qwen2"]),
            )
            .build()
            .unwrap();
        assert_eq!(registry.list_models("l").unwrap(), ["qwen2".to_string()]);
        assert_eq!(registry.descriptors().len(), ALIASES.len());
    }

    #[test]
    fn list_models_for_unknown_provider_fails() {
        let registry = ProviderRegistry::builtin();
        assert!(registry.list_models("mistral-cloud").is_err());
    }
}

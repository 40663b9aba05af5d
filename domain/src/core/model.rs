//! Model specifier value objects
//!
//! A model specifier is a single string of the form `provider:model` or
//! `provider:model:effort`. The provider may be a full name or a one-letter
//! alias; resolution against the [`ProviderRegistry`](crate::ProviderRegistry)
//! happens later, in the resolver.

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Reasoning effort hint forwarded to providers that support it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }

    /// Case-insensitive parse; `None` for anything that is not an effort keyword
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(ReasoningEffort::Low),
            "medium" => Some(ReasoningEffort::Medium),
            "high" => Some(ReasoningEffort::High),
            _ => None,
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed but not yet validated `provider:model[:effort]` specifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelSpec {
    /// Provider as written by the caller (full name or alias)
    pub provider: String,
    /// Model as written by the caller
    pub model: String,
    pub reasoning_effort: Option<ReasoningEffort>,
}

impl ModelSpec {
    /// Parse a specifier.
    ///
    /// The provider ends at the first `:`. A trailing `:low`, `:medium` or
    /// `:high` segment is taken as the reasoning effort; everything else
    /// belongs to the model, so `ollama:llama3:8b` keeps `llama3:8b`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let (provider, rest) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidFormat(s.to_string()))?;

        let (model, reasoning_effort) = match rest.rsplit_once(':') {
            Some((model, tail)) => match ReasoningEffort::parse(tail) {
                Some(effort) => (model, Some(effort)),
                None => (rest, None),
            },
            None => (rest, None),
        };

        if provider.is_empty() || model.is_empty() {
            return Err(DomainError::InvalidFormat(s.to_string()));
        }

        Ok(Self {
            provider: provider.to_string(),
            model: model.to_string(),
            reasoning_effort,
        })
    }
}

impl FromStr for ModelSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)?;
        if let Some(effort) = self.reasoning_effort {
            write!(f, ":{}", effort)?;
        }
        Ok(())
    }
}

/// A validated `(provider, model)` pair ready for dispatch (Value Object)
///
/// `provider` is always a registered full provider name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedTarget {
    pub provider: String,
    pub model: String,
    pub reasoning_effort: Option<ReasoningEffort>,
}

impl ResolvedTarget {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            reasoning_effort: None,
        }
    }

    pub fn with_reasoning_effort(mut self, effort: Option<ReasoningEffort>) -> Self {
        self.reasoning_effort = effort;
        self
    }

    /// `provider:model`, used in error messages and synthesis labels
    pub fn label(&self) -> String {
        format!("{}:{}", self.provider, self.model)
    }

    /// Model name with `/` and `:` replaced so it can be used in a file name
    pub fn file_safe_model(&self) -> String {
        sanitize_model(&self.model)
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

impl Serialize for ResolvedTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for ResolvedTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let spec = ModelSpec::parse(&s).map_err(serde::de::Error::custom)?;
        Ok(ResolvedTarget::new(spec.provider, spec.model).with_reasoning_effort(spec.reasoning_effort))
    }
}

/// Replace `/` and `:` with `_`
pub fn sanitize_model(model: &str) -> String {
    model.replace(['/', ':'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let spec: ModelSpec = "openai:gpt-4o".parse().unwrap();
        assert_eq!(spec.provider, "openai");
        assert_eq!(spec.model, "gpt-4o");
        assert_eq!(spec.reasoning_effort, None);
    }

    #[test]
    fn test_parse_with_effort_case_insensitive() {
        let spec = ModelSpec::parse("o:o4-mini:HIGH").unwrap();
        assert_eq!(spec.provider, "o");
        assert_eq!(spec.model, "o4-mini");
        assert_eq!(spec.reasoning_effort, Some(ReasoningEffort::High));
    }

    #[test]
    fn test_parse_keeps_colons_in_model() {
        let spec = ModelSpec::parse("ollama:llama3:8b").unwrap();
        assert_eq!(spec.model, "llama3:8b");
        assert_eq!(spec.reasoning_effort, None);

        let spec = ModelSpec::parse("ollama:llama3:8b:low").unwrap();
        assert_eq!(spec.model, "llama3:8b");
        assert_eq!(spec.reasoning_effort, Some(ReasoningEffort::Low));
    }

    #[test]
    fn test_effort_word_alone_is_a_model() {
        let spec = ModelSpec::parse("o:high").unwrap();
        assert_eq!(spec.model, "high");
        assert_eq!(spec.reasoning_effort, None);
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let err = ModelSpec::parse("gpt-4o").unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_parse_rejects_empty_sides() {
        assert!(ModelSpec::parse(":gpt-4o").unwrap_err().is_format());
        assert!(ModelSpec::parse("openai:").unwrap_err().is_format());
        assert!(ModelSpec::parse("openai::medium").unwrap_err().is_format());
    }

    #[test]
    fn test_display_includes_effort() {
        let spec = ModelSpec::parse("a:claude-3-opus:medium").unwrap();
        assert_eq!(spec.to_string(), "a:claude-3-opus:medium");
    }

    #[test]
    fn test_sanitize_model() {
        assert_eq!(sanitize_model("meta/llama:3"), "meta_llama_3");
        let target = ResolvedTarget::new("ollama", "llama3:8b");
        assert_eq!(target.file_safe_model(), "llama3_8b");
        assert_eq!(target.label(), "ollama:llama3:8b");
    }
}

//! Provider and model name correction
//!
//! Pure functions; nothing here touches the network. The fallback branch of
//! [`correct_model`] substitutes a *different* model when nothing matches, so
//! callers get a [`ModelCorrection`] back and are expected to surface it.

use crate::providers::ProviderRegistry;
use serde::Serialize;

/// How a requested model name was turned into the model that will be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelCorrection {
    /// The requested name is a known model
    Exact,
    /// Case-insensitive substring match against a known model
    Fuzzy { requested: String },
    /// Nothing matched; the provider's first known model was substituted
    Fallback { requested: String },
    /// The provider has no known model list; the name is used as given
    Unverified,
}

impl ModelCorrection {
    /// True when the model that will be used differs from the requested one
    pub fn is_substitution(&self) -> bool {
        matches!(
            self,
            ModelCorrection::Fuzzy { .. } | ModelCorrection::Fallback { .. }
        )
    }
}

/// A corrected provider/model pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedPair {
    pub provider: String,
    pub model: String,
    pub correction: ModelCorrection,
}

/// Normalize a provider name or alias to its full name.
///
/// Exact matches are tried first, then the lower-cased input. Unknown names
/// are returned unchanged; dispatch will fail for them later.
pub fn correct_provider(registry: &ProviderRegistry, provider: &str) -> String {
    registry
        .resolve_alias(provider)
        .or_else(|_| registry.resolve_alias(&provider.to_lowercase()))
        .map(|d| d.full_name.clone())
        .unwrap_or_else(|_| provider.to_string())
}

/// Pick the model to use from `available`.
///
/// 1. verbatim match → kept
/// 2. first entry where either lower-cased name contains the other
/// 3. first entry of `available`
/// 4. `available` empty → unchanged
pub fn correct_model(model: &str, available: &[String]) -> (String, ModelCorrection) {
    if available.is_empty() {
        return (model.to_string(), ModelCorrection::Unverified);
    }
    if available.iter().any(|m| m == model) {
        return (model.to_string(), ModelCorrection::Exact);
    }

    let wanted = model.to_lowercase();
    if let Some(found) = available.iter().find(|candidate| {
        let candidate = candidate.to_lowercase();
        candidate.contains(&wanted) || wanted.contains(&candidate)
    }) {
        return (
            found.clone(),
            ModelCorrection::Fuzzy {
                requested: model.to_string(),
            },
        );
    }

    (
        available[0].clone(),
        ModelCorrection::Fallback {
            requested: model.to_string(),
        },
    )
}

/// Correct both halves of a specifier
pub fn correct(
    registry: &ProviderRegistry,
    provider: &str,
    model: &str,
    available: &[String],
) -> CorrectedPair {
    let (model, correction) = correct_model(model, available);
    CorrectedPair {
        provider: correct_provider(registry, provider),
        model,
        correction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ModelSpec;

    fn models(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn every_alias_normalizes_through_parse_and_correct() {
        let registry = ProviderRegistry::builtin();
        for descriptor in registry.descriptors() {
            let alias = descriptor.short_alias.as_deref().unwrap();
            let spec = ModelSpec::parse(&format!("{alias}:some-model")).unwrap();
            let pair = correct(&registry, &spec.provider, &spec.model, &descriptor.known_models);
            assert_eq!(pair.provider, descriptor.full_name);
        }
    }

    #[test]
    fn provider_correction_lowercases_then_passes_through() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(correct_provider(&registry, "Anthropic"), "anthropic");
        assert_eq!(correct_provider(&registry, "G"), "gemini");
        assert_eq!(correct_provider(&registry, "mystery"), "mystery");
    }

    #[test]
    fn exact_model_is_kept() {
        let (model, correction) = correct_model("gpt-4o", &models(&["gpt-4o-mini", "gpt-4o"]));
        assert_eq!(model, "gpt-4o");
        assert_eq!(correction, ModelCorrection::Exact);
        assert!(!correction.is_substitution());
    }

    #[test]
    fn substring_match_in_both_directions_first_wins() {
        let available = models(&["claude-3-7-sonnet-20250219", "claude-3-5-sonnet-20241022"]);
        let (model, correction) = correct_model("Claude-3-7-Sonnet", &available);
        assert_eq!(model, "claude-3-7-sonnet-20250219");
        assert!(matches!(correction, ModelCorrection::Fuzzy { .. }));

        let (model, _) = correct_model("llama3-latest", &models(&["mistral", "llama3"]));
        assert_eq!(model, "llama3");

        let (model, _) = correct_model("sonnet", &available);
        assert_eq!(model, "claude-3-7-sonnet-20250219");
    }

    #[test]
    fn no_match_falls_back_to_first_model() {
        let (model, correction) = correct_model("gpt-9", &models(&["o3", "o4-mini"]));
        assert_eq!(model, "o3");
        assert_eq!(
            correction,
            ModelCorrection::Fallback {
                requested: "gpt-9".to_string()
            }
        );
        assert!(correction.is_substitution());
    }

    #[test]
    fn empty_model_list_leaves_model_unchanged() {
        let (model, correction) = correct_model("model1", &[]);
        assert_eq!(model, "model1");
        assert_eq!(correction, ModelCorrection::Unverified);
    }
}

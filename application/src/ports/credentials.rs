//! Credential lookup port

use std::collections::HashMap;

/// Source of API keys, looked up by variable name (e.g. `OPENAI_API_KEY`)
pub trait CredentialSource: Send + Sync {
    /// Returns `None` for unset or empty values
    fn get(&self, name: &str) -> Option<String>;
}

/// Fixed set of credentials
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_count_as_unset() {
        let creds = StaticCredentials::new()
            .with("OPENAI_API_KEY", "sk-test")
            .with("GROQ_API_KEY", "");
        assert_eq!(creds.get("OPENAI_API_KEY").as_deref(), Some("sk-test"));
        assert_eq!(creds.get("GROQ_API_KEY"), None);
        assert_eq!(creds.get("GEMINI_API_KEY"), None);
    }
}

//! Environment-backed credential source

use team_application::CredentialSource;

/// Reads API keys from process environment variables
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl EnvCredentials {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialSource for EnvCredentials {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

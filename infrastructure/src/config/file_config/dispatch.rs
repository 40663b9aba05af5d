//! Fan-out settings from TOML (`[dispatch]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use team_application::DispatchParams;

/// # Example
///
/// ```toml
/// [dispatch]
/// concurrency = 4         # requests in flight at once
/// timeout_seconds = 120   # per request
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    pub concurrency: usize,
    pub timeout_seconds: u64,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        let params = DispatchParams::default();
        Self {
            concurrency: params.concurrency,
            timeout_seconds: params.timeout.as_secs(),
        }
    }
}

impl FileDispatchConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "dispatch.concurrency".to_string(),
                },
                "dispatch.concurrency cannot be 0",
            ));
        }
        if self.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "dispatch.timeout_seconds".to_string(),
                },
                "dispatch.timeout_seconds cannot be 0",
            ));
        }
        issues
    }

    pub fn to_dispatch_params(&self) -> DispatchParams {
        DispatchParams::default()
            .with_concurrency(self.concurrency)
            .with_timeout_seconds(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_match_dispatch_params() {
        let config = FileDispatchConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.to_dispatch_params(), DispatchParams::default());
    }

    #[test]
    fn zero_values_are_errors() {
        let config = FileDispatchConfig {
            concurrency: 0,
            timeout_seconds: 0,
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn converts_seconds() {
        let config = FileDispatchConfig {
            concurrency: 8,
            timeout_seconds: 30,
        };
        let params = config.to_dispatch_params();
        assert_eq!(params.concurrency, 8);
        assert_eq!(params.timeout, Duration::from_secs(30));
    }
}

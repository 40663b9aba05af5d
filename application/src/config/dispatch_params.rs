//! Dispatch parameters - fan-out control.
//!
//! [`DispatchParams`] groups the static parameters of the
//! [`PromptDispatcher`](crate::use_cases::dispatch::PromptDispatcher).

use std::time::Duration;

/// Fan-out control parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchParams {
    /// Maximum number of targets in flight at once (at least 1).
    pub concurrency: usize,
    /// Per-call timeout; an expired call is a failure of that target only.
    pub timeout: Duration,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: Duration::from_secs(120),
        }
    }
}

impl DispatchParams {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }
}

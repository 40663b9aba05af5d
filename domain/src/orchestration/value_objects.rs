//! Orchestration value objects - immutable result types of a fan-out run.
//!
//! - [`DispatchResult`] - one target's answer or error
//! - [`ArtifactRecord`] - one file written by a run
//! - [`DecisionOutcome`] - result of the two-stage decision pipeline

use crate::core::model::ResolvedTarget;
use serde::Serialize;
use std::path::PathBuf;

/// Answer or error of a single target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    Response(String),
    Error(String),
}

/// Result of sending the prompt to one target. A batch yields exactly one
/// per requested target, in target order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub target: ResolvedTarget,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}

impl DispatchResult {
    pub fn success(target: ResolvedTarget, response: impl Into<String>) -> Self {
        Self {
            target,
            outcome: DispatchOutcome::Response(response.into()),
        }
    }

    /// Failed dispatch; the message reads `Error from {provider}:{model}: {detail}`
    pub fn failure(target: ResolvedTarget, detail: impl std::fmt::Display) -> Self {
        let message = format!("Error from {}: {}", target.label(), detail);
        Self {
            target,
            outcome: DispatchOutcome::Error(message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::Response(_))
    }

    /// Response text, or the error message for a failure
    pub fn text(&self) -> &str {
        match &self.outcome {
            DispatchOutcome::Response(text) | DispatchOutcome::Error(text) => text,
        }
    }

    pub fn as_result(&self) -> Result<&str, &str> {
        match &self.outcome {
            DispatchOutcome::Response(text) => Ok(text),
            DispatchOutcome::Error(message) => Err(message),
        }
    }
}

/// A file written for one target (or for the decision)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    /// `provider:model` of the target that produced the content
    pub label: String,
    pub path: PathBuf,
    /// Whether the file holds an error message instead of a response
    pub is_error: bool,
}

impl ArtifactRecord {
    pub fn response(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            is_error: false,
        }
    }

    pub fn error(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            is_error: true,
        }
    }
}

/// Result of a successful decision run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionOutcome {
    pub decision_path: PathBuf,
    /// `provider:model` of the decision maker
    pub decision_model: String,
    /// Team artifacts in team order, error artifacts included
    pub team: Vec<ArtifactRecord>,
}

impl DecisionOutcome {
    /// Team artifacts that fed the synthesis
    pub fn successful_team(&self) -> impl Iterator<Item = &ArtifactRecord> {
        self.team.iter().filter(|a| !a.is_error)
    }

    pub fn failed_team(&self) -> impl Iterator<Item = &ArtifactRecord> {
        self.team.iter().filter(|a| a.is_error)
    }
}

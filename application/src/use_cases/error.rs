//! Use case errors

use crate::ports::artifact_store::ArtifactError;
use team_domain::DomainError;
use thiserror::Error;

/// Errors surfaced by the prompt tools and the decision pipeline.
///
/// `Validation` and `Resource` are raised before anything is sent; `Tool`
/// means the synthesis stage failed after its error artifact was written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Resource(String),

    #[error("{0}")]
    Tool(String),
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Resource(_) => "resource",
            PipelineError::Tool(_) => "tool",
        }
    }
}

impl From<DomainError> for PipelineError {
    fn from(e: DomainError) -> Self {
        PipelineError::Validation(e.to_string())
    }
}

impl From<ArtifactError> for PipelineError {
    fn from(e: ArtifactError) -> Self {
        PipelineError::Resource(e.to_string())
    }
}

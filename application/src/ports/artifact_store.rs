//! Artifact store port
//!
//! Reading prompt files and writing response artifacts. Paths come from the
//! domain `ArtifactPathResolver`; the store only moves bytes.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

impl ArtifactError {
    pub fn path(&self) -> &Path {
        match self {
            ArtifactError::NotFound(path) => path,
            ArtifactError::Read { path, .. } | ArtifactError::Write { path, .. } => path,
        }
    }
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Read a UTF-8 text file
    async fn read(&self, path: &Path) -> Result<String, ArtifactError>;

    /// Write a UTF-8 text file, creating missing parent directories.
    /// Overwrites an existing file.
    async fn write(&self, path: &Path, content: &str) -> Result<(), ArtifactError>;
}

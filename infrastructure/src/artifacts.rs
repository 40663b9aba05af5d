//! Local filesystem artifact store

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use team_application::{ArtifactError, ArtifactStore};
use tracing::debug;

/// Reads and writes UTF-8 files on the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalArtifactStore;

impl LocalArtifactStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn read(&self, path: &Path) -> Result<String, ArtifactError> {
        tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ArtifactError::NotFound(path.to_path_buf()),
            _ => ArtifactError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })
    }

    async fn write(&self, path: &Path, content: &str) -> Result<(), ArtifactError> {
        let write_error = |e: std::io::Error| ArtifactError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(path, content).await.map_err(write_error)?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

//! Shared utilities for use cases.
//!
//! Writing dispatch results to their artifact paths, used by the prompt
//! tools and the decision pipeline.

use crate::ports::artifact_store::{ArtifactError, ArtifactStore};
use std::path::Path;
use team_domain::{
    ArtifactFlavor, ArtifactName, ArtifactPathResolver, ArtifactRecord, ArtifactRequest,
    DispatchOutcome, DispatchResult, OutputOptions,
};
use tracing::debug;

/// Write one artifact per result, in result order.
///
/// Responses go to the resolved path, failures to its `_error` sibling with
/// the error message as content.
pub(crate) async fn persist_results(
    store: &dyn ArtifactStore,
    results: &[DispatchResult],
    source_file: &Path,
    options: &OutputOptions,
    flavor: ArtifactFlavor,
) -> Result<Vec<ArtifactRecord>, ArtifactError> {
    let single_target = results.len() == 1;
    let mut records = Vec::with_capacity(results.len());

    for result in results {
        let request = ArtifactRequest {
            source_file,
            name: ArtifactName::target(&result.target),
            options,
            single_target,
            flavor,
        };
        let location = ArtifactPathResolver::locate(&request);
        let label = result.target.label();

        let record = match &result.outcome {
            DispatchOutcome::Response(text) => {
                let path = location.path();
                store.write(&path, text).await?;
                ArtifactRecord::response(label, path)
            }
            DispatchOutcome::Error(message) => {
                let path = location.error_path();
                store.write(&path, message).await?;
                ArtifactRecord::error(label, path)
            }
        };
        debug!("Wrote {}", record.path.display());
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use std::path::PathBuf;
    use team_domain::ResolvedTarget;

    #[tokio::test]
    async fn writes_responses_and_error_siblings() {
        let store = MemoryStore::new();
        let results = vec![
            DispatchResult::success(ResolvedTarget::new("openai", "gpt-4o"), "answer"),
            DispatchResult::failure(ResolvedTarget::new("groq", "gemma2-9b-it"), "down"),
        ];
        let options = OutputOptions::default().with_output_dir("/out");

        let records = persist_results(
            &store,
            &results,
            Path::new("/in/prompt.txt"),
            &options,
            ArtifactFlavor::Raw,
        )
        .await
        .unwrap();

        assert_eq!(records[0].path, PathBuf::from("/out/prompt_openai_gpt-4o.txt"));
        assert!(!records[0].is_error);
        assert_eq!(
            records[1].path,
            PathBuf::from("/out/prompt_groq_gemma2-9b-it_error.txt")
        );
        assert!(records[1].is_error);
        assert_eq!(
            store.get("/out/prompt_groq_gemma2-9b-it_error.txt").unwrap(),
            "Error from groq:gemma2-9b-it: down"
        );
    }
}

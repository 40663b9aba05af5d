//! Application layer for agile-team
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{DispatchParams, ModelDefaults, TeamConfig};
pub use ports::{
    artifact_store::{ArtifactError, ArtifactStore},
    credentials::{CredentialSource, StaticCredentials},
    llm_gateway::{GatewayError, ProviderClient, ProviderClientFactory},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::client_cache::ProviderClientCache;
pub use use_cases::dispatch::PromptDispatcher;
pub use use_cases::error::PipelineError;
pub use use_cases::prompt_tools::PromptToolsUseCase;
pub use use_cases::resolve_models::{ModelResolver, Resolution};
pub use use_cases::run_decision::{RunDecisionInput, RunDecisionUseCase, team_directory};
pub use use_cases::run_persona::{PersonaOutcome, RunPersonaInput, RunPersonaUseCase};

//! Infrastructure layer for agile-team
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: provider clients, the local artifact store,
//! environment credentials and configuration file loading.

pub mod artifacts;
pub mod config;
pub mod credentials;
pub mod providers;

// Re-export commonly used types
pub use artifacts::LocalArtifactStore;
pub use config::{
    ConfigIssue, ConfigIssueCode, ConfigLoader, FileConfig, FileDispatchConfig, FileModelsConfig,
    FileProviderConfig, FileProvidersConfig, Severity,
};
pub use credentials::EnvCredentials;
pub use providers::{
    AnthropicClient, ClientSettings, GeminiClient, HttpClientFactory, OllamaClient,
    OpenAiCompatibleClient, TestingClient,
};

//! Domain layer for agile-team
//!
//! Pure types and rules of the model router. Nothing in this crate performs
//! I/O; network and filesystem access live behind the application ports.
//!
//! # Core Concepts
//!
//! ## Model specifiers
//!
//! Every target is written `provider:model` (optionally `:low|:medium|:high`).
//! Providers are looked up in the [`ProviderRegistry`] by full name or
//! one-letter alias, then the model name is corrected against the provider's
//! known models (see [`resolution`]).
//!
//! ## Fan-out and decision
//!
//! A prompt is fanned out to a team of targets; each answer (or error) is
//! written to a file named by the [`ArtifactPathResolver`]. A decision run
//! feeds the team's answers to one more model through a
//! [`SynthesisRequest`].

pub mod artifact;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod providers;
pub mod resolution;

// Re-export commonly used types
pub use artifact::{
    ArtifactFlavor, ArtifactLocation, ArtifactName, ArtifactPathResolver, ArtifactRequest,
    OutputOptions,
};
pub use core::{
    error::DomainError,
    model::{ModelSpec, ReasoningEffort, ResolvedTarget, sanitize_model},
};
pub use orchestration::{
    entities::{MIN_TEAM_SIZE, Phase},
    value_objects::{ArtifactRecord, DecisionOutcome, DispatchOutcome, DispatchResult},
};
pub use prompt::{Persona, SynthesisRequest, TeamResponse};
pub use providers::{
    ProviderApi, ProviderDescriptor, ProviderListing, ProviderOverride, ProviderRegistry,
    ProviderRegistryBuilder, ProviderSettings,
};
pub use resolution::{CorrectedPair, ModelCorrection};

//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelSpec`] - a parsed `provider:model[:effort]` specifier
//! - [`model::ResolvedTarget`] - a validated dispatch target
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;

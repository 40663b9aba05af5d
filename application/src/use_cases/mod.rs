//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod client_cache;
pub mod dispatch;
pub mod error;
pub mod prompt_tools;
pub mod resolve_models;
pub mod run_decision;
pub mod run_persona;
pub(crate) mod shared;

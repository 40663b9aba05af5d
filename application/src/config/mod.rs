//! Application-level configuration.
//!
//! - [`DispatchParams`] - fan-out control (concurrency, per-call timeout)
//! - [`ModelDefaults`] - model specifiers used when the caller gives none
//! - [`TeamConfig`] - container of the slices above plus provider settings

pub mod dispatch_params;
pub mod team_config;

pub use dispatch_params::DispatchParams;
pub use team_config::{
    DEFAULT_DECISION_MAKER, DEFAULT_MODEL, DEFAULT_TEAM, ModelDefaults, TeamConfig,
};

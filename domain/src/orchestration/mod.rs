//! Fan-out orchestration domain
//!
//! Phases and result types of multi-model runs.

pub mod entities;
pub mod value_objects;

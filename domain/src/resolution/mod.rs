//! Model resolution rules (pure).
//!
//! The async part of resolution (asking a live provider for its models) lives
//! in the application layer's `ModelResolver`.

pub mod correction;

pub use correction::{CorrectedPair, ModelCorrection, correct, correct_model, correct_provider};

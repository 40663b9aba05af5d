//! Prompt domain
//!
//! The decision-stage synthesis template and the persona role prompts.

pub mod persona;
mod template;

pub use persona::Persona;
pub use template::{
    DEFAULT_DECISION_TEMPLATE, ORIGINAL_PROMPT_PLACEHOLDER, SynthesisRequest,
    TEAM_RESPONSES_PLACEHOLDER, TeamResponse,
};

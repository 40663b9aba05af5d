//! Orchestration domain entities

use serde::{Deserialize, Serialize};

/// Stage of a decision run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Every team member answers the prompt
    FanOut,
    /// The decision maker synthesizes the team's answers
    Synthesis,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::FanOut => "fan_out",
            Phase::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::FanOut => "Team Responses",
            Phase::Synthesis => "Decision",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Minimum team size of a decision run
pub const MIN_TEAM_SIZE: usize = 2;

//! Orchestration loop states

use serde::{Deserialize, Serialize};

/// State of the orchestration loop
///
/// ```text
/// PLANNING → VALIDATING → DISPATCHING → (LOGGING) → PLANNING
///     │                                                 │
///     └──▶ DONE                      EXHAUSTED ◀────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Waiting on the planner
    Planning,
    /// Checking a requested call before dispatch
    Validating,
    /// Waiting on a provider
    Dispatching,
    /// Recording the outcome of a call
    Logging,
    /// Planner produced a final answer
    Done,
    /// Step budget consumed without a final answer
    Exhausted,
}

impl LoopState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopState::Planning => "planning",
            LoopState::Validating => "validating",
            LoopState::Dispatching => "dispatching",
            LoopState::Logging => "logging",
            LoopState::Done => "done",
            LoopState::Exhausted => "exhausted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Done | LoopState::Exhausted)
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Done,
    Exhausted,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Done => "done",
            SessionOutcome::Exhausted => "exhausted",
        }
    }
}

impl From<SessionOutcome> for LoopState {
    fn from(outcome: SessionOutcome) -> Self {
        match outcome {
            SessionOutcome::Done => LoopState::Done,
            SessionOutcome::Exhausted => LoopState::Exhausted,
        }
    }
}

//! Orchestration domain: loop states and the result log

pub mod log;
pub mod state;

pub use log::{OrchestrationResult, ResultLog, ToolLogEntry, ToolOutcome};
pub use state::{LoopState, SessionOutcome};

//! Prompt domain
//!
//! System instruction and corrective texts fed back to the planner.

pub mod orchestrator;

pub use orchestrator::{EXHAUSTED_MESSAGE, OrchestratorPromptTemplate};

//! Progress notification port
//!
//! Defines the interface for reporting progress while a session runs.

use conductor_domain::{LoopState, OrchestrationResult, ToolCallAttempt, ToolLogEntry};

/// Callback for progress updates during a session
///
/// Implementations live in the presentation layer. All methods default to
/// no-ops.
pub trait OrchestrationProgress: Send + Sync {
    /// Called when a planning step begins
    fn on_step_start(&self, _step: usize, _max_steps: usize) {}

    /// Called on every loop state transition
    fn on_state_change(&self, _state: LoopState) {}

    /// Called before a validated call is dispatched
    fn on_tool_dispatch(&self, _attempt: &ToolCallAttempt) {}

    /// Called once per recorded log entry
    fn on_tool_logged(&self, _entry: &ToolLogEntry) {}

    /// Called when the planner call itself failed
    fn on_planner_error(&self, _step: usize, _error: &str) {}

    /// Called when the session finishes
    fn on_finished(&self, _result: &OrchestrationResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl OrchestrationProgress for NoProgress {}

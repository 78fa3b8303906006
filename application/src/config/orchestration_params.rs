//! Orchestration parameters: loop control.
//!
//! [`OrchestrationParams`] groups the static parameters that bound the loop in
//! [`RunOrchestrationUseCase`](crate::use_cases::run_orchestration::RunOrchestrationUseCase).
//! Sampling parameters for the reasoning service are not here; they belong to
//! the planner adapter and never change during a session.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Orchestration loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationParams {
    /// Maximum planning steps before the session is declared exhausted.
    pub max_steps: usize,
    /// Dispatches allowed per tool within one session.
    pub max_calls_per_tool: usize,
    /// Characters of tool output kept in log previews and tool turns.
    pub preview_chars: usize,
    /// Upper bound on a single planner call. `None` waits indefinitely.
    pub planner_timeout: Option<Duration>,
    /// Replaces the generated system instruction when set.
    pub system_prompt: Option<String>,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            max_steps: 8,
            max_calls_per_tool: 5,
            preview_chars: 800,
            planner_timeout: Some(Duration::from_secs(120)),
            system_prompt: None,
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_max_calls_per_tool(mut self, max: usize) -> Self {
        self.max_calls_per_tool = max;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    pub fn with_planner_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.planner_timeout = timeout;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = OrchestrationParams::default();
        assert_eq!(params.max_steps, 8);
        assert_eq!(params.max_calls_per_tool, 5);
        assert_eq!(params.preview_chars, 800);
        assert!(params.system_prompt.is_none());
    }

    #[test]
    fn test_builder() {
        let params = OrchestrationParams::default()
            .with_max_steps(2)
            .with_max_calls_per_tool(1)
            .with_system_prompt("custom");

        assert_eq!(params.max_steps, 2);
        assert_eq!(params.max_calls_per_tool, 1);
        assert_eq!(params.system_prompt.as_deref(), Some("custom"));
    }
}

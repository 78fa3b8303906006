//! Loop bounds from TOML (`[orchestrator]` section)

use conductor_application::OrchestrationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    pub max_steps: usize,
    pub max_calls_per_tool: usize,
    pub preview_chars: usize,
    /// Per tool call timeout in seconds (0 disables it).
    pub tool_timeout_secs: u64,
    /// Replaces the generated system instruction.
    pub system_prompt: Option<String>,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        let params = OrchestrationParams::default();
        Self {
            max_steps: params.max_steps,
            max_calls_per_tool: params.max_calls_per_tool,
            preview_chars: params.preview_chars,
            tool_timeout_secs: 60,
            system_prompt: None,
        }
    }
}

impl FileOrchestratorConfig {
    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool_timeout_secs > 0).then(|| Duration::from_secs(self.tool_timeout_secs))
    }

    /// Loop parameters, with the planner timeout taken from `[planner]`.
    pub fn to_params(&self, planner_timeout_secs: u64) -> OrchestrationParams {
        let mut params = OrchestrationParams::default()
            .with_max_steps(self.max_steps)
            .with_max_calls_per_tool(self.max_calls_per_tool)
            .with_preview_chars(self.preview_chars)
            .with_planner_timeout(
                (planner_timeout_secs > 0).then(|| Duration::from_secs(planner_timeout_secs)),
            );
        if let Some(prompt) = &self.system_prompt {
            params = params.with_system_prompt(prompt.clone());
        }
        params
    }
}

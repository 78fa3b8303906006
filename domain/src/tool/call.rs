//! Tool call requests as proposed by the planner

use serde::{Deserialize, Serialize};

/// A tool invocation proposed by the planner, before it is numbered by the loop.
///
/// `raw_arguments` is untrusted text straight from the reasoning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Identifier the reasoning service uses to pair the request with its result.
    pub call_id: String,
    pub tool_name: String,
    pub raw_arguments: String,
}

impl ToolRequest {
    pub fn new(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        raw_arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            raw_arguments: raw_arguments.into(),
        }
    }
}

/// One proposed invocation tied to the 1-based step that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCallAttempt {
    request: ToolRequest,
    step_index: usize,
}

impl ToolCallAttempt {
    pub fn new(request: ToolRequest, step_index: usize) -> Self {
        debug_assert!(step_index >= 1, "steps are 1-based");
        Self {
            request,
            step_index,
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.request.tool_name
    }

    pub fn raw_arguments(&self) -> &str {
        &self.request.raw_arguments
    }

    pub fn call_id(&self) -> &str {
        &self.request.call_id
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }
}

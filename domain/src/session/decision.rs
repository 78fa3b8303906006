//! Planner decisions

use serde::{Deserialize, Serialize};

use crate::tool::ToolRequest;

/// What the reasoning service wants to do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannerDecision {
    /// The task is complete; the text is the answer for the user.
    FinalAnswer { text: String },
    /// Run these tools, in this order, then plan again.
    ToolRequests {
        /// Any text the service produced alongside its requests.
        #[serde(default)]
        content: String,
        requests: Vec<ToolRequest>,
    },
}

impl PlannerDecision {
    pub fn final_answer(text: impl Into<String>) -> Self {
        Self::FinalAnswer { text: text.into() }
    }

    pub fn tool_requests(requests: Vec<ToolRequest>) -> Self {
        Self::ToolRequests {
            content: String::new(),
            requests,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::FinalAnswer { .. })
    }
}

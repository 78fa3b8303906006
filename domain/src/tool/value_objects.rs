//! Tool value objects: provider content segments and per-call failures

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One piece of a provider's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSegment {
    Text { text: String },
    Structured { value: Value },
    Binary { mime_type: String },
}

impl ContentSegment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn structured(value: Value) -> Self {
        Self::Structured { value }
    }

    pub fn binary(mime_type: impl Into<String>) -> Self {
        Self::Binary {
            mime_type: mime_type.into(),
        }
    }

    /// Textual form used when flattening a response.
    pub fn render(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Structured { value } => value.to_string(),
            Self::Binary { mime_type } => format!("[binary content: {mime_type}]"),
        }
    }
}

/// Concatenate segments in provider order, one per line.
pub fn flatten_segments(segments: &[ContentSegment]) -> String {
    segments
        .iter()
        .map(ContentSegment::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Classification of a failed tool call attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnknownTool,
    ArgumentParse,
    SchemaValidation,
    RateLimitExceeded,
    ToolExecution,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::ArgumentParse => "argument_parse",
            Self::SchemaValidation => "schema_validation",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::ToolExecution => "tool_execution",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single tool call attempt did not produce a result.
///
/// Every variant is recoverable: the loop logs it and tells the planner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolCallError {
    #[error("Unknown tool '{tool}'")]
    UnknownTool { tool: String },

    #[error("Invalid arguments for tool '{tool}': {raw}. Parse error: {reason}")]
    ArgumentParse {
        tool: String,
        raw: String,
        reason: String,
    },

    #[error("Missing required parameters for tool '{tool}': [{}]", .missing.join(", "))]
    SchemaValidation { tool: String, missing: Vec<String> },

    #[error("Rate limit reached for tool '{tool}' ({limit}/run).")]
    RateLimitExceeded { tool: String, limit: usize },

    #[error("Tool '{tool}' failed: {detail}")]
    Execution { tool: String, detail: String },
}

impl ToolCallError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnknownTool { .. } => FailureKind::UnknownTool,
            Self::ArgumentParse { .. } => FailureKind::ArgumentParse,
            Self::SchemaValidation { .. } => FailureKind::SchemaValidation,
            Self::RateLimitExceeded { .. } => FailureKind::RateLimitExceeded,
            Self::Execution { .. } => FailureKind::ToolExecution,
        }
    }

    pub fn tool(&self) -> &str {
        match self {
            Self::UnknownTool { tool }
            | Self::ArgumentParse { tool, .. }
            | Self::SchemaValidation { tool, .. }
            | Self::RateLimitExceeded { tool, .. }
            | Self::Execution { tool, .. } => tool,
        }
    }
}

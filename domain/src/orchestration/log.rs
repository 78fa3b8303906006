//! Result log: the per-session audit trail of tool call attempts

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::state::SessionOutcome;
use crate::tool::{FailureKind, ToolCallError};

/// Result of one attempted call: a preview of the output, or the error.
///
/// A sum type, so a log entry can never carry both or neither.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success { result_preview: String },
    Failure { kind: FailureKind, error: String },
}

/// Immutable audit record of one attempted tool call, including rejected ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolLogEntry {
    step: usize,
    tool_name: String,
    provider_id: Option<String>,
    arguments: Value,
    outcome: ToolOutcome,
}

impl ToolLogEntry {
    pub fn success(
        step: usize,
        tool_name: impl Into<String>,
        provider_id: Option<String>,
        arguments: Value,
        result_preview: impl Into<String>,
    ) -> Self {
        Self {
            step,
            tool_name: tool_name.into(),
            provider_id,
            arguments,
            outcome: ToolOutcome::Success {
                result_preview: result_preview.into(),
            },
        }
    }

    pub fn failure(
        step: usize,
        provider_id: Option<String>,
        arguments: Value,
        error: &ToolCallError,
    ) -> Self {
        Self {
            step,
            tool_name: error.tool().to_string(),
            provider_id,
            arguments,
            outcome: ToolOutcome::Failure {
                kind: error.kind(),
                error: error.to_string(),
            },
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Provider that owns the tool; `None` when the name did not resolve.
    pub fn provider_id(&self) -> Option<&str> {
        self.provider_id.as_deref()
    }

    pub fn arguments(&self) -> &Value {
        &self.arguments
    }

    pub fn outcome(&self) -> &ToolOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success { .. })
    }

    pub fn result_preview(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Success { result_preview } => Some(result_preview),
            ToolOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Failure { error, .. } => Some(error),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

#[derive(Serialize)]
struct ToolLogRecord<'a> {
    step: usize,
    tool_name: &'a str,
    provider_id: Option<&'a str>,
    arguments: &'a Value,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_preview: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<FailureKind>,
}

impl Serialize for ToolLogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ToolLogRecord {
            step: self.step,
            tool_name: &self.tool_name,
            provider_id: self.provider_id(),
            arguments: &self.arguments,
            success: self.is_success(),
            result_preview: self.result_preview(),
            error: self.error(),
            error_kind: self.failure_kind(),
        }
        .serialize(serializer)
    }
}

/// Ordered, append-only collection of [`ToolLogEntry`] for one session.
#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    entries: Vec<ToolLogEntry>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: ToolLogEntry) {
        debug_assert!(
            self.entries.last().is_none_or(|last| last.step() <= entry.step()),
            "log steps must be non-decreasing"
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ToolLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ToolLogEntry> {
        self.entries
    }
}

/// Terminal output of a session.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationResult {
    pub final_answer: String,
    pub tool_log: Vec<ToolLogEntry>,
    pub outcome: SessionOutcome,
    /// Planning steps consumed, at most the configured budget.
    pub steps_taken: usize,
}

impl OrchestrationResult {
    pub fn new(
        final_answer: impl Into<String>,
        log: ResultLog,
        outcome: SessionOutcome,
        steps_taken: usize,
    ) -> Self {
        Self {
            final_answer: final_answer.into(),
            tool_log: log.into_entries(),
            outcome,
            steps_taken,
        }
    }

    pub fn successful_calls(&self) -> usize {
        self.tool_log.iter().filter(|e| e.is_success()).count()
    }

    pub fn failed_calls(&self) -> usize {
        self.tool_log.len() - self.successful_calls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_entry_has_preview_only() {
        let entry = ToolLogEntry::success(
            1,
            "files__read",
            Some("files".into()),
            json!({"path": "a.txt"}),
            "hello",
        );
        assert!(entry.is_success());
        assert_eq!(entry.result_preview(), Some("hello"));
        assert!(entry.error().is_none());
        assert!(entry.failure_kind().is_none());
    }

    #[test]
    fn test_failure_entry_has_error_only() {
        let error = ToolCallError::UnknownTool {
            tool: "nope__x".into(),
        };
        let entry = ToolLogEntry::failure(2, None, json!({}), &error);
        assert!(!entry.is_success());
        assert_eq!(entry.tool_name(), "nope__x");
        assert_eq!(entry.error(), Some("Unknown tool 'nope__x'"));
        assert!(entry.result_preview().is_none());
        assert_eq!(entry.failure_kind(), Some(FailureKind::UnknownTool));
    }

    #[test]
    fn test_entry_serializes_flat() {
        let error = ToolCallError::RateLimitExceeded {
            tool: "web__search".into(),
            limit: 5,
        };
        let entry = ToolLogEntry::failure(3, Some("web".into()), json!({"q": "rust"}), &error);
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            json!({
                "step": 3,
                "tool_name": "web__search",
                "provider_id": "web",
                "arguments": {"q": "rust"},
                "success": false,
                "error": "Rate limit reached for tool 'web__search' (5/run).",
                "error_kind": "rate_limit_exceeded"
            })
        );
    }

    #[test]
    fn test_result_counts() {
        let mut log = ResultLog::new();
        log.record(ToolLogEntry::success(1, "a__b", Some("a".into()), json!({}), "ok"));
        log.record(ToolLogEntry::failure(
            1,
            None,
            json!({}),
            &ToolCallError::UnknownTool { tool: "x".into() },
        ));
        let result = OrchestrationResult::new("done", log, SessionOutcome::Done, 1);

        assert_eq!(result.tool_log.len(), 2);
        assert_eq!(result.successful_calls(), 1);
        assert_eq!(result.failed_calls(), 1);
    }
}

//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording session events
//! (planner decisions, tool calls, session end) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the session
//! transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// Event type identifiers written by the orchestration loop.
pub mod events {
    pub const SESSION_START: &str = "session_start";
    pub const PLANNER_DECISION: &str = "planner_decision";
    pub const PLANNER_ERROR: &str = "planner_error";
    pub const TOOL_CALL: &str = "tool_call";
    pub const SESSION_END: &str = "session_end";
}

/// One transcript record: an event type plus its JSON payload.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// One of [`events`], or a caller-defined identifier.
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for the session transcript.
///
/// `log` is synchronous and infallible; a failing sink must not disturb the
/// session.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Used when no transcript is configured.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

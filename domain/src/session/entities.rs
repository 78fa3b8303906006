//! Session domain entities

use serde::{Deserialize, Serialize};

use crate::tool::ToolRequest;

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A turn in a conversation (Entity)
///
/// Assistant turns may carry the tool requests they proposed; tool turns
/// answer exactly one of those requests through `tool_call_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_requests: Vec<ToolRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Turn {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_requests: Vec::new(),
            tool_call_id: None,
            tool_name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Assistant turn proposing tool calls.
    pub fn assistant_with_requests(content: impl Into<String>, requests: Vec<ToolRequest>) -> Self {
        Self {
            tool_requests: requests,
            ..Self::plain(Role::Assistant, content)
        }
    }

    /// Tool output (or a corrective note) answering one request.
    pub fn tool(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: Some(call_id.into()),
            tool_name: Some(tool_name.into()),
            ..Self::plain(Role::Tool, content)
        }
    }
}

/// Ordered, append-only record of a session's conversation.
///
/// Starts with the system instruction and the user goal. Turns are only
/// ever appended; there is no way to edit or remove one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationState {
    turns: Vec<Turn>,
}

impl ConversationState {
    pub fn new(system_instruction: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_instruction), Turn::user(goal)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// The user goal the session was started with.
    pub fn goal(&self) -> &str {
        self.turns
            .iter()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_has_system_and_goal() {
        let conversation = ConversationState::new("be helpful", "summarize a.txt");
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.turns()[0].role, Role::System);
        assert_eq!(conversation.turns()[1].role, Role::User);
        assert_eq!(conversation.goal(), "summarize a.txt");
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut conversation = ConversationState::new("sys", "goal");
        let request = ToolRequest::new("call_1", "files__read", r#"{"path":"a.txt"}"#);
        conversation.push(Turn::assistant_with_requests("", vec![request.clone()]));
        conversation.push(Turn::tool("call_1", "files__read", "hello"));

        let last = conversation.last().unwrap();
        assert_eq!(last.role, Role::Tool);
        assert_eq!(last.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(conversation.turns()[2].tool_requests, vec![request]);
    }

    #[test]
    fn test_turn_serialization_skips_empty_fields() {
        let json = serde_json::to_value(Turn::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
    }
}

//! Wire types for the OpenAI Chat Completions API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single message in the conversation.
///
/// `content` is always sent as a string: several local runtimes reject
/// `null` content on assistant messages that carry tool calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallMessage>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }
}

/// Tool call echoed back inside an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallMessage {
    pub id: String,
    pub r#type: &'static str,
    pub function: FunctionCallMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCallMessage {
    pub name: String,
    pub arguments: String,
}

/// Tool definition sent in the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub r#type: &'static str,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Response body (only the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub function: FunctionCallResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCallResponse {
    pub name: String,
    /// Raw argument text. Some backends send an object instead of a string;
    /// it is re-serialized so the loop always parses text.
    #[serde(default, deserialize_with = "arguments_as_text")]
    pub arguments: String,
}

fn arguments_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assistant_tool_calls_serialize() {
        let mut message = ChatMessage::new(Role::Assistant, "");
        message.tool_calls.push(ToolCallMessage {
            id: "call_1".into(),
            r#type: "function",
            function: FunctionCallMessage {
                name: "files__read".into(),
                arguments: "{\"path\":\"a\"}".into(),
            },
        });

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "files__read", "arguments": "{\"path\":\"a\"}"}
                }]
            })
        );
    }

    #[test]
    fn test_object_arguments_become_text() {
        let call: ToolCallResponse = serde_json::from_value(json!({
            "function": {"name": "web__search", "arguments": {"q": "rust"}}
        }))
        .unwrap();
        assert!(call.id.is_none());
        assert_eq!(call.function.arguments, r#"{"q":"rust"}"#);
    }
}

//! JSON-RPC and MCP message types.
//!
//! - **Requests**: client → server (`initialize`, `tools/list`, `tools/call`)
//! - **Responses**: server → client (result or error)
//! - **Notifications**: either direction, no `id` (`notifications/initialized`)

use conductor_domain::ContentSegment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// MCP revision announced during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Method-not-found code, returned for server-initiated requests we do not serve.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification (no `id`, no response)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Outgoing response to a server-initiated request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponseOut {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl JsonRpcResponseOut {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(serde_json::json!({
                "code": METHOD_NOT_FOUND,
                "message": format!("Method not found: {method}"),
            })),
        }
    }
}

/// Classification of an incoming line.
#[derive(Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// Answer to one of our requests (has `id`, no `method`).
    Response { id: u64 },
    /// Request from the server (has `id` and `method`), e.g. `ping`.
    IncomingRequest,
    /// Notification from the server (has `method`, no `id`).
    Notification,
    /// Anything else, e.g. a stray log line printed as JSON.
    Other,
}

/// Classify a JSON-RPC message by inspecting `id` and `method` fields.
pub fn classify_message(json: &Value) -> MessageKind {
    let id = json.get("id").filter(|v| !v.is_null());
    let has_method = json.get("method").and_then(Value::as_str).is_some();

    match (id, has_method) {
        (Some(_), true) => MessageKind::IncomingRequest,
        (Some(id), false) => match id.as_u64() {
            Some(id) => MessageKind::Response { id },
            None => MessageKind::Other,
        },
        (None, true) => MessageKind::Notification,
        (None, false) => MessageKind::Other,
    }
}

/// `initialize` request parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: &'static str,
    pub capabilities: Value,
    pub client_info: ClientInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for InitializeParams {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: Value::Object(Map::new()),
            client_info: ClientInfo {
                name: "mcp-conductor",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// `initialize` result (only the fields we read)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    #[serde(default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub server_info: Option<ServerInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// One page of `tools/list`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    #[serde(default)]
    pub tools: Vec<McpTool>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Tool as advertised by a server
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: Option<Value>,
}

/// `tools/call` parameters
#[derive(Debug, Clone, Serialize)]
pub struct CallToolParams<'a> {
    pub name: &'a str,
    pub arguments: &'a Map<String, Value>,
}

/// `tools/call` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<McpContent>,
    #[serde(default)]
    pub structured_content: Option<Value>,
    #[serde(default)]
    pub is_error: bool,
}

impl CallToolResult {
    /// Content as domain segments; falls back to `structuredContent` when
    /// the server sent no content items.
    pub fn segments(&self) -> Vec<ContentSegment> {
        if self.content.is_empty() {
            return self
                .structured_content
                .clone()
                .map(ContentSegment::structured)
                .into_iter()
                .collect();
        }
        self.content.iter().map(McpContent::to_segment).collect()
    }
}

/// One content item of a tool result
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum McpContent {
    Text {
        text: String,
    },
    Image {
        #[serde(rename = "mimeType", default)]
        mime_type: Option<String>,
    },
    Audio {
        #[serde(rename = "mimeType", default)]
        mime_type: Option<String>,
    },
    Resource {
        resource: Value,
    },
    #[serde(other)]
    Unknown,
}

impl McpContent {
    pub fn to_segment(&self) -> ContentSegment {
        match self {
            McpContent::Text { text } => ContentSegment::text(text.clone()),
            McpContent::Image { mime_type } => {
                ContentSegment::binary(mime_type.as_deref().unwrap_or("image/*"))
            }
            McpContent::Audio { mime_type } => {
                ContentSegment::binary(mime_type.as_deref().unwrap_or("audio/*"))
            }
            McpContent::Resource { resource } => {
                if let Some(text) = resource.get("text").and_then(Value::as_str) {
                    ContentSegment::text(text)
                } else if resource.get("blob").is_some() {
                    ContentSegment::binary(
                        resource
                            .get("mimeType")
                            .and_then(Value::as_str)
                            .unwrap_or("application/octet-stream"),
                    )
                } else {
                    ContentSegment::structured(resource.clone())
                }
            }
            McpContent::Unknown => ContentSegment::binary("application/octet-stream"),
        }
    }
}

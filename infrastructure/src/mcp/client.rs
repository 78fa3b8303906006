//! MCP client session on top of a [`StdioTransport`].

use super::error::McpError;
use super::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, ListToolsResult, McpTool,
};
use super::transport::StdioTransport;
use serde_json::{Map, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

/// Upper bound on `tools/list` pages, against servers that loop on a cursor.
const MAX_LIST_PAGES: usize = 64;

/// An initialized MCP session.
pub struct McpClient<R, W> {
    transport: StdioTransport<R, W>,
    server_info: InitializeResult,
}

impl<R, W> McpClient<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Run the `initialize` / `notifications/initialized` handshake.
    pub async fn initialize(mut transport: StdioTransport<R, W>) -> Result<Self, McpError> {
        let params = serde_json::to_value(InitializeParams::default())?;
        let result = transport.request("initialize", Some(params)).await?;
        let server_info: InitializeResult =
            serde_json::from_value(result).map_err(|e| McpError::InitFailed {
                server: transport.server().to_string(),
                reason: format!("failed to parse initialize response: {e}"),
            })?;

        transport.notify("notifications/initialized", None).await?;

        debug!(
            server = %transport.server(),
            protocol = server_info.protocol_version.as_deref().unwrap_or("unknown"),
            name = server_info
                .server_info
                .as_ref()
                .and_then(|i| i.name.as_deref())
                .unwrap_or("unknown"),
            "MCP handshake complete"
        );

        Ok(Self {
            transport,
            server_info,
        })
    }

    pub fn server_info(&self) -> &InitializeResult {
        &self.server_info
    }

    /// All tools, following `nextCursor` until the server stops paging.
    pub async fn list_tools(&mut self) -> Result<Vec<McpTool>, McpError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let params = cursor
                .as_ref()
                .map(|c| serde_json::json!({ "cursor": c }));
            let result = self.transport.request("tools/list", params).await?;
            let page: ListToolsResult = serde_json::from_value(result).map_err(|e| {
                McpError::UnexpectedResponse(format!("invalid tools/list result: {e}"))
            })?;

            tools.extend(page.tools);
            match page.next_cursor {
                Some(next) if !next.is_empty() && cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next)
                }
                _ => return Ok(tools),
            }
        }

        warn!(
            server = %self.transport.server(),
            "tools/list still paging after {} pages, keeping {} tools",
            MAX_LIST_PAGES,
            tools.len()
        );
        Ok(tools)
    }

    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        let params = serde_json::to_value(CallToolParams { name, arguments })?;
        let result = self.transport.request("tools/call", Some(params)).await?;
        serde_json::from_value(result)
            .map_err(|e| McpError::UnexpectedResponse(format!("invalid tools/call result: {e}")))
    }

    pub async fn close(&mut self) -> Result<(), McpError> {
        self.transport.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::PROTOCOL_VERSION;
    use crate::mcp::transport::testing::{FakeServer, pair};
    use conductor_domain::ContentSegment;
    use serde_json::json;

    async fn handshake(server: &mut FakeServer) {
        let init = server
            .respond(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "fake", "version": "1.0"}
            }))
            .await;
        assert_eq!(init["method"], "initialize");
        assert_eq!(init["params"]["protocolVersion"], PROTOCOL_VERSION);

        let initialized = server.recv().await;
        assert_eq!(initialized["method"], "notifications/initialized");
    }

    #[tokio::test]
    async fn test_initialize_and_paginated_listing() {
        let (transport, mut server) = pair();

        let server_task = tokio::spawn(async move {
            handshake(&mut server).await;

            let first = server
                .respond(json!({
                    "tools": [{"name": "read"}, {"name": "write"}],
                    "nextCursor": "page-2"
                }))
                .await;
            assert!(first.get("params").is_none());

            let second = server
                .respond(json!({"tools": [{"name": "list", "description": "List a directory"}]}))
                .await;
            assert_eq!(second["params"]["cursor"], "page-2");
        });

        let mut client = McpClient::initialize(transport).await.unwrap();
        let name = client
            .server_info()
            .server_info
            .as_ref()
            .and_then(|i| i.name.clone());
        assert_eq!(name.as_deref(), Some("fake"));

        let tools = client.list_tools().await.unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["read", "write", "list"]);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_repeated_cursor_stops_paging() {
        let (transport, mut server) = pair();

        tokio::spawn(async move {
            handshake(&mut server).await;
            server
                .respond(json!({"tools": [{"name": "a"}], "nextCursor": "same"}))
                .await;
            server
                .respond(json!({"tools": [{"name": "b"}], "nextCursor": "same"}))
                .await;
            let _ = server.recv().await;
        });

        let mut client = McpClient::initialize(transport).await.unwrap();
        let tools = client.list_tools().await.unwrap();
        assert_eq!(tools.len(), 2);
    }

    #[tokio::test]
    async fn test_call_tool() {
        let (transport, mut server) = pair();

        let server_task = tokio::spawn(async move {
            handshake(&mut server).await;
            server
                .respond(json!({"content": [{"type": "text", "text": "42 results"}]}))
                .await
        });

        let mut client = McpClient::initialize(transport).await.unwrap();
        let args = json!({"query": "rust"});
        let result = client
            .call_tool("search", args.as_object().unwrap())
            .await
            .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.segments(), vec![ContentSegment::text("42 results")]);

        let request = server_task.await.unwrap();
        assert_eq!(request["method"], "tools/call");
        assert_eq!(request["params"], json!({"name": "search", "arguments": {"query": "rust"}}));
    }

    #[tokio::test]
    async fn test_initialize_rejected() {
        let (transport, mut server) = pair();

        tokio::spawn(async move {
            let request = server.recv().await;
            server
                .send(json!({
                    "jsonrpc": "2.0",
                    "id": request["id"],
                    "error": {"code": -32602, "message": "Unsupported protocol version"}
                }))
                .await;
            let _ = server.recv().await;
        });

        let err = McpClient::initialize(transport).await.err().unwrap();
        assert!(matches!(err, McpError::Rpc { code: -32602, .. }));
    }
}

//! Line-delimited JSON-RPC transport.
//!
//! One JSON object per line in each direction. The transport owns both halves
//! of the stream and serves one request at a time: it writes the request,
//! then reads until the response with the matching id arrives. Lines in
//! between are classified with [`classify_message`]:
//!
//! - responses with another id are stale (a timed-out earlier call) and dropped
//! - server requests get an answer (`ping`) or a method-not-found error
//! - notifications and non-JSON lines are logged at trace level

use super::error::McpError;
use super::protocol::{
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, JsonRpcResponseOut, MessageKind,
    classify_message,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, trace};

/// Longest line accepted from a server (16 MiB).
const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// Bi-directional JSON-RPC transport over a reader/writer pair
/// (a child's stdout/stdin in production, an in-memory duplex in tests).
pub struct StdioTransport<R, W> {
    server: String,
    reader: FramedRead<R, LinesCodec>,
    writer: FramedWrite<W, LinesCodec>,
    next_id: u64,
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(server: impl Into<String>, reader: R, writer: W) -> Self {
        Self {
            server: server.into(),
            reader: FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_BYTES)),
            writer: FramedWrite::new(writer, LinesCodec::new()),
            next_id: 1,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Send a request and wait for its result.
    pub async fn request(&mut self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        let id = self.next_id;
        self.next_id += 1;

        trace!(server = %self.server, id, method, "-> request");
        self.send(&JsonRpcRequest::new(id, method, params)).await?;

        loop {
            let value = self.read_message().await?;
            match classify_message(&value) {
                MessageKind::Response { id: got } if got == id => {
                    let response: JsonRpcResponse = serde_json::from_value(value)?;
                    return extract_result(response);
                }
                MessageKind::Response { id: got } => {
                    debug!(server = %self.server, id = got, "Discarding stale response");
                }
                MessageKind::IncomingRequest => self.answer(&value).await?,
                MessageKind::Notification => {
                    trace!(server = %self.server, "<- notification {}", value["method"]);
                }
                MessageKind::Other => {
                    trace!(server = %self.server, "<- ignored message");
                }
            }
        }
    }

    /// Send a notification (no response expected).
    pub async fn notify(&mut self, method: &str, params: Option<Value>) -> Result<(), McpError> {
        trace!(server = %self.server, method, "-> notification");
        self.send(&JsonRpcNotification::new(method, params)).await
    }

    /// Flush and close the write half; the server sees end of input.
    pub async fn close(&mut self) -> Result<(), McpError> {
        SinkExt::<String>::close(&mut self.writer)
            .await
            .map_err(|e| self.transport_error(format!("failed to close input: {e}")))
    }

    async fn send<T: Serialize>(&mut self, message: &T) -> Result<(), McpError> {
        let line = serde_json::to_string(message)?;
        self.writer
            .send(line)
            .await
            .map_err(|e| self.transport_error(format!("failed to write: {e}")))
    }

    /// Next JSON line from the server, skipping blank and non-JSON lines.
    async fn read_message(&mut self) -> Result<Value, McpError> {
        loop {
            let line = match self.reader.next().await {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Err(self.transport_error(format!("failed to read: {e}"))),
                None => {
                    return Err(McpError::TransportClosed {
                        server: self.server.clone(),
                    });
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => return Ok(value),
                Err(_) => trace!(server = %self.server, "<- non-JSON output: {}", trimmed),
            }
        }
    }

    async fn answer(&mut self, request: &Value) -> Result<(), McpError> {
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let method = request
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let reply = if method == "ping" {
            JsonRpcResponseOut::result(id, Value::Object(Default::default()))
        } else {
            debug!(server = %self.server, method, "Rejecting server request");
            JsonRpcResponseOut::method_not_found(id, method)
        };
        self.send(&reply).await
    }

    fn transport_error(&self, reason: String) -> McpError {
        McpError::Transport {
            server: self.server.clone(),
            reason,
        }
    }
}

/// Extract the result from a JSON-RPC response, converting errors to [`McpError`].
pub fn extract_result(response: JsonRpcResponse) -> Result<Value, McpError> {
    if let Some(err) = response.error {
        return Err(McpError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    Ok(response.result.unwrap_or(Value::Null))
}


#[cfg(test)]
mod tests {
    use super::testing::pair;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn request_skips_noise_and_answers_ping() {
        let (mut transport, mut server) = pair();

        let server_task = tokio::spawn(async move {
            let request = server.recv().await;
            assert_eq!(request["method"], "tools/list");
            let id = request["id"].clone();

            server.send_raw("server starting...").await;
            server.send_raw("").await;
            server
                .send(json!({"jsonrpc": "2.0", "method": "notifications/message", "params": {}}))
                .await;
            server
                .send(json!({"jsonrpc": "2.0", "id": 999, "result": {"stale": true}}))
                .await;
            server
                .send(json!({"jsonrpc": "2.0", "id": "p1", "method": "ping"}))
                .await;
            server
                .send(json!({"jsonrpc": "2.0", "id": id, "result": {"tools": []}}))
                .await;

            server.recv().await
        });

        let result = transport.request("tools/list", None).await.unwrap();
        assert_eq!(result, json!({"tools": []}));

        let pong = server_task.await.unwrap();
        assert_eq!(pong["id"], "p1");
        assert_eq!(pong["result"], json!({}));
    }

    #[tokio::test]
    async fn request_ids_increase() {
        let (mut transport, mut server) = pair();

        let server_task = tokio::spawn(async move {
            let first = server.respond(json!({})).await;
            let second = server.respond(json!({})).await;
            (first["id"].as_u64().unwrap(), second["id"].as_u64().unwrap())
        });

        transport.request("a", None).await.unwrap();
        transport.request("b", None).await.unwrap();
        let (first, second) = server_task.await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn rpc_error_is_returned() {
        let (mut transport, mut server) = pair();

        tokio::spawn(async move {
            let request = server.recv().await;
            server
                .send(json!({
                    "jsonrpc": "2.0",
                    "id": request["id"],
                    "error": {"code": -32601, "message": "Method not found"}
                }))
                .await;
            // keep the stream open until the client has read the reply
            let _ = server.recv().await;
        });

        let err = transport.request("bogus", None).await.unwrap_err();
        match err {
            McpError::Rpc { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("expected Rpc error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_stream_is_reported() {
        let (mut transport, server) = pair();
        drop(server);

        let err = transport.request("tools/list", None).await.unwrap_err();
        assert!(matches!(
            err,
            McpError::TransportClosed { .. } | McpError::Transport { .. }
        ));
    }

    #[tokio::test]
    async fn notification_has_no_id() {
        let (mut transport, mut server) = pair();
        transport
            .notify("notifications/initialized", None)
            .await
            .unwrap();

        let message = server.recv().await;
        assert_eq!(message["method"], "notifications/initialized");
        assert!(message.get("id").is_none());
    }

    #[tokio::test]
    async fn close_ends_server_input() {
        let (mut transport, mut server) = pair();
        transport.notify("notifications/initialized", None).await.unwrap();
        transport.close().await.unwrap();

        assert_eq!(server.recv().await["method"], "notifications/initialized");
        assert!(server.at_eof().await);
    }
}

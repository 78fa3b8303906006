//! Error types for the MCP adapter

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to an MCP server
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Command '{command}' not found on PATH")]
    CommandNotFound { command: String },

    #[error("Failed to spawn server '{server}': {reason}")]
    SpawnFailed { server: String, reason: String },

    #[error("Initialization of server '{server}' failed: {reason}")]
    InitFailed { server: String, reason: String },

    #[error("Transport error for server '{server}': {reason}")]
    Transport { server: String, reason: String },

    #[error("Server '{server}' closed its output")]
    TransportClosed { server: String },

    #[error("JSON-RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Request timeout after {}s", .0.as_secs())]
    Timeout(Duration),
}

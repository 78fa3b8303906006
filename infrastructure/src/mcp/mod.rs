//! MCP server adapter
//!
//! Speaks JSON-RPC 2.0 over a child process's stdio, one JSON object per line.
//!
//! - [`transport`]: framing, request/response correlation
//! - [`client`]: the MCP handshake, `tools/list` paging and `tools/call`
//! - [`provider`]: process lifecycle behind the [`ToolProvider`] port
//!
//! [`ToolProvider`]: conductor_domain::ToolProvider

pub mod client;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod transport;

pub use client::McpClient;
pub use error::McpError;
pub use provider::McpServerProvider;
pub use transport::StdioTransport;

//! Tool invocation port
//!
//! Defines how the application layer reaches the tools of a session.

use async_trait::async_trait;
use conductor_domain::{DiscoveryError, DiscoveryReport, ToolCatalog, ToolDescriptor};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure of a single invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The qualified name is not in the catalog.
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    /// The provider failed, reported an error payload, or timed out.
    #[error("{0}")]
    Execution(String),
}

/// Port for dispatching tool calls by qualified name
#[async_trait]
pub trait ToolInvokerPort: Send + Sync {
    /// Tools currently available
    fn catalog(&self) -> &ToolCatalog;

    fn descriptor(&self, qualified_name: &str) -> Option<&ToolDescriptor> {
        self.catalog().get(qualified_name)
    }

    /// Dispatch to the owning provider and flatten its response into text.
    async fn invoke(
        &self,
        qualified_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<String, InvokeError>;
}

/// Tool access with a connection lifecycle: discover at session start,
/// tear down at session end.
#[async_trait]
pub trait ToolSessionPort: ToolInvokerPort {
    /// Connect to every configured provider and rebuild the catalog.
    ///
    /// Succeeds when at least one provider is reachable.
    async fn discover(&mut self) -> Result<DiscoveryReport, DiscoveryError>;

    /// Close every provider connection.
    async fn shutdown(&mut self);
}

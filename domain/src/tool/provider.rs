//! Tool provider abstraction
//!
//! A [`ToolProvider`] is an external source of callable operations: an MCP
//! server process, or an in-process set of tools. The registry aggregates
//! providers and exposes their operations under namespaced names:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ToolRegistry                            │
//! │  (discovers providers, routes by qualified name)            │
//! └─────────────────────────────────────────────────────────────┘
//!           │                    │                    │
//!           ▼                    ▼                    ▼
//!    ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!    │ MCP "files" │      │ MCP "web"   │      │ local_      │
//!    │ (stdio)     │      │ (stdio)     │      │ insights    │
//!    └─────────────┘      └─────────────┘      └─────────────┘
//!      files__read          web__search        local_insights__clean_text
//! ```
//!
//! Providers only ever see their own local operation names; namespacing is
//! the registry's job.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

use super::value_objects::ContentSegment;

/// Error type for tool provider operations
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Provider could not be reached (process failed to start, handshake failed)
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// Provider was reached but listing its operations failed
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Operation not exposed by this provider
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Operation ran and reported an error, or the transport broke mid-call
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// No response within the allowed time
    #[error("Timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Provider is misconfigured
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// An operation as listed by a provider, before namespacing.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationInfo {
    pub name: String,
    pub description: Option<String>,
    /// Raw parameter schema; `None` when the provider advertises none.
    pub input_schema: Option<Value>,
}

impl OperationInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// External source of callable operations.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Identifier used as the namespace of this provider's tools.
    ///
    /// Examples: "files", "web", "local_insights"
    fn id(&self) -> &str;

    /// Display name for user-facing output
    fn display_name(&self) -> &str {
        self.id()
    }

    /// Connect if needed and list the operations this provider exposes.
    async fn list_operations(&self) -> Result<Vec<OperationInfo>, ProviderError>;

    /// Invoke an operation by its local name.
    async fn call(
        &self,
        local_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Vec<ContentSegment>, ProviderError>;

    /// Release the connection. Safe to call more than once.
    async fn shutdown(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

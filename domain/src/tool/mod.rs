//! Tool domain module
//!
//! Tools come from external providers. Discovery turns each provider's
//! operation listing into [`ToolDescriptor`]s with namespaced names, collected
//! into a [`ToolCatalog`] for the session.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ ToolProvider │───▶│ ToolCatalog  │───▶│ ToolCallAttempt  │
//! │ (operations) │    │ (namespaced) │    │ (planner input)  │
//! └──────────────┘    └──────────────┘    └──────────────────┘
//!                            │
//!                            └─ "files__read" → ToolDescriptor
//! ```
//!
//! # Key Types
//!
//! - [`ToolDescriptor`]: one operation: qualified name, provider, schema
//! - [`ToolCatalog`]: the flat namespace for a session
//! - [`ToolRequest`] / [`ToolCallAttempt`]: a proposed invocation
//! - [`ContentSegment`]: one piece of a provider response
//! - [`ToolCallError`]: recoverable per-call failures
//! - [`DiscoveryReport`]: which providers made it into the catalog, and why not
//! - [`ToolProvider`]: abstraction over MCP servers and in-process tools

pub mod call;
pub mod discovery;
pub mod entities;
pub mod provider;
pub mod validation;
pub mod value_objects;

pub use call::{ToolCallAttempt, ToolRequest};
pub use discovery::{DiscoveryError, DiscoveryReport, ProviderStatus};
pub use entities::{ArgumentSchema, ToolCatalog, ToolDescriptor, qualify};
pub use provider::{OperationInfo, ProviderError, ToolProvider};
pub use validation::{ArgumentValidator, RequiredFieldsValidator, parse_arguments};
pub use value_objects::{ContentSegment, FailureKind, ToolCallError, flatten_segments};

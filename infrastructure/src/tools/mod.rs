//! Tool providers and the registry that aggregates them
//!
//! - [`ToolRegistry`]: discovery, namespacing and routing across providers
//! - [`LocalInsightsProvider`]: in-process text tools (`local_insights__*`)
//!
//! MCP server providers live in [`crate::mcp`].

pub mod insights;
pub mod registry;

pub use insights::{LOCAL_INSIGHTS_ID, LocalInsightsProvider};
pub use registry::ToolRegistry;

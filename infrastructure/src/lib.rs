//! Infrastructure layer for mcp-conductor
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer:
//!
//! - [`mcp`]: MCP servers over stdio as [`ToolProvider`](conductor_domain::ToolProvider)s
//! - [`tools`]: the [`ToolRegistry`] and the built-in `local_insights` provider
//! - [`planner`]: the OpenAI-compatible [`Planner`](conductor_application::Planner)
//! - [`logging`]: JSONL session transcripts
//! - [`config`]: configuration file loading

pub mod config;
pub mod logging;
pub mod mcp;
pub mod planner;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, FileConfig, FileMcpServerConfig, FilePlannerConfig, PlannerBackend,
    Severity,
};
pub use logging::JsonlConversationLogger;
pub use mcp::{McpError, McpServerProvider};
pub use planner::OpenAiPlanner;
pub use tools::{LOCAL_INSIGHTS_ID, LocalInsightsProvider, ToolRegistry};

use std::sync::Arc;

/// Build the registry for a configuration: enabled MCP servers in file
/// order, then the built-in provider when enabled.
pub fn build_registry(config: &FileConfig) -> ToolRegistry {
    let registry = config
        .enabled_servers()
        .fold(ToolRegistry::new(), |registry, server| {
            registry.register_arc(Arc::new(McpServerProvider::new(server.clone())))
        });

    let registry = if config.builtin.local_insights {
        registry.register(LocalInsightsProvider::new())
    } else {
        registry
    };

    registry.with_tool_timeout(config.orchestrator.tool_timeout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry_order() {
        let config: FileConfig = toml::from_str(
            r#"
[[servers]]
name = "files"
command = "npx"

[[servers]]
name = "web"
command = "uvx"
enabled = false

[[servers]]
name = "github"
command = "npx"
"#,
        )
        .unwrap();

        let registry = build_registry(&config);
        assert_eq!(registry.provider_ids(), vec!["files", "github", LOCAL_INSIGHTS_ID]);
    }

    #[test]
    fn test_build_registry_without_builtin() {
        let mut config = FileConfig::default();
        config.builtin.local_insights = false;
        assert!(build_registry(&config).provider_ids().is_empty());
    }
}

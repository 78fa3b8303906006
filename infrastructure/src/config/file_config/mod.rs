//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//!
//! ```toml
//! [planner]
//! backend = "groq"
//! model = "llama-3.3-70b-versatile"
//!
//! [orchestrator]
//! max_steps = 8
//! max_calls_per_tool = 5
//!
//! [[servers]]
//! name = "files"
//! command = "npx"
//! args = ["-y", "@modelcontextprotocol/server-filesystem", "."]
//! ```

mod builtin;
mod logging;
mod orchestrator;
mod planner;
mod servers;

pub use builtin::FileBuiltinConfig;
pub use logging::FileLoggingConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use planner::{FilePlannerConfig, PlannerBackend};
pub use servers::FileMcpServerConfig;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending field, e.g. `servers[1].name`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Reasoning service settings
    pub planner: FilePlannerConfig,
    /// Loop bounds
    pub orchestrator: FileOrchestratorConfig,
    /// In-process tool providers
    pub builtin: FileBuiltinConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
    /// MCP servers, in registration order
    pub servers: Vec<FileMcpServerConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.orchestrator.max_steps == 0 {
            issues.push(ConfigIssue::error(
                "orchestrator.max_steps",
                "max_steps must be at least 1",
            ));
        }
        if self.orchestrator.max_calls_per_tool == 0 {
            issues.push(ConfigIssue::warning(
                "orchestrator.max_calls_per_tool",
                "max_calls_per_tool is 0: every tool call will be rejected",
            ));
        }
        if !(0.0..=2.0).contains(&self.planner.temperature) {
            issues.push(ConfigIssue::error(
                "planner.temperature",
                format!("temperature {} is outside 0.0..=2.0", self.planner.temperature),
            ));
        }
        if self.planner.max_tokens == 0 {
            issues.push(ConfigIssue::error(
                "planner.max_tokens",
                "max_tokens cannot be 0",
            ));
        }

        let mut seen = HashSet::new();
        if self.builtin.local_insights {
            seen.insert(crate::tools::LOCAL_INSIGHTS_ID.to_string());
        }
        for (i, server) in self.servers.iter().enumerate() {
            let field = format!("servers[{i}]");
            if server.name.trim().is_empty() {
                issues.push(ConfigIssue::error(format!("{field}.name"), "server name cannot be empty"));
            } else if server.name.contains(conductor_domain::tool::entities::QUALIFIED_NAME_SEPARATOR) {
                issues.push(ConfigIssue::error(
                    format!("{field}.name"),
                    format!("server name '{}' cannot contain '__'", server.name),
                ));
            } else if !seen.insert(server.name.clone()) {
                issues.push(ConfigIssue::error(
                    format!("{field}.name"),
                    format!("duplicate server name '{}'", server.name),
                ));
            }
            if server.command.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    format!("{field}.command"),
                    "server command cannot be empty",
                ));
            }
        }

        if self.enabled_servers().next().is_none() && !self.builtin.local_insights {
            issues.push(ConfigIssue::error(
                "servers",
                "no tool providers configured: add a [[servers]] entry or enable builtin.local_insights",
            ));
        }

        issues
    }

    /// Servers not switched off with `enabled = false`.
    pub fn enabled_servers(&self) -> impl Iterator<Item = &FileMcpServerConfig> {
        self.servers.iter().filter(|s| s.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[planner]
backend = "ollama"
model = "qwen2.5"
temperature = 0.1

[orchestrator]
max_steps = 4
max_calls_per_tool = 2

[builtin]
local_insights = false

[logging]
conversation_log = "session.jsonl"

[[servers]]
name = "files"
command = "npx"
args = ["-y", "@modelcontextprotocol/server-filesystem", "."]

[[servers]]
name = "web"
command = "uvx"
args = ["mcp-server-fetch"]
enabled = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.planner.backend, PlannerBackend::Ollama);
        assert_eq!(config.planner.model.as_deref(), Some("qwen2.5"));
        assert_eq!(config.orchestrator.max_steps, 4);
        assert!(!config.builtin.local_insights);
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.enabled_servers().count(), 1);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.planner.backend, PlannerBackend::Groq);
        assert_eq!(config.orchestrator.max_steps, 8);
        assert!(config.builtin.local_insights);
        assert!(config.servers.is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_duplicate_and_empty_names() {
        let toml_str = r#"
[[servers]]
name = "files"
command = "npx"

[[servers]]
name = "files"
command = "npx"

[[servers]]
name = ""
command = ""

[[servers]]
name = "local_insights"
command = "python"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let fields: Vec<_> = config.validate().into_iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec![
                "servers[1].name",
                "servers[2].name",
                "servers[2].command",
                "servers[3].name"
            ]
        );
    }

    #[test]
    fn test_validate_no_providers() {
        let mut config = FileConfig::default();
        config.builtin.local_insights = false;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_validate_loop_bounds() {
        let mut config = FileConfig::default();
        config.orchestrator.max_steps = 0;
        config.orchestrator.max_calls_per_tool = 0;
        let severities: Vec<_> = config.validate().into_iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Warning]);
    }
}

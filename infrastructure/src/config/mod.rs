//! Configuration file loading for mcp-conductor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `CONDUCTOR_*` (nested keys joined with `__`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./mcp-conductor.toml` or `./.mcp-conductor.toml`
//! 4. Global: `$XDG_CONFIG_HOME/mcp-conductor/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileBuiltinConfig, FileConfig, FileLoggingConfig, FileMcpServerConfig,
    FileOrchestratorConfig, FilePlannerConfig, PlannerBackend, Severity,
};
pub use loader::ConfigLoader;

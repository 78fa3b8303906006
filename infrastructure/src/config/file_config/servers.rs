//! MCP server entries from TOML (`[[servers]]` array)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// One MCP server, spawned as a child process speaking JSON-RPC over stdio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMcpServerConfig {
    /// Provider id; namespaces the server's tools (`<name>__<tool>`).
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment variables for the child process.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Working directory for the child process.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds allowed for the initialize handshake.
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_startup_timeout() -> u64 {
    30
}

impl FileMcpServerConfig {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
            enabled: true,
            startup_timeout_secs: default_startup_timeout(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal() {
        let server: FileMcpServerConfig = toml::from_str(
            r#"
name = "web"
command = "uvx"
"#,
        )
        .unwrap();
        assert!(server.enabled);
        assert!(server.args.is_empty());
        assert_eq!(server.startup_timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_env_and_cwd() {
        let server: FileMcpServerConfig = toml::from_str(
            r#"
name = "github"
command = "npx"
args = ["-y", "@modelcontextprotocol/server-github"]
cwd = "/tmp"

[env]
GITHUB_TOKEN = "ghp_test"
"#,
        )
        .unwrap();
        assert_eq!(server.env.get("GITHUB_TOKEN").map(String::as_str), Some("ghp_test"));
        assert_eq!(server.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(server.args.len(), 2);
    }
}

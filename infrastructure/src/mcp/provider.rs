//! MCP server process behind the [`ToolProvider`] port.
//!
//! The process is spawned lazily on the first `list_operations` call and kept
//! for the session. Calls are serialized over the single stdio connection.

use super::client::McpClient;
use super::error::McpError;
use super::transport::StdioTransport;
use crate::config::FileMcpServerConfig;
use async_trait::async_trait;
use conductor_domain::{ContentSegment, OperationInfo, ProviderError, ToolProvider, flatten_segments};
use futures::StreamExt;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info, warn};

/// Time allowed for a server to exit after its input is closed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

struct Connection {
    child: Child,
    client: McpClient<ChildStdout, ChildStdin>,
}

/// A configured MCP server, connected on demand.
pub struct McpServerProvider {
    config: FileMcpServerConfig,
    connection: Mutex<Option<Connection>>,
}

impl McpServerProvider {
    pub fn new(config: FileMcpServerConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &FileMcpServerConfig {
        &self.config
    }

    fn resolve_command(&self) -> Result<PathBuf, McpError> {
        let cwd = match &self.config.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| McpError::SpawnFailed {
                server: self.config.name.clone(),
                reason: format!("cannot determine working directory: {e}"),
            })?,
        };
        which::which_in(&self.config.command, std::env::var_os("PATH"), cwd).map_err(|_| {
            McpError::CommandNotFound {
                command: self.config.command.clone(),
            }
        })
    }

    fn spawn(&self) -> Result<(Child, ChildStdout, ChildStdin), McpError> {
        let program = self.resolve_command()?;
        let name = &self.config.name;
        debug!(server = %name, command = %program.display(), args = ?self.config.args, "Spawning MCP server");

        let mut cmd = Command::new(&program);
        cmd.args(&self.config.args)
            .envs(&self.config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.cwd {
            cmd.current_dir(dir);
        }

        // Linux: request kernel to send SIGTERM to child when parent dies.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd.spawn().map_err(|e| McpError::SpawnFailed {
            server: name.clone(),
            reason: e.to_string(),
        })?;

        let missing = |what: &str| McpError::SpawnFailed {
            server: name.clone(),
            reason: format!("failed to capture {what}"),
        };
        let stdout = child.stdout.take().ok_or_else(|| missing("stdout"))?;
        let stdin = child.stdin.take().ok_or_else(|| missing("stdin"))?;

        if let Some(stderr) = child.stderr.take() {
            let server = name.clone();
            tokio::spawn(async move {
                let mut lines = FramedRead::new(stderr, LinesCodec::new());
                while let Some(Ok(line)) = lines.next().await {
                    debug!(server = %server, "stderr: {}", line);
                }
            });
        }

        Ok((child, stdout, stdin))
    }

    async fn connect(&self) -> Result<Connection, McpError> {
        let (mut child, stdout, stdin) = self.spawn()?;
        let transport = StdioTransport::new(self.config.name.clone(), stdout, stdin);
        let startup = Duration::from_secs(self.config.startup_timeout_secs);

        let outcome = match tokio::time::timeout(startup, McpClient::initialize(transport)).await {
            Ok(result) => result,
            Err(_) => Err(McpError::Timeout(startup)),
        };

        match outcome {
            Ok(client) => {
                info!(server = %self.config.name, "MCP server connected");
                Ok(Connection { child, client })
            }
            Err(e) => {
                let _ = child.kill().await;
                Err(McpError::InitFailed {
                    server: self.config.name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl ToolProvider for McpServerProvider {
    fn id(&self) -> &str {
        &self.config.name
    }

    async fn list_operations(&self) -> Result<Vec<OperationInfo>, ProviderError> {
        let mut guard = self.connection.lock().await;
        if guard.is_none() {
            let connection = self
                .connect()
                .await
                .map_err(|e| ProviderError::NotAvailable(e.to_string()))?;
            *guard = Some(connection);
        }
        let Some(connection) = guard.as_mut() else {
            return Err(ProviderError::NotAvailable("not connected".into()));
        };

        let tools = connection
            .client
            .list_tools()
            .await
            .map_err(|e| ProviderError::DiscoveryFailed(e.to_string()))?;

        Ok(tools
            .into_iter()
            .map(|tool| OperationInfo {
                name: tool.name,
                description: tool.description,
                input_schema: tool.input_schema,
            })
            .collect())
    }

    async fn call(
        &self,
        local_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Vec<ContentSegment>, ProviderError> {
        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or_else(|| {
            ProviderError::NotAvailable(format!("server '{}' is not connected", self.config.name))
        })?;

        let result = connection
            .client
            .call_tool(local_name, arguments)
            .await
            .map_err(|e| ProviderError::ExecutionFailed(e.to_string()))?;

        let segments = result.segments();
        if result.is_error {
            let detail = flatten_segments(&segments);
            return Err(ProviderError::ExecutionFailed(if detail.is_empty() {
                "tool reported an error".to_string()
            } else {
                detail
            }));
        }
        Ok(segments)
    }

    async fn shutdown(&self) -> Result<(), ProviderError> {
        let Some(mut connection) = self.connection.lock().await.take() else {
            return Ok(());
        };

        if let Err(e) = connection.client.close().await {
            debug!(server = %self.config.name, "Closing input failed: {}", e);
        }
        match tokio::time::timeout(SHUTDOWN_GRACE, connection.child.wait()).await {
            Ok(Ok(status)) => debug!(server = %self.config.name, %status, "MCP server exited"),
            _ => {
                warn!(server = %self.config.name, "MCP server did not exit, killing");
                let _ = connection.child.kill().await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_command_is_unreachable() {
        let provider = McpServerProvider::new(FileMcpServerConfig::new(
            "ghost",
            "definitely-not-a-real-mcp-server-binary",
        ));
        let err = provider.list_operations().await.unwrap_err();
        match err {
            ProviderError::NotAvailable(reason) => assert!(reason.contains("not found")),
            other => panic!("expected NotAvailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_before_connect() {
        let provider = McpServerProvider::new(FileMcpServerConfig::new("files", "npx"));
        let err = provider.call("read", &Map::new()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotAvailable(_)));
    }

    #[tokio::test]
    async fn test_shutdown_without_connection() {
        let provider = McpServerProvider::new(FileMcpServerConfig::new("files", "npx"));
        assert!(provider.shutdown().await.is_ok());
        assert!(provider.shutdown().await.is_ok());
    }

    /// `cat` echoes the handshake back, which reads as an unanswerable
    /// server request followed by a method-not-found error.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_mcp_process_fails_handshake() {
        let mut config = FileMcpServerConfig::new("echo", "cat");
        config.startup_timeout_secs = 5;
        let provider = McpServerProvider::new(config);

        let err = provider.list_operations().await.unwrap_err();
        match err {
            ProviderError::NotAvailable(reason) => {
                assert!(reason.contains("Method not found"), "{reason}")
            }
            other => panic!("expected NotAvailable, got {other:?}"),
        }
        assert!(provider.shutdown().await.is_ok());
    }
}

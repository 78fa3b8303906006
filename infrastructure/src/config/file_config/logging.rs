//! Log destinations from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of planner decisions and tool calls.
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily rotated diagnostic logs.
    pub log_dir: Option<PathBuf>,
}

//! In-process providers from TOML (`[builtin]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBuiltinConfig {
    /// Register the `local_insights` text tools.
    pub local_insights: bool,
}

impl Default for FileBuiltinConfig {
    fn default() -> Self {
        Self {
            local_insights: true,
        }
    }
}

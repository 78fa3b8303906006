//! Planner configuration from TOML (`[planner]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible reasoning service backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlannerBackend {
    /// GroqCloud
    #[default]
    Groq,
    /// Local Ollama server
    Ollama,
    /// OpenAI
    #[serde(rename = "openai")]
    OpenAi,
}

impl PlannerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlannerBackend::Groq => "groq",
            PlannerBackend::Ollama => "ollama",
            PlannerBackend::OpenAi => "openai",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            PlannerBackend::Groq => "https://api.groq.com/openai/v1",
            PlannerBackend::Ollama => "http://localhost:11434/v1",
            PlannerBackend::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            PlannerBackend::Groq => "llama-3.3-70b-versatile",
            PlannerBackend::Ollama => "llama3.1",
            PlannerBackend::OpenAi => "gpt-4o-mini",
        }
    }

    /// Environment variable holding the API key. Ollama needs none.
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            PlannerBackend::Groq => Some("GROQ_API_KEY"),
            PlannerBackend::Ollama => None,
            PlannerBackend::OpenAi => Some("OPENAI_API_KEY"),
        }
    }
}

impl std::str::FromStr for PlannerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(PlannerBackend::Groq),
            "ollama" => Ok(PlannerBackend::Ollama),
            "openai" => Ok(PlannerBackend::OpenAi),
            other => Err(format!(
                "unknown planner backend '{other}' (expected groq, ollama or openai)"
            )),
        }
    }
}

/// Reasoning service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    pub backend: PlannerBackend,
    /// Model name (default depends on the backend).
    pub model: Option<String>,
    /// Base URL of the chat completions API (default depends on the backend).
    pub base_url: Option<String>,
    /// Environment variable name for the API key.
    pub api_key_env: Option<String>,
    /// Direct API key (prefer `api_key_env`).
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        Self {
            backend: PlannerBackend::default(),
            model: None,
            base_url: None,
            api_key_env: None,
            api_key: None,
            temperature: 0.2,
            max_tokens: 800,
            timeout_secs: 120,
        }
    }
}

impl FilePlannerConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url())
    }

    pub fn api_key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.backend.default_api_key_env())
    }

    /// Direct key if set, otherwise the value of the key variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            return Some(key.clone());
        }
        self.api_key_env()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
    }
}

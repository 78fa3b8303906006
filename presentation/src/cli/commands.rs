//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for session results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Final answer followed by the tool log
    Full,
    /// Only the final answer
    Answer,
    /// JSON output
    Json,
}

/// Reasoning service backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Groq,
    Ollama,
    Openai,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Groq => "groq",
            Backend::Ollama => "ollama",
            Backend::Openai => "openai",
        }
    }
}

/// CLI arguments for mcp-conductor
#[derive(Parser, Debug)]
#[command(name = "mcp-conductor")]
#[command(author, version, about = "Agentic tool orchestrator over multiple MCP servers")]
#[command(long_about = r#"
mcp-conductor answers a goal by letting a reasoning model call tools exposed
by several MCP servers, one bounded planning step at a time.

Each session:
1. Discovery: every configured server is started and its tools listed
2. Planning: the model picks tools (or answers), calls are validated and run
3. Teardown: every server is shut down, whatever the outcome

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./mcp-conductor.toml     Project-level config
3. ~/.config/mcp-conductor/config.toml   Global config
Environment variables prefixed with CONDUCTOR_ override all files.

Example:
  mcp-conductor "Summarise the open risks in notes/plan.md"
  mcp-conductor --backend ollama --model llama3.1 "List the files in src"
  mcp-conductor --list-tools
"#)]
pub struct Cli {
    /// The goal for the session (not required with --list-tools)
    pub goal: Option<String>,

    /// Maximum number of planning steps
    #[arg(long, value_name = "N")]
    pub max_steps: Option<usize>,

    /// Maximum calls allowed per tool in one session
    #[arg(long, value_name = "N")]
    pub max_calls_per_tool: Option<usize>,

    /// Model name passed to the reasoning service
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Reasoning service backend
    #[arg(short, long, value_enum)]
    pub backend: Option<Backend>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Discover tools, print the catalog and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Directory for daily rotated log files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Append conversation events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}

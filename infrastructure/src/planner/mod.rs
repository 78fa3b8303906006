//! Planner adapters
//!
//! [`OpenAiPlanner`] talks to any OpenAI-compatible chat completions
//! endpoint (Groq, Ollama, OpenAI) and implements the [`Planner`] port.
//!
//! [`Planner`]: conductor_application::Planner

pub mod openai;
pub mod types;

pub use openai::OpenAiPlanner;

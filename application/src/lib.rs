//! Application layer for mcp-conductor
//!
//! This crate contains the orchestration use cases, port definitions, and
//! loop parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestrationParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    planner::{Planner, PlannerError},
    progress::{NoProgress, OrchestrationProgress},
    tool_invoker::{InvokeError, ToolInvokerPort, ToolSessionPort},
};
pub use use_cases::run_orchestration::RunOrchestrationUseCase;
pub use use_cases::run_session::{RunSessionError, RunSessionOutput, RunSessionUseCase};

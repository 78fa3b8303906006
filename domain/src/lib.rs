//! Domain layer for mcp-conductor
//!
//! This crate contains the core entities and value objects of a tool
//! orchestration session. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Provider**: an external process or service exposing callable operations
//! - **Tool**: one operation, exposed under a qualified name `provider__operation`
//! - **Session**: one bounded planning loop for a single user goal, producing
//!   an [`OrchestrationResult`] with the final answer and the full tool log

pub mod orchestration;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use orchestration::{
    log::{OrchestrationResult, ResultLog, ToolLogEntry, ToolOutcome},
    state::{LoopState, SessionOutcome},
};
pub use prompt::{EXHAUSTED_MESSAGE, OrchestratorPromptTemplate};
pub use session::{
    decision::PlannerDecision,
    entities::{ConversationState, Role, Turn},
};
pub use tool::{
    call::{ToolCallAttempt, ToolRequest},
    discovery::{DiscoveryError, DiscoveryReport, ProviderStatus},
    entities::{ArgumentSchema, ToolCatalog, ToolDescriptor, qualify},
    provider::{OperationInfo, ProviderError, ToolProvider},
    validation::{ArgumentValidator, RequiredFieldsValidator, parse_arguments},
    value_objects::{ContentSegment, FailureKind, ToolCallError, flatten_segments},
};

//! Planner port
//!
//! Defines the interface to the external reasoning service that chooses the
//! next action of a session.

use async_trait::async_trait;
use conductor_domain::{ConversationState, PlannerDecision, ToolCatalog};
use thiserror::Error;

/// Errors that can occur while asking the reasoning service for a decision
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Reasoning service that proposes a final answer or tool invocations.
///
/// Receives the whole conversation and the whole catalog on every call.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(
        &self,
        conversation: &ConversationState,
        catalog: &ToolCatalog,
    ) -> Result<PlannerDecision, PlannerError>;
}

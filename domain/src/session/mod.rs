//! Session domain: conversation turns and planner decisions

pub mod decision;
pub mod entities;

pub use decision::PlannerDecision;
pub use entities::{ConversationState, Role, Turn};

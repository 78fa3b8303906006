//! Application-level configuration.
//!
//! - [`OrchestrationParams`]: loop control (step budget, per-tool quota, previews)

pub mod orchestration_params;

pub use orchestration_params::OrchestrationParams;

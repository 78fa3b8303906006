//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_orchestration;
pub mod run_session;

#[cfg(test)]
pub(crate) mod test_support;

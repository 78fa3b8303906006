//! Run Session use case
//!
//! Wraps one orchestration run in its connection lifecycle: discover the
//! providers, run the loop, and tear every connection down afterwards, on
//! every exit path including a panic inside the loop.

use crate::ports::planner::Planner;
use crate::ports::progress::{NoProgress, OrchestrationProgress};
use crate::ports::tool_invoker::ToolSessionPort;
use crate::use_cases::run_orchestration::RunOrchestrationUseCase;
use conductor_domain::{DiscoveryError, DiscoveryReport, OrchestrationResult};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that end a session before the loop starts
#[derive(Error, Debug)]
pub enum RunSessionError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Outcome of a completed session
#[derive(Debug, Clone)]
pub struct RunSessionOutput {
    pub discovery: DiscoveryReport,
    pub result: OrchestrationResult,
}

/// Use case running one full session: discovery, loop, teardown
pub struct RunSessionUseCase<P: Planner + ?Sized> {
    orchestration: RunOrchestrationUseCase<P>,
}

impl<P: Planner + ?Sized> RunSessionUseCase<P> {
    pub fn new(orchestration: RunOrchestrationUseCase<P>) -> Self {
        Self { orchestration }
    }

    pub async fn execute<T: ToolSessionPort>(
        &self,
        tools: &mut T,
        goal: &str,
    ) -> Result<RunSessionOutput, RunSessionError> {
        self.execute_with_progress(tools, goal, &NoProgress).await
    }

    pub async fn execute_with_progress<T: ToolSessionPort>(
        &self,
        tools: &mut T,
        goal: &str,
        progress: &dyn OrchestrationProgress,
    ) -> Result<RunSessionOutput, RunSessionError> {
        let discovery = match tools.discover().await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "Discovery failed, aborting session");
                tools.shutdown().await;
                return Err(e.into());
            }
        };

        for (provider, reason) in discovery.failures() {
            warn!(provider, reason, "Continuing without provider");
        }
        info!(
            providers = discovery.reachable_count(),
            tools = tools.catalog().len(),
            "Tool discovery complete"
        );

        let run = AssertUnwindSafe(self.orchestration.execute_with_progress(
            &*tools, goal, progress,
        ))
        .catch_unwind()
        .await;

        tools.shutdown().await;

        match run {
            Ok(result) => Ok(RunSessionOutput { discovery, result }),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FakeTools, ScriptedPlanner, request};
    use conductor_domain::{PlannerDecision, SessionOutcome};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn session(planner: ScriptedPlanner) -> RunSessionUseCase<ScriptedPlanner> {
        RunSessionUseCase::new(RunOrchestrationUseCase::new(Arc::new(planner)))
    }

    #[tokio::test]
    async fn test_session_tears_down_after_done() {
        let mut tools = FakeTools::new()
            .with_tool("files", "read", &[])
            .with_response("files__read", Ok("hello".into()));
        let use_case = session(ScriptedPlanner::new(vec![
            Ok(PlannerDecision::tool_requests(vec![request("c1", "files__read", "{}")])),
            Ok(PlannerDecision::final_answer("hello")),
        ]));

        let output = use_case.execute(&mut tools, "read").await.unwrap();

        assert_eq!(output.result.final_answer, "hello");
        assert_eq!(output.discovery.reachable_count(), 1);
        assert_eq!(tools.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_tears_down_after_exhaustion() {
        let mut tools = FakeTools::new().with_tool("web", "search", &[]);
        let use_case = session(ScriptedPlanner::repeating(PlannerDecision::tool_requests(
            vec![request("c", "web__search", "{}")],
        )));

        let output = use_case.execute(&mut tools, "loop").await.unwrap();

        assert_eq!(output.result.outcome, SessionOutcome::Exhausted);
        assert_eq!(output.result.steps_taken, 8);
        assert_eq!(tools.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_discovery_failure_aborts_and_tears_down() {
        let mut report = DiscoveryReport::new();
        report.unreachable("files", "spawn failed");
        let mut tools =
            FakeTools::new().failing_discovery(DiscoveryError::ProviderUnreachable { report });
        let planner = ScriptedPlanner::new(vec![Ok(PlannerDecision::final_answer("never"))]);
        let planner = Arc::new(planner);
        let use_case = RunSessionUseCase::new(RunOrchestrationUseCase::new(planner.clone()));

        let err = use_case.execute(&mut tools, "goal").await.unwrap_err();

        assert!(matches!(
            err,
            RunSessionError::Discovery(DiscoveryError::ProviderUnreachable { .. })
        ));
        assert!(planner.conversations().is_empty());
        assert_eq!(tools.shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_teardown_runs_when_loop_panics() {
        struct PanickingPlanner;

        #[async_trait::async_trait]
        impl Planner for PanickingPlanner {
            async fn plan(
                &self,
                _conversation: &conductor_domain::ConversationState,
                _catalog: &conductor_domain::ToolCatalog,
            ) -> Result<PlannerDecision, crate::ports::planner::PlannerError> {
                panic!("planner blew up");
            }
        }

        let mut tools = FakeTools::new();
        let shutdowns = tools.shutdowns.clone();
        let use_case =
            RunSessionUseCase::new(RunOrchestrationUseCase::new(Arc::new(PanickingPlanner)));

        let outcome = AssertUnwindSafe(use_case.execute(&mut tools, "goal"))
            .catch_unwind()
            .await;

        assert!(outcome.is_err());
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }
}

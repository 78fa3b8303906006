//! Run Orchestration use case
//!
//! The bounded planning loop of a session:
//!
//! ```text
//! for step in 1..=max_steps:
//!     Planner.plan(conversation, catalog)
//!       ├─ FinalAnswer  → DONE
//!       └─ ToolRequests → for each request, in order:
//!            resolve → parse → required fields → quota → invoke → log
//! EXHAUSTED
//! ```
//!
//! Every per-call failure is recorded in the result log and fed back to the
//! planner as a tool turn; none of them ends the session. A failing planner
//! call consumes its step and the loop plans again on the next one.

use crate::config::OrchestrationParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger, events,
};
use crate::ports::planner::{Planner, PlannerError};
use crate::ports::progress::{NoProgress, OrchestrationProgress};
use crate::ports::tool_invoker::{InvokeError, ToolInvokerPort};
use conductor_domain::util::{truncate_chars, truncate_str};
use conductor_domain::{
    ArgumentValidator, ConversationState, EXHAUSTED_MESSAGE, LoopState, OrchestrationResult,
    OrchestratorPromptTemplate, PlannerDecision, RequiredFieldsValidator, ResultLog,
    SessionOutcome, ToolCallAttempt, ToolCallError, ToolCatalog, ToolDescriptor, ToolLogEntry,
    Turn, parse_arguments,
};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bytes of provider error detail kept in the log and the corrective turn.
const MAX_ERROR_DETAIL_BYTES: usize = 2000;

/// Session-local mutable state. Nothing here outlives one `execute` call.
struct LoopContext {
    conversation: ConversationState,
    call_counts: HashMap<String, usize>,
    log: ResultLog,
}

/// A call that was rejected before dispatch.
struct Rejection {
    provider_id: Option<String>,
    arguments: Value,
    error: ToolCallError,
}

/// Use case driving the planner and the tools of one session
pub struct RunOrchestrationUseCase<P: Planner + ?Sized> {
    planner: Arc<P>,
    params: OrchestrationParams,
    validator: RequiredFieldsValidator,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<P: Planner + ?Sized> RunOrchestrationUseCase<P> {
    pub fn new(planner: Arc<P>) -> Self {
        Self {
            planner,
            params: OrchestrationParams::default(),
            validator: RequiredFieldsValidator,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_params(mut self, params: OrchestrationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &OrchestrationParams {
        &self.params
    }

    /// Run a session against already discovered tools.
    pub async fn execute<T: ToolInvokerPort + ?Sized>(
        &self,
        tools: &T,
        goal: &str,
    ) -> OrchestrationResult {
        self.execute_with_progress(tools, goal, &NoProgress).await
    }

    /// Run a session, reporting each transition to `progress`.
    ///
    /// Never fails: the result always carries a best-effort final answer and
    /// the complete tool log.
    pub async fn execute_with_progress<T: ToolInvokerPort + ?Sized>(
        &self,
        tools: &T,
        goal: &str,
        progress: &dyn OrchestrationProgress,
    ) -> OrchestrationResult {
        let catalog = tools.catalog();
        let system = self
            .params
            .system_prompt
            .clone()
            .unwrap_or_else(|| OrchestratorPromptTemplate::system(catalog));

        let mut ctx = LoopContext {
            conversation: ConversationState::new(system, goal),
            call_counts: HashMap::new(),
            log: ResultLog::new(),
        };

        info!(
            tools = catalog.len(),
            max_steps = self.params.max_steps,
            "Starting orchestration"
        );
        self.conversation_logger.log(ConversationEvent::new(
            events::SESSION_START,
            json!({
                "goal": goal,
                "tools": catalog.names().collect::<Vec<_>>(),
                "max_steps": self.params.max_steps,
                "max_calls_per_tool": self.params.max_calls_per_tool,
            }),
        ));

        for step in 1..=self.params.max_steps {
            progress.on_step_start(step, self.params.max_steps);
            self.transition(LoopState::Planning, step, progress);

            let decision = match self.plan(&ctx.conversation, catalog).await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(step, error = %e, "Planner call failed, consuming step");
                    progress.on_planner_error(step, &e.to_string());
                    self.conversation_logger.log(ConversationEvent::new(
                        events::PLANNER_ERROR,
                        json!({ "step": step, "error": e.to_string() }),
                    ));
                    continue;
                }
            };

            self.conversation_logger.log(ConversationEvent::new(
                events::PLANNER_DECISION,
                json!({ "step": step, "decision": decision }),
            ));

            match decision {
                PlannerDecision::FinalAnswer { text } => {
                    return self.finish(ctx, text, SessionOutcome::Done, step, progress);
                }
                PlannerDecision::ToolRequests { content, requests } => {
                    debug!(step, requests = requests.len(), "Planner requested tools");
                    ctx.conversation
                        .push(Turn::assistant_with_requests(content, requests.clone()));

                    // Strictly sequential: later requests may rely on earlier results.
                    for request in requests {
                        let attempt = ToolCallAttempt::new(request, step);
                        self.run_attempt(tools, &mut ctx, &attempt, progress).await;
                    }
                }
            }
        }

        let steps = self.params.max_steps;
        self.finish(
            ctx,
            EXHAUSTED_MESSAGE.to_string(),
            SessionOutcome::Exhausted,
            steps,
            progress,
        )
    }

    async fn plan(
        &self,
        conversation: &ConversationState,
        catalog: &ToolCatalog,
    ) -> Result<PlannerDecision, PlannerError> {
        let call = self.planner.plan(conversation, catalog);
        match self.params.planner_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| PlannerError::Timeout)?,
            None => call.await,
        }
    }

    async fn run_attempt<T: ToolInvokerPort + ?Sized>(
        &self,
        tools: &T,
        ctx: &mut LoopContext,
        attempt: &ToolCallAttempt,
        progress: &dyn OrchestrationProgress,
    ) {
        let step = attempt.step_index();
        self.transition(LoopState::Validating, step, progress);

        let (descriptor, arguments) = match self.validate(tools, &ctx.call_counts, attempt) {
            Ok(checked) => checked,
            Err(rejection) => {
                self.transition(LoopState::Logging, step, progress);
                self.reject(ctx, attempt, rejection, progress);
                return;
            }
        };

        let name = descriptor.qualified_name().to_string();
        let provider_id = Some(descriptor.provider_id().to_string());
        *ctx.call_counts.entry(name.clone()).or_default() += 1;

        self.transition(LoopState::Dispatching, step, progress);
        progress.on_tool_dispatch(attempt);
        debug!(step, tool = %name, "Dispatching tool call");

        let outcome = tools.invoke(&name, &arguments).await;
        self.transition(LoopState::Logging, step, progress);

        let arguments = Value::Object(arguments);
        match outcome {
            Ok(output) => {
                let preview = truncate_chars(&output, self.params.preview_chars).to_string();
                ctx.conversation
                    .push(Turn::tool(attempt.call_id(), &name, preview.clone()));
                self.record(
                    ctx,
                    ToolLogEntry::success(step, &name, provider_id, arguments, preview),
                    progress,
                );
            }
            Err(InvokeError::UnknownTool(tool)) => {
                let rejection = Rejection {
                    provider_id: None,
                    arguments,
                    error: ToolCallError::UnknownTool { tool },
                };
                self.reject(ctx, attempt, rejection, progress);
            }
            Err(InvokeError::Execution(detail)) => {
                let rejection = Rejection {
                    provider_id,
                    arguments,
                    error: ToolCallError::Execution {
                        tool: name,
                        detail: truncate_str(&detail, MAX_ERROR_DETAIL_BYTES).to_string(),
                    },
                };
                self.reject(ctx, attempt, rejection, progress);
            }
        }
    }

    /// Resolve, parse, check required fields and quota, in that order.
    fn validate<'t, T: ToolInvokerPort + ?Sized>(
        &self,
        tools: &'t T,
        call_counts: &HashMap<String, usize>,
        attempt: &ToolCallAttempt,
    ) -> Result<(&'t ToolDescriptor, Map<String, Value>), Rejection> {
        let name = attempt.tool_name();

        let Some(descriptor) = tools.descriptor(name) else {
            let arguments = parse_arguments(name, attempt.raw_arguments())
                .map(Value::Object)
                .unwrap_or_else(|_| Value::String(attempt.raw_arguments().to_string()));
            return Err(Rejection {
                provider_id: None,
                arguments,
                error: ToolCallError::UnknownTool {
                    tool: name.to_string(),
                },
            });
        };

        let arguments = parse_arguments(name, attempt.raw_arguments()).map_err(|error| {
            Rejection {
                provider_id: Some(descriptor.provider_id().to_string()),
                arguments: Value::String(attempt.raw_arguments().to_string()),
                error,
            }
        })?;

        let reject = |arguments: Map<String, Value>, error| Rejection {
            provider_id: Some(descriptor.provider_id().to_string()),
            arguments: Value::Object(arguments),
            error,
        };

        if let Err(error) = self.validator.validate(descriptor, &arguments) {
            return Err(reject(arguments, error));
        }

        let used = call_counts.get(name).copied().unwrap_or(0);
        if used >= self.params.max_calls_per_tool {
            let error = ToolCallError::RateLimitExceeded {
                tool: name.to_string(),
                limit: self.params.max_calls_per_tool,
            };
            return Err(reject(arguments, error));
        }

        Ok((descriptor, arguments))
    }

    /// Log a failed attempt and tell the planner what went wrong.
    fn reject(
        &self,
        ctx: &mut LoopContext,
        attempt: &ToolCallAttempt,
        rejection: Rejection,
        progress: &dyn OrchestrationProgress,
    ) {
        warn!(
            step = attempt.step_index(),
            tool = attempt.tool_name(),
            kind = %rejection.error.kind(),
            "Tool call failed: {}",
            rejection.error
        );
        ctx.conversation.push(Turn::tool(
            attempt.call_id(),
            attempt.tool_name(),
            OrchestratorPromptTemplate::corrective(&rejection.error),
        ));
        self.record(
            ctx,
            ToolLogEntry::failure(
                attempt.step_index(),
                rejection.provider_id,
                rejection.arguments,
                &rejection.error,
            ),
            progress,
        );
    }

    fn record(
        &self,
        ctx: &mut LoopContext,
        entry: ToolLogEntry,
        progress: &dyn OrchestrationProgress,
    ) {
        self.conversation_logger
            .log(ConversationEvent::new(events::TOOL_CALL, json!(entry)));
        progress.on_tool_logged(&entry);
        ctx.log.record(entry);
    }

    fn finish(
        &self,
        ctx: LoopContext,
        final_answer: String,
        outcome: SessionOutcome,
        steps_taken: usize,
        progress: &dyn OrchestrationProgress,
    ) -> OrchestrationResult {
        self.transition(outcome.into(), steps_taken, progress);

        let result = OrchestrationResult::new(final_answer, ctx.log, outcome, steps_taken);
        info!(
            outcome = outcome.as_str(),
            steps = steps_taken,
            calls = result.tool_log.len(),
            failed = result.failed_calls(),
            "Orchestration finished"
        );
        self.conversation_logger.log(ConversationEvent::new(
            events::SESSION_END,
            json!({
                "outcome": outcome,
                "steps_taken": steps_taken,
                "final_answer": result.final_answer,
                "tool_calls": result.tool_log.len(),
            }),
        ));
        progress.on_finished(&result);
        result
    }

    fn transition(&self, state: LoopState, step: usize, progress: &dyn OrchestrationProgress) {
        debug!(step, state = %state, "Loop state");
        progress.on_state_change(state);
    }
}

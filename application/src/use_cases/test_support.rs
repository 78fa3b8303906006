//! Scripted planner and in-memory tools shared by the use case tests.

use crate::ports::planner::{Planner, PlannerError};
use crate::ports::tool_invoker::{InvokeError, ToolInvokerPort, ToolSessionPort};
use async_trait::async_trait;
use conductor_domain::{
    ArgumentSchema, ConversationState, DiscoveryError, DiscoveryReport, PlannerDecision,
    ToolCatalog, ToolDescriptor, ToolRequest,
};
use serde_json::{Map, Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn request(call_id: &str, tool: &str, raw: &str) -> ToolRequest {
    ToolRequest::new(call_id, tool, raw)
}

/// Planner that replays queued decisions, then repeats a fallback if set.
pub struct ScriptedPlanner {
    script: Mutex<VecDeque<Result<PlannerDecision, PlannerError>>>,
    fallback: Option<PlannerDecision>,
    delay: Option<Duration>,
    seen: Mutex<Vec<ConversationState>>,
}

impl ScriptedPlanner {
    pub fn new(script: Vec<Result<PlannerDecision, PlannerError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            delay: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn repeating(decision: PlannerDecision) -> Self {
        Self {
            fallback: Some(decision),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Conversation snapshots, one per `plan` call.
    pub fn conversations(&self) -> Vec<ConversationState> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn plan(
        &self,
        conversation: &ConversationState,
        _catalog: &ToolCatalog,
    ) -> Result<PlannerDecision, PlannerError> {
        self.seen.lock().unwrap().push(conversation.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(decision) => decision,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| PlannerError::InvalidResponse("script exhausted".into())),
        }
    }
}

/// In-memory tools with canned responses.
pub struct FakeTools {
    catalog: ToolCatalog,
    responses: HashMap<String, Result<String, InvokeError>>,
    calls: Mutex<Vec<(String, Map<String, Value>)>>,
    discovery: Option<DiscoveryError>,
    pub shutdowns: Arc<AtomicUsize>,
}

impl FakeTools {
    pub fn new() -> Self {
        Self {
            catalog: ToolCatalog::new(),
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            discovery: None,
            shutdowns: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_tool(mut self, provider: &str, name: &str, required: &[&str]) -> Self {
        let schema = ArgumentSchema::from_json(Some(&json!({ "required": required })));
        self.catalog
            .register(ToolDescriptor::new(provider, name, "", schema));
        self
    }

    pub fn with_response(mut self, tool: &str, response: Result<String, InvokeError>) -> Self {
        self.responses.insert(tool.to_string(), response);
        self
    }

    pub fn failing_discovery(mut self, error: DiscoveryError) -> Self {
        self.discovery = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<(String, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolInvokerPort for FakeTools {
    fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    async fn invoke(
        &self,
        qualified_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<String, InvokeError> {
        if !self.catalog.contains(qualified_name) {
            return Err(InvokeError::UnknownTool(qualified_name.to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push((qualified_name.to_string(), arguments.clone()));
        self.responses
            .get(qualified_name)
            .cloned()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

#[async_trait]
impl ToolSessionPort for FakeTools {
    async fn discover(&mut self) -> Result<DiscoveryReport, DiscoveryError> {
        if let Some(error) = self.discovery.clone() {
            return Err(error);
        }
        let mut report = DiscoveryReport::new();
        for (provider, count) in self.catalog.providers() {
            report.reachable(provider, count, Vec::new());
        }
        Ok(report)
    }

    async fn shutdown(&mut self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

//! OpenAI-compatible planner.
//!
//! Sends the whole conversation plus the tool catalog to
//! `POST {base_url}/chat/completions` and reads back either text (the final
//! answer) or `tool_calls` (requests for the loop to run).

use std::time::Duration;

use async_trait::async_trait;
use conductor_application::ports::planner::{Planner, PlannerError};
use conductor_domain::util::truncate_str;
use conductor_domain::{ConversationState, PlannerDecision, Role as TurnRole, ToolCatalog, ToolRequest, Turn};
use reqwest::Client as HttpClient;
use tracing::{debug, trace};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, FunctionCallMessage,
    FunctionDefinition, Role, ToolCallMessage, ToolDefinition,
};
use crate::config::FilePlannerConfig;

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest error body quoted in a [`PlannerError::RequestFailed`].
const MAX_ERROR_BODY: usize = 500;

/// Planner backed by a chat completions endpoint.
pub struct OpenAiPlanner {
    http: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiPlanner {
    /// Build from the `[planner]` section.
    ///
    /// Fails when the backend needs an API key and none is configured.
    pub fn from_config(config: &FilePlannerConfig) -> Result<Self, PlannerError> {
        let api_key = config.resolve_api_key();
        if api_key.is_none()
            && let Some(var) = config.api_key_env()
        {
            return Err(PlannerError::Configuration(format!(
                "{var} is not set (required by the {} backend)",
                config.backend.as_str()
            )));
        }

        let mut builder = HttpClient::builder().connect_timeout(CONNECT_TIMEOUT);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let http = builder
            .build()
            .map_err(|e| PlannerError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model().to_string(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request body for one planning step.
    pub fn build_request(
        &self,
        conversation: &ConversationState,
        catalog: &ToolCatalog,
    ) -> ChatCompletionRequest {
        let tools: Vec<ToolDefinition> = catalog
            .iter()
            .map(|tool| ToolDefinition {
                r#type: "function",
                function: FunctionDefinition {
                    name: tool.qualified_name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.argument_schema().to_json(),
                },
            })
            .collect();

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: conversation.turns().iter().map(to_message).collect(),
            tool_choice: (!tools.is_empty()).then_some("auto"),
            tools,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn to_message(turn: &Turn) -> ChatMessage {
    let role = match turn.role {
        TurnRole::System => Role::System,
        TurnRole::User => Role::User,
        TurnRole::Assistant => Role::Assistant,
        TurnRole::Tool => Role::Tool,
    };
    let mut message = ChatMessage::new(role, turn.content.clone());
    message.tool_call_id = turn.tool_call_id.clone();
    message.tool_calls = turn
        .tool_requests
        .iter()
        .map(|request| ToolCallMessage {
            id: request.call_id.clone(),
            r#type: "function",
            function: FunctionCallMessage {
                name: request.tool_name.clone(),
                arguments: request.raw_arguments.clone(),
            },
        })
        .collect();
    message
}

/// Interpret a completion: tool calls win over text; no tool calls means
/// the content (possibly empty) is the final answer.
pub fn parse_response(response: ChatCompletionResponse) -> Result<PlannerDecision, PlannerError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| PlannerError::InvalidResponse("response has no choices".into()))?;
    let content = choice.message.content.unwrap_or_default();

    if choice.message.tool_calls.is_empty() {
        return Ok(PlannerDecision::final_answer(content));
    }

    let requests = choice
        .message
        .tool_calls
        .into_iter()
        .enumerate()
        .map(|(i, call)| {
            ToolRequest::new(
                call.id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("call_{i}")),
                call.function.name,
                call.function.arguments,
            )
        })
        .collect();

    Ok(PlannerDecision::ToolRequests { content, requests })
}

#[async_trait]
impl Planner for OpenAiPlanner {
    async fn plan(
        &self,
        conversation: &ConversationState,
        catalog: &ToolCatalog,
    ) -> Result<PlannerDecision, PlannerError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request(conversation, catalog);
        debug!(
            model = %self.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "Requesting plan"
        );

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PlannerError::Timeout
            } else {
                PlannerError::ConnectionError(format!("{url}: {e}"))
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                PlannerError::Timeout
            } else {
                PlannerError::ConnectionError(format!("failed to read response body: {e}"))
            }
        })?;
        if !status.is_success() {
            return Err(PlannerError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate_str(text.trim(), MAX_ERROR_BODY)
            )));
        }
        trace!("Planner response: {}", text);

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| PlannerError::InvalidResponse(format!("{e}")))?;
        parse_response(parsed)
    }
}

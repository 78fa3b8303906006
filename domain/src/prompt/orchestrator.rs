//! Prompt texts for the orchestration loop

use crate::tool::{ToolCallError, ToolCatalog};

/// Final answer used when the step budget runs out.
pub const EXHAUSTED_MESSAGE: &str = "I could not fully complete the task within the allowed steps. \
Check the tool logs for intermediate results.";

/// Tool names listed per provider in the system instruction.
const MAX_LISTED_TOOLS: usize = 6;

/// Templates for the system instruction and corrective tool turns
pub struct OrchestratorPromptTemplate;

impl OrchestratorPromptTemplate {
    /// System instruction describing the discovered provider categories.
    pub fn system(catalog: &ToolCatalog) -> String {
        let categories = catalog
            .providers()
            .into_iter()
            .map(|(provider, count)| {
                let mut names: Vec<&str> = catalog
                    .iter()
                    .filter(|t| t.provider_id() == provider)
                    .map(|t| t.local_name())
                    .take(MAX_LISTED_TOOLS)
                    .collect();
                if count > MAX_LISTED_TOOLS {
                    names.push("...");
                }
                format!("- '{provider}' ({count} tools): {}", names.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are an autonomous agent that can use tools from multiple MCP servers. \
Use the tools only when helpful to make progress.\n\n\
Available server types:\n{categories}\n\n\
Tool names are prefixed with their server, e.g. 'server__tool'. \
Plan step by step. Choose tools based on their descriptions and the user's goal. \
If a tool fails, adapt your strategy. \
When you have enough information, provide a clear final answer."
        )
    }

    /// Tool-turn text telling the planner what went wrong with a call.
    pub fn corrective(error: &ToolCallError) -> String {
        match error {
            ToolCallError::UnknownTool { tool } => format!(
                "Unknown tool '{tool}'. Choose one of the tools listed in the catalog."
            ),
            ToolCallError::ArgumentParse { .. } => {
                format!("Arguments invalid. {error} Please replan with valid arguments.")
            }
            ToolCallError::SchemaValidation { .. } => {
                format!("{error}. Adjust your call or choose another tool.")
            }
            ToolCallError::RateLimitExceeded { .. } => {
                format!("{error} Please switch to another tool or strategy.")
            }
            ToolCallError::Execution { .. } => format!(
                "Tool call failed.\n{error}\nReplan with a different strategy; do not repeat the identical call."
            ),
        }
    }
}

//! Built-in `local_insights` provider
//!
//! Two heuristic text tools that run in-process, so a session always has
//! something to call even when no MCP server is configured:
//!
//! | Tool | Description |
//! |------|-------------|
//! | `clean_text` | Strip HTML tags, collapse whitespace, optionally lowercase |
//! | `generate_insights` | Key points, risks and next steps as JSON |

use std::sync::LazyLock;

use async_trait::async_trait;
use conductor_domain::{ContentSegment, OperationInfo, ProviderError, ToolProvider};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Provider id of the built-in tools.
pub const LOCAL_INSIGHTS_ID: &str = "local_insights";

const CLEAN_TEXT: &str = "clean_text";
const GENERATE_INSIGHTS: &str = "generate_insights";

const MAX_KEY_POINTS: usize = 10;
const MAX_RISKS: usize = 10;
/// A sentence needs more than this many words to count as a key point.
const KEY_POINT_MIN_WORDS: usize = 6;
const RISK_KEYWORDS: [&str; 4] = ["risk", "issue", "problem", "concern"];
const RECOMMENDED_STEPS: [&str; 3] = [
    "Review the main context and assumptions.",
    "Validate critical points with additional data.",
    "Define concrete next steps and responsibilities.",
];

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?;\n]").expect("static regex"));

/// Remove HTML tags and collapse runs of whitespace.
pub fn clean_text(text: &str, lowercase: bool) -> String {
    let without_tags = HTML_TAG.replace_all(text, " ");
    let collapsed = WHITESPACE.replace_all(&without_tags, " ");
    let trimmed = collapsed.trim();
    if lowercase {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Insights {
    pub key_points: Vec<String>,
    pub risks: Vec<String>,
    pub recommended_steps: Vec<String>,
    pub meta: InsightsMeta,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct InsightsMeta {
    pub num_sentences: usize,
    pub num_key_points: usize,
    pub num_risks: usize,
}

/// Split `text` into sentences and pick out key points and risks.
pub fn generate_insights(text: &str) -> Insights {
    let sentences: Vec<&str> = SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let key_points: Vec<String> = sentences
        .iter()
        .filter(|s| s.split_whitespace().count() > KEY_POINT_MIN_WORDS)
        .take(MAX_KEY_POINTS)
        .map(|s| s.to_string())
        .collect();

    let all_risks: Vec<&str> = sentences
        .iter()
        .copied()
        .filter(|s| {
            let lower = s.to_lowercase();
            RISK_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .collect();
    let num_risks = all_risks.len();
    let risks: Vec<String> = all_risks
        .into_iter()
        .take(MAX_RISKS)
        .map(str::to_string)
        .collect();

    Insights {
        meta: InsightsMeta {
            num_sentences: sentences.len(),
            num_key_points: key_points.len(),
            num_risks,
        },
        key_points,
        risks,
        recommended_steps: RECOMMENDED_STEPS.iter().map(|s| s.to_string()).collect(),
    }
}

/// In-process provider for the text tools.
#[derive(Debug, Default)]
pub struct LocalInsightsProvider;

impl LocalInsightsProvider {
    pub fn new() -> Self {
        Self
    }
}

fn text_argument<'a>(arguments: &'a Map<String, Value>) -> Result<&'a str, ProviderError> {
    let text = arguments
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::ExecutionFailed("'text' must be a string".into()))?;
    if text.trim().is_empty() {
        return Err(ProviderError::ExecutionFailed("'text' is empty".into()));
    }
    Ok(text)
}

#[async_trait]
impl ToolProvider for LocalInsightsProvider {
    fn id(&self) -> &str {
        LOCAL_INSIGHTS_ID
    }

    fn display_name(&self) -> &str {
        "Local insights"
    }

    async fn list_operations(&self) -> Result<Vec<OperationInfo>, ProviderError> {
        Ok(vec![
            OperationInfo::new(CLEAN_TEXT)
                .with_description(
                    "Clean and normalize raw text: removes HTML tags and excessive whitespace. \
                     Useful before running analysis.",
                )
                .with_schema(json!({
                    "type": "object",
                    "properties": {
                        "text": {"type": "string", "description": "Raw messy text"},
                        "lowercase": {"type": "boolean", "default": false}
                    },
                    "required": ["text"]
                })),
            OperationInfo::new(GENERATE_INSIGHTS)
                .with_description(
                    "Generate structured insights from a cleaned text: key points, risks \
                     and next steps, as a JSON summary.",
                )
                .with_schema(json!({
                    "type": "object",
                    "properties": {
                        "text": {"type": "string", "description": "Clean input text"}
                    },
                    "required": ["text"]
                })),
        ])
    }

    async fn call(
        &self,
        local_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Vec<ContentSegment>, ProviderError> {
        match local_name {
            CLEAN_TEXT => {
                let text = text_argument(arguments)?;
                let lowercase = arguments
                    .get("lowercase")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Ok(vec![ContentSegment::text(clean_text(text, lowercase))])
            }
            GENERATE_INSIGHTS => {
                let insights = generate_insights(text_argument(arguments)?);
                let rendered = serde_json::to_string_pretty(&insights)
                    .map_err(|e| ProviderError::ExecutionFailed(e.to_string()))?;
                Ok(vec![ContentSegment::text(rendered)])
            }
            other => Err(ProviderError::ToolNotFound(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::flatten_segments;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("<p>Hello,\n\n   <b>World</b></p>  ", false),
            "Hello, World"
        );
        assert_eq!(clean_text("  MIXED   Case ", true), "mixed case");
    }

    #[test]
    fn test_generate_insights() {
        let text = "The migration plan covers all three regional data centers. \
                    There is a risk of downtime during the cutover window! \
                    Budget is fine; the vendor raised a concern\nShort one?";
        let insights = generate_insights(text);

        assert_eq!(insights.meta.num_sentences, 5);
        assert_eq!(
            insights.key_points,
            vec![
                "The migration plan covers all three regional data centers",
                "There is a risk of downtime during the cutover window",
            ]
        );
        assert_eq!(
            insights.risks,
            vec![
                "There is a risk of downtime during the cutover window",
                "the vendor raised a concern",
            ]
        );
        assert_eq!(insights.recommended_steps.len(), 3);
        assert_eq!(insights.meta.num_risks, 2);
    }

    #[test]
    fn test_insights_caps_lists() {
        let text = "this sentence mentions an issue with seven words. ".repeat(15);
        let insights = generate_insights(&text);
        assert_eq!(insights.meta.num_sentences, 15);
        assert_eq!(insights.key_points.len(), MAX_KEY_POINTS);
        assert_eq!(insights.risks.len(), MAX_RISKS);
        assert_eq!(insights.meta.num_key_points, MAX_KEY_POINTS);
    }

    #[test]
    fn test_num_risks_counts_every_risk_sentence() {
        let text: String = (1..=12).map(|i| format!("risk number {i}. ")).collect();
        let insights = generate_insights(&text);
        assert_eq!(insights.risks.len(), MAX_RISKS);
        assert_eq!(insights.meta.num_risks, 12);
    }

    #[tokio::test]
    async fn test_provider_lists_two_tools_with_required_text() {
        let ops = LocalInsightsProvider::new().list_operations().await.unwrap();
        let names: Vec<_> = ops.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec![CLEAN_TEXT, GENERATE_INSIGHTS]);
        for op in &ops {
            assert_eq!(op.input_schema.as_ref().unwrap()["required"], json!(["text"]));
        }
    }

    #[tokio::test]
    async fn test_provider_calls() {
        let provider = LocalInsightsProvider::new();

        let out = provider
            .call(CLEAN_TEXT, &args(json!({"text": "<i>Hi</i>  THERE", "lowercase": true})))
            .await
            .unwrap();
        assert_eq!(flatten_segments(&out), "hi there");

        let out = provider
            .call(GENERATE_INSIGHTS, &args(json!({"text": "One problem here."})))
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&flatten_segments(&out)).unwrap();
        assert_eq!(parsed["risks"], json!(["One problem here"]));
        assert_eq!(parsed["meta"]["num_sentences"], 1);
    }

    #[tokio::test]
    async fn test_provider_rejects_empty_or_missing_text() {
        let provider = LocalInsightsProvider::new();

        let err = provider
            .call(CLEAN_TEXT, &args(json!({"text": "   "})))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ExecutionFailed(_)));

        let err = provider
            .call(GENERATE_INSIGHTS, &args(json!({"text": 3})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be a string"));

        let err = provider.call("summarize", &Map::new()).await.unwrap_err();
        assert!(matches!(err, ProviderError::ToolNotFound(_)));
    }
}

//! Web search tool backed by SerpApi
//!
//! The tool sends the query with a fixed locale (`gl`/`hl`) and reduces the
//! structured response to one text answer. Tiers are tried in order of
//! authority and the first non-empty one wins:
//!
//! 1. `answer_box_list` - direct answers, joined by newlines
//! 2. `answer_box.answer`
//! 3. `knowledge_graph.description`
//! 4. the first organic results as `[n] title\nsnippet`, blank-line separated
//!
//! Failures never escape the tool. They come back as descriptive text.

use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use crate::utils::toml_config::SearchConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name the search tool registers under
pub const SEARCH_TOOL_NAME: &str = "Search";

const SEARCH_TOOL_DESCRIPTION: &str = "A web search engine. Use it to answer questions about current events, facts, and anything you cannot find in your own knowledge.";

// ============= Search Collaborator =============

/// Parameters sent to the search provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub engine: String,
    /// Country code
    pub gl: String,
    /// Interface language
    pub hl: String,
    pub api_key: String,
}

/// Structured search response. Every tier is optional and unknown fields
/// are ignored. A tier with an unexpected shape reads as absent, so it
/// cannot hide the others.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_tier")]
    pub answer_box_list: Option<Vec<Value>>,

    #[serde(default, deserialize_with = "lenient_tier")]
    pub answer_box: Option<AnswerBox>,

    #[serde(default, deserialize_with = "lenient_tier")]
    pub knowledge_graph: Option<KnowledgeGraph>,

    /// Malformed entries are dropped individually
    #[serde(default, deserialize_with = "lenient_items")]
    pub organic_results: Option<Vec<OrganicResult>>,

    /// Provider-side message, e.g. for queries without results
    #[serde(default, deserialize_with = "lenient_text")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerBox {
    #[serde(default, deserialize_with = "lenient_text")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganicResult {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub snippet: Option<String>,
}

/// `None` instead of an error when the tier does not have the expected shape
fn lenient_tier<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// Keep the well-formed elements of an array; anything else is `None`
fn lenient_items<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Accept any JSON scalar where text is expected
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Search provider abstraction
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// SerpApi JSON endpoint
pub struct SerpApiBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl SerpApiBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SearchBackend for SerpApiBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let params = [
            ("engine", request.engine.as_str()),
            ("q", request.query.as_str()),
            ("api_key", request.api_key.as_str()),
            ("gl", request.gl.as_str()),
            ("hl", request.hl.as_str()),
        ];

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("SerpApi request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(text);
            return Err(AppError::Search(format!(
                "SerpApi returned {}: {}",
                status, detail
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse SerpApi response: {}", e)))?;

        if let Some(message) = &body.error {
            debug!(message = %message, "SerpApi reported a message with a successful response");
        }

        Ok(body)
    }
}

// ============= Extraction Policy =============

/// Extracts one tier of the answer; `None` when the tier is absent
pub type Extractor = fn(&SearchResponse, usize) -> Option<String>;

/// Answer tiers in priority order
pub const EXTRACTION_ORDER: [(&str, Extractor); 4] = [
    ("answer_box_list", direct_answers),
    ("answer_box", answer_box_answer),
    ("knowledge_graph", knowledge_graph_description),
    ("organic_results", organic_summary),
];

/// Direct short-form answers joined by newlines
pub fn direct_answers(response: &SearchResponse, _organic_limit: usize) -> Option<String> {
    let answers = response.answer_box_list.as_ref()?;
    Some(
        answers
            .iter()
            .filter_map(value_text)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

pub fn answer_box_answer(response: &SearchResponse, _organic_limit: usize) -> Option<String> {
    response.answer_box.as_ref()?.answer.clone()
}

pub fn knowledge_graph_description(
    response: &SearchResponse,
    _organic_limit: usize,
) -> Option<String> {
    response.knowledge_graph.as_ref()?.description.clone()
}

/// Up to `organic_limit` organic results as `[n] title\nsnippet`
pub fn organic_summary(response: &SearchResponse, organic_limit: usize) -> Option<String> {
    let results = response.organic_results.as_ref()?;
    if results.is_empty() {
        return None;
    }

    Some(
        results
            .iter()
            .take(organic_limit)
            .enumerate()
            .map(|(i, result)| {
                format!(
                    "[{}] {}\n{}",
                    i + 1,
                    result.title.as_deref().unwrap_or(""),
                    result.snippet.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}

/// First non-empty tier of [`EXTRACTION_ORDER`]
pub fn extract_answer(response: &SearchResponse, organic_limit: usize) -> Option<String> {
    EXTRACTION_ORDER.iter().find_map(|(tier, extractor)| {
        extractor(response, organic_limit)
            .filter(|text| !text.is_empty())
            .inspect(|_| debug!(tier = %tier, "Selected search answer tier"))
    })
}

// ============= Search Tool =============

/// Web search capability registered as `Search`
pub struct SearchTool {
    backend: Arc<dyn SearchBackend>,
    config: SearchConfig,
    api_key: Option<String>,
}

impl SearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>, config: SearchConfig, api_key: Option<String>) -> Self {
        Self {
            backend,
            config,
            api_key,
        }
    }

    /// SerpApi-backed tool; the API key is read from `config.api_key_env`
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            Arc::new(SerpApiBackend::new(config.base_url.clone())),
            config.clone(),
            config.resolve_api_key(),
        )
    }

    /// Search and reduce the response to a single answer.
    ///
    /// Always returns non-empty text.
    pub async fn search(&self, query: &str) -> String {
        info!(query = %query, "Running web search");

        let api_key = match self.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            Some(key) => key.to_string(),
            None => {
                warn!(env = %self.config.api_key_env, "Search API key is not configured");
                return format!("Error: {} is not configured", self.config.api_key_env);
            }
        };

        let request = SearchRequest {
            query: query.to_string(),
            engine: self.config.engine.clone(),
            gl: self.config.gl.clone(),
            hl: self.config.hl.clone(),
            api_key,
        };

        match self.backend.search(&request).await {
            Ok(response) => extract_answer(&response, self.config.max_organic_results)
                .unwrap_or_else(|| format!("Sorry, no information found for {}", query)),
            Err(e) => {
                warn!(error = %e, "Web search failed");
                let detail = match e {
                    AppError::Search(detail) => detail,
                    other => other.to_string(),
                };
                format!("Search error: {}", detail)
            }
        }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        SEARCH_TOOL_DESCRIPTION
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        Ok(self.search(input).await)
    }
}

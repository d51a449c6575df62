use crate::llm::client::{build_http_client, ClientOptions, LLMClient};
use crate::types::{AppError, ChatMessage, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// Client for the Ollama `/api/chat` endpoint (non-streaming)
pub struct OllamaClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature: None,
        }
    }

    /// Apply sampling and timeout options
    pub fn with_options(mut self, options: &ClientOptions) -> Result<Self> {
        self.http_client = build_http_client(options)?;
        self.temperature = options.temperature;
        Ok(self)
    }

    /// Parse Ollama response JSON
    fn parse_response(json: &Value) -> Result<Option<String>> {
        let message = json
            .get("message")
            .ok_or_else(|| AppError::LLM("No message in Ollama response".to_string()))?;

        Ok(message
            .get("content")
            .and_then(|v| v.as_str())
            .map(String::from))
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>> {
        let mut request_body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });
        if let Some(temperature) = self.temperature {
            request_body["options"] = json!({ "temperature": temperature });
        }

        let url = format!("{}/api/chat", self.base_url);
        debug!(model = %self.model, url = %url, "Sending Ollama chat request");

        let response = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("Ollama error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "Ollama request failed ({}): {}",
                status, text
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Failed to parse response: {}", e)))?;

        Self::parse_response(&response_json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

use crate::llm::client::{build_http_client, ClientOptions, LLMClient};
use crate::types::{AppError, ChatMessage, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Client for OpenAI-compatible `/chat/completions` endpoints
pub struct OpenAIClient {
    http_client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
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

    fn request_body(&self, messages: &[ChatMessage]) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>> {
        let url = format!("{}/chat/completions", self.api_base);
        debug!(model = %self.model, url = %url, messages = messages.len(), "Sending chat completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLM(format!(
                "OpenAI request failed ({}): {}",
                status, text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLM(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_serializes_roles() {
        let client = OpenAIClient::new(
            "sk-test".to_string(),
            "https://api.openai.com/v1/".to_string(),
            "gpt-4o-mini".to_string(),
        );

        let body = client.request_body(&[ChatMessage::user("hello")]);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert!(body.get("temperature").is_none());
        assert_eq!(client.api_base, "https://api.openai.com/v1");
    }

    #[test]
    fn test_request_body_with_temperature() {
        let options = ClientOptions {
            temperature: Some(0.5),
            timeout: None,
        };
        let client = OpenAIClient::new(
            "sk-test".to_string(),
            "https://api.openai.com/v1".to_string(),
            "gpt-4o-mini".to_string(),
        )
        .with_options(&options)
        .unwrap();

        let body = client.request_body(&[]);
        assert_eq!(body["temperature"], 0.5);
    }
}

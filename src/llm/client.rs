//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the model-completion
//! collaborator used by the planner:
//! - **OpenAI**: any OpenAI-compatible chat completions endpoint
//! - **Ollama**: local inference through the Ollama chat API

use crate::types::{AppError, ChatMessage, Result};
use crate::utils::toml_config::{ConfigError, LlmConfig};
use async_trait::async_trait;
use std::time::Duration;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Complete a conversation.
    ///
    /// Returns `Ok(None)` when the provider answered without any text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>>;

    /// Generate a completion from a single user prompt
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = [ChatMessage::user(prompt)];
        Ok(self.complete(&messages).await?.unwrap_or_default())
    }

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Per-client request options shared by every provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientOptions {
    pub temperature: Option<f32>,
    /// Whole-request timeout; `None` keeps the HTTP client default
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature(),
            timeout: config.timeout_secs().map(Duration::from_secs),
        }
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including any OpenAI-compatible endpoint)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
    },

    /// Ollama local LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    /// };
    /// ```
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Build a provider from configuration, resolving the API key from the
    /// environment variable the configuration names.
    pub fn from_config(config: &LlmConfig) -> std::result::Result<Self, ConfigError> {
        match config {
            LlmConfig::OpenAI {
                api_key_env,
                api_base,
                model,
                ..
            } => {
                let api_key = std::env::var(api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| ConfigError::MissingEnvVar(api_key_env.clone()))?;

                Ok(Provider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                })
            }
            LlmConfig::Ollama {
                base_url, model, ..
            } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            }),
        }
    }

    /// Create a client instance for this provider with default options
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        self.create_client_with(&ClientOptions::default())
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn create_client_with(&self, options: &ClientOptions) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => Ok(Box::new(
                super::openai::OpenAIClient::new(api_key.clone(), api_base.clone(), model.clone())
                    .with_options(options)?,
            )),

            Provider::Ollama { base_url, model } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone())
                    .with_options(options)?,
            )),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier this provider will be asked for
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}

/// Build a `reqwest` client honouring the request timeout
pub(crate) fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AppError::LLM(format!("Failed to build HTTP client: {}", e)))
}

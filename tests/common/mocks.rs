//! Mock implementations for testing.
//!
//! This module provides a mock model client and a trivial tool that can be
//! used across different test files without duplication.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use yojana::types::{AppError, ChatMessage, Result};
use yojana::{LLMClient, Tool};

/// Mock LLM client with a canned reply.
///
/// Every conversation it receives is recorded so tests can inspect the
/// prompt that was sent.
///
/// ```ignore
/// let client = MockLLMClient::new("```python\n[\"a\"]\n```");
/// let empty = MockLLMClient::without_content();
/// let broken = MockLLMClient::failing();
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    response: Option<String>,
    should_fail: bool,
    calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            should_fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that answers without any text.
    pub fn without_content() -> Self {
        Self {
            response: None,
            ..Self::new("")
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    /// Handle on the recorded conversations, usable after the client is boxed.
    pub fn calls(&self) -> Arc<Mutex<Vec<Vec<ChatMessage>>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(messages.to_vec());

        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Tool that echoes its input with a fixed prefix.
pub struct EchoTool {
    name: String,
    prefix: String,
}

impl EchoTool {
    pub fn new(name: &str) -> Self {
        Self::with_prefix(name, "echo: ")
    }

    pub fn with_prefix(name: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
        }
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Repeats its input"
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        Ok(format!("{}{}", self.prefix, input))
    }
}

/// In-memory log sink for `tracing_subscriber::fmt().with_writer(..)`.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Run `f` with a WARN-level subscriber writing into this capture
    pub fn warnings_during<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

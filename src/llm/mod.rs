//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the model-completion
//! collaborator. The planner only depends on the [`LLMClient`] trait, so any
//! provider (or a test double) can stand behind it.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - Runtime provider selection, built from `yojana.toml`
//! - [`ClientOptions`] - Temperature and request timeout
//!
//! # Example
//!
//! ```ignore
//! use yojana::llm::Provider;
//!
//! let provider = Provider::from_config(&config.llm)?;
//! let client = provider.create_client()?;
//!
//! let response = client.generate("What is 2+2?").await?;
//! println!("{}", response);
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Ollama chat API client.
pub mod ollama;
/// OpenAI-compatible chat completions client.
pub mod openai;

pub use client::{ClientOptions, LLMClient, Provider};

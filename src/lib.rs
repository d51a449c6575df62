//! # Yojana - plan-then-act agent building blocks
//!
//! Yojana provides the small pieces an agent loop needs before it can start
//! working on a question:
//!
//! 1. **Planning** - ask a model to break a question into ordered subtasks
//!    and extract them safely from its reply
//! 2. **Tools** - register named capabilities and describe them to a model
//! 3. **Search** - a ready-made web search tool backed by SerpApi
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use yojana::{Planner, Provider, ToolRegistry, YojanaConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = YojanaConfig::discover(None)?;
//!
//!     let provider = Provider::from_config(&config.llm)?;
//!     let planner = Planner::new(provider.create_client()?);
//!
//!     let plan = planner.plan("今天天气如何？").await;
//!     for (i, step) in plan.iter().enumerate() {
//!         println!("{}. {}", i + 1, step);
//!     }
//!
//!     let tools = ToolRegistry::with_default_tools(&config)?;
//!     println!("{}", tools.list_available());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`planner`] - Plan prompt, fenced-block extraction and literal parsing
//! - [`tools`] - Tool trait, registry and the SerpApi search tool
//! - [`llm`] - Model clients (OpenAI-compatible, Ollama)
//! - [`types`] - Chat messages and error handling
//! - [`utils`] - TOML configuration
//! - [`cli`] - Command-line parsing and terminal output for the `yojana` binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line interface for the `yojana` binary.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Plan generation and extraction.
pub mod planner;
/// Tool registry and built-in tools.
pub mod tools;
/// Core types (chat messages, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use llm::{ClientOptions, LLMClient, Provider};
pub use planner::{Plan, PlanError, Planner};
pub use tools::{OverwritePolicy, SearchTool, Tool, ToolRegistry};
pub use types::{AppError, ChatMessage, Result};
pub use utils::toml_config::YojanaConfig;

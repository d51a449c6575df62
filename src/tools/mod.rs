//! Tools the reasoning loop can call
//!
//! # Module Structure
//!
//! - [`registry`](crate::tools::registry) - Name to capability mapping and the [`Tool`] trait
//! - [`search`](crate::tools::search) - SerpApi web search with a tiered answer policy
//!
//! # Tool Registry
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! registry.register_tool(Arc::new(SearchTool::from_config(&config.search)))?;
//!
//! println!("{}", registry.list_available());  // "- Search: A web search engine..."
//! let answer = registry.execute("Search", "英伟达最新的GPU型号是什么").await?;
//! ```

/// Tool registry and the `Tool` trait.
pub mod registry;
/// Web search tool using SerpApi.
pub mod search;

pub use registry::{OverwritePolicy, Tool, ToolEntry, ToolRegistry};
pub use search::{SearchTool, SEARCH_TOOL_NAME};

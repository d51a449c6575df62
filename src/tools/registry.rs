use crate::tools::search::SearchTool;
use crate::types::{AppError, Result};
use crate::utils::toml_config::YojanaConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A named capability: one text input, one text output
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the tool registers under by default
    fn name(&self) -> &str;

    /// Human-readable description shown to the reasoning loop
    fn description(&self) -> &str;

    /// Run the tool on a single text argument
    async fn invoke(&self, input: &str) -> Result<String>;
}

/// What `register` does when the name is already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Replace the previous entry and log a warning
    #[default]
    Warn,
    /// Refuse the registration with `AppError::Conflict`
    Reject,
}

/// Registered description plus the capability behind it
#[derive(Clone)]
pub struct ToolEntry {
    pub description: String,
    pub tool: Arc<dyn Tool>,
}

/// Name to tool mapping with insertion-ordered listing.
///
/// Registration takes `&mut self`; share the registry behind an `Arc` once
/// setup is done.
pub struct ToolRegistry {
    entries: Vec<(String, ToolEntry)>,
    index: HashMap<String, usize>,
    overwrite: OverwritePolicy,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::with_policy(OverwritePolicy::default())
    }

    pub fn with_policy(overwrite: OverwritePolicy) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            overwrite,
        }
    }

    /// Create a registry with the default tools (web search)
    pub fn with_default_tools(config: &YojanaConfig) -> Result<Self> {
        let mut registry = Self::with_policy(config.tools.overwrite);

        registry.register_tool(Arc::new(SearchTool::from_config(&config.search)))?;

        Ok(registry)
    }

    /// Register `tool` under `name`.
    ///
    /// An existing name is overwritten in place (keeping its listing
    /// position) with a warning, or refused under [`OverwritePolicy::Reject`].
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        tool: Arc<dyn Tool>,
    ) -> Result<()> {
        let name = name.into();
        let entry = ToolEntry {
            description: description.into(),
            tool,
        };

        match self.index.get(&name).copied() {
            Some(position) => match self.overwrite {
                OverwritePolicy::Warn => {
                    warn!(tool = %name, "Tool already registered, overwriting");
                    self.entries[position].1 = entry;
                }
                OverwritePolicy::Reject => {
                    return Err(AppError::Conflict(format!(
                        "Tool already registered: {}",
                        name
                    )));
                }
            },
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name.clone(), entry));
            }
        }

        info!(tool = %name, "Tool registered");
        Ok(())
    }

    /// Register a tool under its own name and description
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        let description = tool.description().to_string();
        self.register(name, description, tool)
    }

    /// Capability registered under `name`, if any
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.entry(name).map(|entry| Arc::clone(&entry.tool))
    }

    pub fn entry(&self, name: &str) -> Option<&ToolEntry> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    /// `- {name}: {description}` per tool, in registration order
    pub fn list_available(&self) -> String {
        self.entries
            .iter()
            .map(|(name, entry)| format!("- {}: {}", name, entry.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Look up and invoke a tool in one step
    pub async fn execute(&self, name: &str, input: &str) -> Result<String> {
        match self.lookup(name) {
            Some(tool) => tool.invoke(input).await,
            None => Err(AppError::NotFound(format!("Tool not found: {}", name))),
        }
    }

    /// Registered tool names in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn overwrite_policy(&self) -> OverwritePolicy {
        self.overwrite
    }
}

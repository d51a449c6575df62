//! TOML-based configuration for Yojana
//!
//! Declarative configuration for the model provider, the search tool, the
//! tool registry and logging via a TOML file (`yojana.toml`). Every section
//! is optional; a missing file at the default location means defaults.
//!
//! Secrets are never stored in the file. Sections name the environment
//! variable that holds them (`api_key_env`), and `.env` files are loaded
//! with `dotenvy` by the binary before the configuration is read.

use crate::tools::registry::OverwritePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "yojana.toml";

/// Root configuration structure loaded from yojana.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YojanaConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LlmConfig {
    OpenAI {
        /// Environment variable containing API key
        #[serde(default = "default_llm_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default = "default_openai_model")]
        model: String,
        temperature: Option<f32>,
        timeout_secs: Option<u64>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
        temperature: Option<f32>,
        timeout_secs: Option<u64>,
    },
}

fn default_llm_api_key_env() -> String {
    "LLM_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig::OpenAI {
            api_key_env: default_llm_api_key_env(),
            api_base: default_openai_base(),
            model: default_openai_model(),
            temperature: None,
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        match self {
            LlmConfig::OpenAI { model, .. } | LlmConfig::Ollama { model, .. } => model,
        }
    }

    pub fn temperature(&self) -> Option<f32> {
        match self {
            LlmConfig::OpenAI { temperature, .. } | LlmConfig::Ollama { temperature, .. } => {
                *temperature
            }
        }
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        match self {
            LlmConfig::OpenAI { timeout_secs, .. } | LlmConfig::Ollama { timeout_secs, .. } => {
                *timeout_secs
            }
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Environment variable containing the SerpApi key
    #[serde(default = "default_search_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_search_url")]
    pub base_url: String,

    #[serde(default = "default_engine")]
    pub engine: String,

    /// Country code
    #[serde(default = "default_gl")]
    pub gl: String,

    /// Interface language
    #[serde(default = "default_hl")]
    pub hl: String,

    /// Organic results summarised when no direct answer exists
    #[serde(default = "default_max_organic_results")]
    pub max_organic_results: usize,
}

fn default_search_api_key_env() -> String {
    "SERPAPI_API_KEY".to_string()
}

fn default_search_url() -> String {
    "https://serpapi.com/search".to_string()
}

fn default_engine() -> String {
    "google".to_string()
}

fn default_gl() -> String {
    "cn".to_string()
}

fn default_hl() -> String {
    "zh-cn".to_string()
}

fn default_max_organic_results() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_search_api_key_env(),
            base_url: default_search_url(),
            engine: default_engine(),
            gl: default_gl(),
            hl: default_hl(),
            max_organic_results: default_max_organic_results(),
        }
    }
}

impl SearchConfig {
    /// Read the API key from the configured environment variable.
    ///
    /// An empty value counts as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

// ============= Tools & Logging =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// What happens when a tool name is registered twice
    #[serde(default)]
    pub overwrite: OverwritePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl YojanaConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Resolve the configuration for the CLI.
    ///
    /// An explicit path must exist. Without one, `yojana.toml` in the working
    /// directory is used when present, and defaults otherwise.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    return Self::load(default_path);
                }

                debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                let mut config = Self::default();
                config.apply_overrides(|name| std::env::var(name).ok());
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Parse configuration from TOML text without touching the environment
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `LLM_MODEL_ID` and `LLM_BASE_URL` overrides.
    ///
    /// `lookup` abstracts the environment so callers can inject values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model_id) = non_empty("LLM_MODEL_ID") {
            match &mut self.llm {
                LlmConfig::OpenAI { model, .. } | LlmConfig::Ollama { model, .. } => {
                    *model = model_id
                }
            }
        }

        if let Some(url) = non_empty("LLM_BASE_URL") {
            match &mut self.llm {
                LlmConfig::OpenAI { api_base, .. } => *api_base = url,
                LlmConfig::Ollama { base_url, .. } => *base_url = url,
            }
        }
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model().trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".to_string(),
            ));
        }

        if self.search.engine.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "search.engine must not be empty".to_string(),
            ));
        }

        if self.search.max_organic_results == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_organic_results must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

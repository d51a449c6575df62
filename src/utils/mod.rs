//! Configuration utilities
//!
//! - [`toml_config`] - `yojana.toml` loading, defaults and validation

/// TOML configuration loading and validation.
pub mod toml_config;

pub use toml_config::{ConfigError, YojanaConfig};

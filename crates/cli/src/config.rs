//! Configuration loading from stmtflow.toml.

use serde::Deserialize;
use std::path::Path;
use trace::{DigestOptions, JsonDumpOptions, TextDumpOptions};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// How result rows are digested when comparing.
    #[serde(default)]
    pub digest: DigestConfig,

    /// Text dump settings.
    #[serde(default)]
    pub text: TextConfig,

    /// JSON dump settings.
    #[serde(default)]
    pub json: JsonConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct DigestConfig {
    /// Sort rows of every statement, not only unordered ones.
    #[serde(default)]
    pub sort: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextConfig {
    /// Print row-bearing results as tables.
    #[serde(default)]
    pub verbose: bool,

    /// Print start/end time and cost of each statement.
    #[serde(default)]
    pub latency: bool,
}

#[derive(Debug, Deserialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub prefix: String,

    #[serde(default = "default_indent")]
    pub indent: String,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            indent: default_indent(),
        }
    }
}

fn default_indent() -> String {
    "  ".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn digest_options(&self) -> DigestOptions {
        DigestOptions {
            sort: self.digest.sort,
        }
    }

    pub fn text_options(&self) -> TextDumpOptions {
        TextDumpOptions {
            verbose: self.text.verbose,
            with_latency: self.text.latency,
        }
    }

    pub fn json_options(&self) -> JsonDumpOptions {
        JsonDumpOptions {
            prefix: self.json.prefix.clone(),
            indent: self.json.indent.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

//! # Configuration
//!
//! Command-line options, each of which can also be supplied through the
//! environment:
//! - `UPSTAGE_API_KEY` — API key (required)
//! - `UPSTAGE_API_URL` — API base URL (default: `https://api.upstage.ai/v1`)
//! - `UPSTAGE_DEFAULT_MODEL` — model used when a call names none (default: `solar-pro2`)
//! - `SOLAR_LOG_FORMAT` — `text` or `json` log lines on stderr (default: `text`)

use clap::{Parser, ValueEnum};
use solar_core::{API_BASE_URL, DEFAULT_MODEL};
use thiserror::Error;

/// Solar MCP - Upstage Solar chat models as an MCP tool
///
/// Speaks MCP over stdio; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "solar-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Upstage API key
    #[arg(long, env = "UPSTAGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the chat-completion API
    #[arg(long, env = "UPSTAGE_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    /// Model used when a tool call does not name one
    #[arg(long, env = "UPSTAGE_DEFAULT_MODEL", default_value = DEFAULT_MODEL)]
    pub default_model: String,

    /// Log output format
    #[arg(long, env = "SOLAR_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Format of the stderr log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "UPSTAGE_API_KEY environment variable is required. Please set it with your Upstage API key."
    )]
    MissingApiKey,
}

/// Validated runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub default_model: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl Config {
    /// Validate parsed options. A blank API key counts as missing.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let api_url = match cli.api_url.trim() {
            "" => API_BASE_URL,
            url => url,
        };
        let default_model = match cli.default_model.trim() {
            "" => DEFAULT_MODEL,
            model => model,
        };

        Ok(Self {
            api_key: api_key.to_string(),
            api_url: api_url.to_string(),
            default_model: default_model.to_string(),
        })
    }
}

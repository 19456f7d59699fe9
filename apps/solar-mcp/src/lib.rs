//! # Solar MCP
//!
//! MCP (Model Context Protocol) bridge to the Upstage Solar chat API.
//!
//! ```text
//! MCP host <--MCP (stdio)--> solar-mcp <--HTTP/SSE--> api.upstage.ai/v1
//! ```
//!
//! - `client` - HTTP calls to `/chat/completions`, blocking or streamed
//! - `stream` - SSE body to chunk stream adapter
//! - `chat` - the `solar_chat` executor and its usage accounting
//! - `server` - rmcp `ServerHandler` exposing the tool and resources
//! - `config` - command line / environment configuration

pub mod chat;
pub mod client;
pub mod config;
pub mod server;
pub mod stream;

pub use chat::{ChatExecutor, SolarChatParams, SolarChatResult};
pub use client::{ClientError, SolarClient};
pub use config::{Cli, Config, ConfigError, LogFormat};
pub use server::SolarMcp;

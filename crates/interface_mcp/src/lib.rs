//! Stdio Interface Layer
//!
//! Exposes the operation catalog to an external caller over line-delimited
//! JSON-RPC on stdin/stdout (MCP 2024-11-05 framing).
//!
//! # Architecture
//!
//! - **catalog**: the standard operation catalog (names, required arguments,
//!   defaults)
//! - **tools**: tool definitions with input schemas for `tools/list`
//! - **dispatcher**: validates and routes `tools/call` invocations, wrapping
//!   every outcome in the uniform `{result, error}` envelope
//! - **transport**: JSON-RPC wire types and the stdio read loop
//! - **config**: environment-driven settings for the server binary

pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod tools;
pub mod transport;

pub use catalog::standard_catalog;
pub use config::AppConfig;
pub use dispatcher::Dispatcher;
pub use transport::McpServer;

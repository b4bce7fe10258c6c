//! # defender-mcp
//!
//! MCP (Model Context Protocol) server layer for the Defender bridge.
//! Exposes the alert and device queries as tools over line-delimited
//! JSON-RPC 2.0 on stdio.

pub mod defender;
pub mod registry;
pub mod server;
pub mod tool;
pub mod types;

pub use defender::{GetAlertsTool, ListDevicesTool};
pub use registry::ToolRegistry;
pub use server::McpServer;
pub use tool::{Tool, ToolDef, ToolDefBuilder};
pub use types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpContent, McpToolResult};

/// Server name advertised during the initialize handshake
pub const SERVER_NAME: &str = "defender-alerts";

/// MCP protocol version this server speaks
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

//! Model Context Protocol (MCP) server support
//!
//! Exposes the dataset, tabular and notes tools over MCP. Every call passes
//! through the capability guard before a tool runs.

pub mod responses;
pub mod server;
pub mod shared_utils;
pub mod tool_registry;
pub mod tools;

pub use server::McpServer;
pub use tool_registry::{register_all_tools, McpTool, ToolContext, ToolRegistry};

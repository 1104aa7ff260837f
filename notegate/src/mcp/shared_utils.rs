//! Shared utilities for MCP operations

use crate::error::{ErrorChainExt, NotegateError, Result};
use rmcp::Error as McpError;

/// Common error handling patterns for MCP operations
pub struct McpErrorHandler;

impl McpErrorHandler {
    /// Convert NotegateError to appropriate MCP error response
    ///
    /// - Caller mistakes (unknown dataset, bad argument) -> invalid_params
    /// - Everything else -> internal_error
    pub fn handle_error(error: NotegateError, operation: &str) -> McpError {
        tracing::error!("MCP operation '{}' failed: {}", operation, error.error_chain());

        match error {
            NotegateError::DatasetNotFound(name) => {
                McpError::invalid_params(format!("Dataset not found: {name}"), None)
            }
            NotegateError::InvalidArgument(msg) => McpError::invalid_params(msg, None),
            NotegateError::DatabaseNotFound(path) => McpError::internal_error(
                format!("Database file not found: {}", path.display()),
                None,
            ),
            other => McpError::internal_error(other.to_string(), None),
        }
    }

    /// Handle results with consistent error mapping
    pub fn handle_result<T>(result: Result<T>, operation: &str) -> std::result::Result<T, McpError> {
        result.map_err(|e| Self::handle_error(e, operation))
    }

    /// A blocking task panicked or was cancelled
    pub fn handle_join_error(error: tokio::task::JoinError, operation: &str) -> McpError {
        tracing::error!("MCP operation '{}' did not complete: {}", operation, error);
        McpError::internal_error(format!("{operation} did not complete: {error}"), None)
    }
}

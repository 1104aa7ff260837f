//! Unified error handling for the notegate library
//!
//! Library operations return typed errors; the tool layer converts them into
//! descriptive text before anything reaches a caller.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the notegate library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotegateError {
    /// No dataset registered under the given name
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// The database file backing a dataset does not exist
    #[error("Database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    /// The query engine rejected or failed a statement
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    /// A caller-supplied value is outside the accepted set
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A query failed for a reason other than the engine itself
    #[error("Query error: {0}")]
    Query(String),
}

/// Result type alias for notegate operations
pub type Result<T> = std::result::Result<T, NotegateError>;

/// Error chain formatter for detailed error reporting
pub struct ErrorChain<'a>(&'a dyn std::error::Error);

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;

        let mut current = self.0.source();
        while let Some(err) = current {
            write!(f, ": {err}")?;
            current = err.source();
        }

        Ok(())
    }
}

/// Extension trait for error types to format the full error chain
pub trait ErrorChainExt {
    /// Format the full error chain on a single line
    fn error_chain(&self) -> ErrorChain<'_>;
}

impl<E: std::error::Error> ErrorChainExt for E {
    fn error_chain(&self) -> ErrorChain<'_> {
        ErrorChain(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("Failed to open discharge")]
    struct OpenFailed(#[source] std::io::Error);

    #[test]
    fn test_error_chain_is_single_line() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only file system");
        let err = OpenFailed(io_err);

        let chain = err.error_chain().to_string();
        assert_eq!(chain, "Failed to open discharge: read-only file system");
    }

    #[test]
    fn test_database_not_found_names_path() {
        let err = NotegateError::DatabaseNotFound(PathBuf::from("/data/mimic-iv-note.duckdb"));
        assert_eq!(
            err.to_string(),
            "Database file not found: /data/mimic-iv-note.duckdb"
        );
    }
}

//! # notegate
//!
//! Capability-gated access to clinical note corpora for LLM agents.
//!
//! ## Features
//!
//! - **Capability gate**: decide per (tool, dataset) pair whether a tool may run
//! - **Note search**: case-insensitive keyword search returning bounded snippets
//! - **Note retrieval**: fetch one note by ID with optional truncation
//! - **Patient index**: list note metadata for a patient without full text
//! - **MCP Support**: Model Context Protocol server exposing every tool
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notegate::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let config = Config::new();
//! let datasets = DatasetRegistry::from_config(&config)?;
//! let dataset = datasets.set_active("mimic-iv-note")?;
//!
//! let tool = ToolDescriptor::new("search_notes", [Modality::Notes]);
//! if let Guard::Proceed = guard(&tool, &dataset) {
//!     let engine = NoteEngine::new(Arc::new(DuckDbBackend::new()));
//!     let output = engine.search(&dataset, &SearchNotesRequest::new("pneumonia"));
//!     println!("{}", output);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Query backend contract and the DuckDB implementation
pub mod backends;

/// Tool capability requirements and the pre-call guard
pub mod capabilities;

/// Shared helpers
pub mod common;

/// Configuration loading
pub mod config;

/// Dataset descriptors and registry
pub mod datasets;

/// Error types used throughout the library
pub mod error;

/// Model Context Protocol (MCP) server support
pub mod mcp;

/// Clinical notes search and retrieval
pub mod notes;

/// Tool output value
pub mod output;

/// Schema listing, table preview and read-only SQL
pub mod tabular;

#[cfg(test)]
pub(crate) mod test_utils;

pub use backends::{DuckDbBackend, QueryBackend, QueryResult, Statement};
pub use capabilities::{check_compatibility, guard, Compatibility, Guard, ToolDescriptor};
pub use config::{Config, ConfigError};
pub use datasets::{DatasetDefinition, DatasetRegistry, Modality};
pub use error::{NotegateError, Result};
pub use notes::{
    GetNoteRequest, ListPatientNotesRequest, NoteEngine, NoteTable, NoteType, SearchNotesRequest,
};
pub use output::ToolOutput;
pub use tabular::TabularEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        check_compatibility, guard, Compatibility, Config, DatasetDefinition, DatasetRegistry,
        DuckDbBackend, GetNoteRequest, Guard, ListPatientNotesRequest, Modality, NoteEngine,
        NotegateError, QueryBackend, Result, SearchNotesRequest, TabularEngine, ToolDescriptor,
        ToolOutput,
    };

    pub use crate::mcp::McpServer;
}

//! notegate CLI library
//!
//! Command-line definitions, exit codes and the MCP-mode log writer, exposed
//! for integration tests.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Flushing file writer for MCP-mode logs
pub mod logging;

//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: The tool answered with an error response (invalid input, incompatible
//!   dataset, failed query)
//! - 2: The command could not run at all (configuration, unknown dataset)

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// The tool ran and reported an error
pub const EXIT_WARNING: i32 = 1;

/// Configuration errors or critical failures
pub const EXIT_ERROR: i32 = 2;

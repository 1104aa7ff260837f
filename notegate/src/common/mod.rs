//! Common utilities module
//!
//! Shared helpers used by configuration loading and the tool layer.

/// Environment variable loading utilities
pub mod env_loader;

pub use env_loader::{load_env_optional, load_env_parsed, load_env_string, EnvLoader};

//! MCP tools, one submodule per category and one directory per tool

pub mod datasets;
pub mod notes;
pub mod tabular;

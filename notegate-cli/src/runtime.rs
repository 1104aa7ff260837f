//! Configuration and tool wiring shared by every subcommand

use crate::error::{CliResult, IntoCliResult};
use notegate::mcp::{register_all_tools, ToolContext, ToolRegistry};
use notegate::{Config, DatasetRegistry, DuckDbBackend, NoteEngine, TabularEngine};
use rmcp::model::{CallToolResult, RawContent};
use std::path::Path;
use std::sync::Arc;

/// Resolve configuration, then apply the `--dataset` override
pub fn load_config(config_file: Option<&Path>, dataset: Option<&str>) -> CliResult<Config> {
    let mut config = match config_file {
        Some(path) => Config::from_file(path).cli_critical_error()?,
        None => Config::new(),
    };

    if let Some(name) = dataset {
        tracing::debug!("Dataset override from command line: {}", name);
        config.active_dataset = name.to_string();
    }

    Ok(config)
}

/// The same registry and context the MCP server uses
pub struct Tools {
    pub registry: ToolRegistry,
    pub context: ToolContext,
}

impl Tools {
    pub fn from_config(config: &Config) -> CliResult<Self> {
        let datasets = DatasetRegistry::from_config(config).cli_critical_error()?;
        let backend = Arc::new(DuckDbBackend::new());

        let mut registry = ToolRegistry::new();
        register_all_tools(&mut registry);

        let context = ToolContext::new(
            Arc::new(datasets),
            NoteEngine::new(backend.clone()),
            TabularEngine::new(backend, config.max_result_rows),
            registry.descriptors(),
        );

        Ok(Self { registry, context })
    }

    /// Run one tool through the guard and return its text and error flag
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> CliResult<(String, bool)> {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        let result = self
            .registry
            .call(name, arguments, &self.context)
            .await
            .cli_critical_error()?;

        Ok((response_text(&result), result.is_error.unwrap_or(false)))
    }
}

/// Concatenate the text content of a tool response
pub fn response_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|content| match &content.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

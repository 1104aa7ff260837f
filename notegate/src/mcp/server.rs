//! MCP server implementation for the notegate tools

use crate::backends::{DuckDbBackend, QueryBackend};
use crate::config::Config;
use crate::datasets::DatasetRegistry;
use crate::notes::NoteEngine;
use crate::tabular::TabularEngine;
use crate::Result;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

use super::tool_registry::{register_all_tools, ToolContext, ToolRegistry};

const INSTRUCTIONS: &str = "Clinical notes and tabular data access with capability checks. \
Use list_datasets and set_dataset to choose a dataset. Use search_notes to find notes by keyword \
(snippets only), list_patient_notes to see a patient's notes and get_note to read one. \
Use get_database_schema, get_table_info and execute_query for tabular data. \
Tools that need a modality the active dataset lacks explain why instead of running.";

/// MCP server for the notegate tools
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a server over the configured datasets with a DuckDB backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured active dataset is not registered.
    pub fn new(config: &Config) -> Result<Self> {
        let datasets = DatasetRegistry::from_config(config)?;
        Ok(Self::with_components(
            Arc::new(datasets),
            Arc::new(DuckDbBackend::new()),
            config.max_result_rows,
        ))
    }

    /// Create a server from already-built parts
    pub fn with_components(
        datasets: Arc<DatasetRegistry>,
        backend: Arc<dyn QueryBackend>,
        max_result_rows: usize,
    ) -> Self {
        let mut tool_registry = ToolRegistry::new();
        register_all_tools(&mut tool_registry);

        let tool_context = Arc::new(ToolContext::new(
            datasets,
            NoteEngine::new(Arc::clone(&backend)),
            TabularEngine::new(backend, max_result_rows),
            tool_registry.descriptors(),
        ));

        tracing::debug!(
            "MCP server ready with {} tools, active dataset: {}",
            tool_registry.len(),
            tool_context.datasets.active_name()
        );

        Self {
            tool_registry: Arc::new(tool_registry),
            tool_context,
        }
    }

    /// Names of the registered tools
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_registry.list_tool_names()
    }
}

impl ServerHandler for McpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.tool_registry
            .call(
                &request.name,
                request.arguments.unwrap_or_default(),
                &self.tool_context,
            )
            .await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                prompts: None,
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: None,
                logging: None,
                completions: None,
                experimental: None,
            },
            server_info: Implementation {
                name: "notegate".into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> Config {
        Config {
            data_dir: PathBuf::from("/nonexistent/notegate"),
            ..Config::default()
        }
    }

    #[test]
    fn test_server_info() {
        let server = McpServer::new(&config()).unwrap();
        let info = server.get_info();
        assert_eq!(info.server_info.name, "notegate");
        assert_eq!(info.server_info.version, crate::VERSION);
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_server_registers_every_tool() {
        let server = McpServer::new(&config()).unwrap();
        assert_eq!(server.tool_names().len(), 8);
        assert_eq!(server.tool_context.catalog.len(), 8);
        assert_eq!(server.tool_context.datasets.active_name(), "mimic-iv-demo");
    }

    #[test]
    fn test_unknown_active_dataset_fails_startup() {
        let mut config = config();
        config.active_dataset = "nope".to_string();
        assert!(McpServer::new(&config).is_err());
    }
}

//! List the tables of the active dataset

use crate::capabilities::ToolDescriptor;
use crate::datasets::{DatasetDefinition, Modality};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool for listing tables
#[derive(Default)]
pub struct GetDatabaseSchemaTool;

impl GetDatabaseSchemaTool {
    /// Creates a new instance of the GetDatabaseSchemaTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetDatabaseSchemaTool {
    fn name(&self) -> &'static str {
        "get_database_schema"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.name(), [Modality::Tabular])
    }

    async fn execute(
        &self,
        _arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
        dataset: Arc<DatasetDefinition>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let tabular = context.tabular.clone();
        BaseToolImpl::run_blocking(self.name(), move || tabular.schema(&dataset)).await
    }
}

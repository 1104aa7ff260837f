//! Columns and sample rows of one table

use crate::capabilities::ToolDescriptor;
use crate::datasets::{DatasetDefinition, Modality};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::tabular::GetTableInfoRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool for describing a table
#[derive(Default)]
pub struct GetTableInfoTool;

impl GetTableInfoTool {
    /// Creates a new instance of the GetTableInfoTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetTableInfoTool {
    fn name(&self) -> &'static str {
        "get_table_info"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "table_name": {
                    "type": "string",
                    "description": "Exact table name as listed by get_database_schema"
                },
                "show_sample": {
                    "type": "boolean",
                    "description": "Whether to include sample rows",
                    "default": true
                }
            },
            "required": ["table_name"]
        })
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.name(), [Modality::Tabular])
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
        dataset: Arc<DatasetDefinition>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetTableInfoRequest = BaseToolImpl::parse_arguments(arguments)?;
        let tabular = context.tabular.clone();
        BaseToolImpl::run_blocking(self.name(), move || tabular.table_info(&dataset, &request))
            .await
    }
}

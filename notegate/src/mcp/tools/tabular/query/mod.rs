//! Read-only SQL against the active dataset

use crate::capabilities::ToolDescriptor;
use crate::datasets::{DatasetDefinition, Modality};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::tabular::ExecuteQueryRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool for running a SELECT query
#[derive(Default)]
pub struct ExecuteQueryTool;

impl ExecuteQueryTool {
    /// Creates a new instance of the ExecuteQueryTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ExecuteQueryTool {
    fn name(&self) -> &'static str {
        "execute_query"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "sql_query": {
                    "type": "string",
                    "description": "A single SELECT or WITH query"
                }
            },
            "required": ["sql_query"]
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
        let request: ExecuteQueryRequest = BaseToolImpl::parse_arguments(arguments)?;
        let tabular = context.tabular.clone();
        BaseToolImpl::run_blocking(self.name(), move || {
            tabular.execute_query(&dataset, &request)
        })
        .await
    }
}

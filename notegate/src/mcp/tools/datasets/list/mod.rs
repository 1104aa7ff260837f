//! List registered datasets and the active selection

use crate::datasets::{DatasetDefinition, ListDatasetsRequest};
use crate::mcp::responses::create_output_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool for listing datasets
#[derive(Default)]
pub struct ListDatasetsTool;

impl ListDatasetsTool {
    /// Creates a new instance of the ListDatasetsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListDatasetsTool {
    fn name(&self) -> &'static str {
        "list_datasets"
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

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
        _dataset: Arc<DatasetDefinition>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let _request: ListDatasetsRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(create_output_response(context.datasets.list_datasets()))
    }
}

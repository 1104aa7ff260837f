//! Switch the active dataset

use crate::datasets::{DatasetDefinition, SetDatasetRequest};
use crate::mcp::responses::create_output_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool for changing the active dataset
#[derive(Default)]
pub struct SetDatasetTool;

impl SetDatasetTool {
    /// Creates a new instance of the SetDatasetTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for SetDatasetTool {
    fn name(&self) -> &'static str {
        "set_dataset"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "dataset_name": {
                    "type": "string",
                    "description": "Name of the dataset to switch to, e.g. 'mimic-iv-note'"
                }
            },
            "required": ["dataset_name"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
        _dataset: Arc<DatasetDefinition>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: SetDatasetRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(create_output_response(
            context.datasets.switch_dataset(&request, &context.catalog),
        ))
    }
}

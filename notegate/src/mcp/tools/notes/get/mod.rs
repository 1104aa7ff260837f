//! Retrieve one clinical note by identifier

use crate::capabilities::ToolDescriptor;
use crate::datasets::{DatasetDefinition, Modality};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::notes::GetNoteRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool for retrieving a note's text
#[derive(Default)]
pub struct GetNoteTool;

impl GetNoteTool {
    /// Creates a new instance of the GetNoteTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetNoteTool {
    fn name(&self) -> &'static str {
        "get_note"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "note_id": {
                    "type": "string",
                    "description": "The note ID, e.g. from search_notes or list_patient_notes"
                },
                "max_length": {
                    "type": "integer",
                    "description": "Optional maximum characters to return; longer notes are truncated",
                    "minimum": 1
                }
            },
            "required": ["note_id"]
        })
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.name(), [Modality::Notes])
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
        dataset: Arc<DatasetDefinition>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetNoteRequest = BaseToolImpl::parse_arguments(arguments)?;
        let notes = context.notes.clone();
        BaseToolImpl::run_blocking(self.name(), move || notes.get(&dataset, &request)).await
    }
}

//! List the notes recorded for a patient

use crate::capabilities::ToolDescriptor;
use crate::datasets::{DatasetDefinition, Modality};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::notes::ListPatientNotesRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool for listing note metadata by subject
#[derive(Default)]
pub struct ListPatientNotesTool;

impl ListPatientNotesTool {
    /// Creates a new instance of the ListPatientNotesTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListPatientNotesTool {
    fn name(&self) -> &'static str {
        "list_patient_notes"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "subject_id": {
                    "type": "integer",
                    "description": "Patient identifier (same as in the tabular dataset)"
                },
                "note_type": {
                    "type": "string",
                    "description": "Type of notes to list: 'discharge', 'radiology', or 'all'",
                    "default": "all"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum notes to return per note type",
                    "default": 20,
                    "minimum": 1
                }
            },
            "required": ["subject_id"]
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
        let request: ListPatientNotesRequest = BaseToolImpl::parse_arguments(arguments)?;
        let notes = context.notes.clone();
        BaseToolImpl::run_blocking(self.name(), move || {
            notes.list_patient_notes(&dataset, &request)
        })
        .await
    }
}

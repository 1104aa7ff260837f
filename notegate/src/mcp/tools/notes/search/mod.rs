//! Keyword search over clinical notes

use crate::capabilities::ToolDescriptor;
use crate::datasets::{DatasetDefinition, Modality};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::notes::SearchNotesRequest;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use std::sync::Arc;

/// Tool for searching notes by keyword
#[derive(Default)]
pub struct SearchNotesTool;

impl SearchNotesTool {
    /// Creates a new instance of the SearchNotesTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for SearchNotesTool {
    fn name(&self) -> &'static str {
        "search_notes"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search term to find in notes (case-insensitive)"
                },
                "note_type": {
                    "type": "string",
                    "description": "Type of notes to search: 'discharge', 'radiology', or 'all'",
                    "default": "all"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results per note type",
                    "default": 5,
                    "minimum": 1
                },
                "snippet_length": {
                    "type": "integer",
                    "description": "Characters of context around each match",
                    "default": 300,
                    "minimum": 1
                }
            },
            "required": ["query"]
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
        let request: SearchNotesRequest = BaseToolImpl::parse_arguments(arguments)?;
        let notes = context.notes.clone();
        BaseToolImpl::run_blocking(self.name(), move || notes.search(&dataset, &request)).await
    }
}

//! Response creation utilities for MCP operations

use crate::output::ToolOutput;
use rmcp::model::*;

/// Create a success response for MCP tool calls
pub fn create_success_response(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text: message }),
            None,
        )],
        is_error: Some(false),
    }
}

/// Create an error response for MCP tool calls
pub fn create_error_response(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text: message }),
            None,
        )],
        is_error: Some(true),
    }
}

/// Wrap a tool's text output, carrying its error flag
pub fn create_output_response(output: ToolOutput) -> CallToolResult {
    if output.is_error {
        create_error_response(output.result)
    } else {
        create_success_response(output.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_response_keeps_flag_and_text() {
        let ok = create_output_response(ToolOutput::success("**No matches found**"));
        assert_eq!(ok.is_error, Some(false));

        let err = create_output_response(ToolOutput::error("**Error:** Invalid note_type"));
        assert_eq!(err.is_error, Some(true));
        match &err.content[0].raw {
            RawContent::Text(content) => assert_eq!(content.text, "**Error:** Invalid note_type"),
            _ => panic!("expected text content"),
        }
    }
}

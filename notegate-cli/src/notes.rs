//! `search`, `get` and `notes` subcommands
//!
//! Each command is dispatched as the matching MCP tool so the capability guard
//! and every response format are identical to the server's.

use crate::error::CliResult;
use crate::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};
use crate::runtime::Tools;
use serde_json::json;

pub async fn run_search(
    tools: &Tools,
    query: String,
    note_type: String,
    limit: usize,
    snippet_length: usize,
) -> CliResult<i32> {
    let arguments = json!({
        "query": query,
        "note_type": note_type,
        "limit": limit,
        "snippet_length": snippet_length,
    });
    print_tool(tools, "search_notes", arguments).await
}

pub async fn run_get(tools: &Tools, note_id: String, max_length: Option<usize>) -> CliResult<i32> {
    let mut arguments = json!({ "note_id": note_id });
    if let Some(max_length) = max_length {
        arguments["max_length"] = json!(max_length);
    }
    print_tool(tools, "get_note", arguments).await
}

pub async fn run_notes(
    tools: &Tools,
    subject_id: i64,
    note_type: String,
    limit: usize,
) -> CliResult<i32> {
    let arguments = json!({
        "subject_id": subject_id,
        "note_type": note_type,
        "limit": limit,
    });
    print_tool(tools, "list_patient_notes", arguments).await
}

async fn print_tool(tools: &Tools, name: &str, arguments: serde_json::Value) -> CliResult<i32> {
    let (text, is_error) = tools.call(name, arguments).await?;
    println!("{text}");

    if is_error {
        tracing::debug!("{} returned an error response", name);
        Ok(EXIT_WARNING)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

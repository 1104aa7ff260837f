//! Clinical notes tools
//!
//! All three require the `notes` modality and return bounded text:
//! - **search**: keyword search returning snippets
//! - **get**: one note by identifier, optionally truncated
//! - **list**: note metadata for a patient

pub mod get;
pub mod list;
pub mod search;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all notes tools with the registry
pub fn register_notes_tools(registry: &mut ToolRegistry) {
    registry.register(search::SearchNotesTool::new());
    registry.register(get::GetNoteTool::new());
    registry.register(list::ListPatientNotesTool::new());
}

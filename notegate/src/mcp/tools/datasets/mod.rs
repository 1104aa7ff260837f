//! Dataset management tools
//!
//! These have no modality requirements and run against any active dataset.

pub mod list;
pub mod set;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all dataset management tools with the registry
pub fn register_dataset_tools(registry: &mut ToolRegistry) {
    registry.register(list::ListDatasetsTool::new());
    registry.register(set::SetDatasetTool::new());
}

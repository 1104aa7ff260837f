//! Tabular tools: schema, table preview and read-only SQL

pub mod query;
pub mod schema;
pub mod table_info;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all tabular tools with the registry
pub fn register_tabular_tools(registry: &mut ToolRegistry) {
    registry.register(schema::GetDatabaseSchemaTool::new());
    registry.register(table_info::GetTableInfoTool::new());
    registry.register(query::ExecuteQueryTool::new());
}

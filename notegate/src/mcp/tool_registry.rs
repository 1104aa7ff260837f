//! Tool registry for MCP operations
//!
//! Each tool is a [`McpTool`] with its own request type and capability
//! requirements. [`ToolRegistry::call`] resolves the active dataset, runs the
//! capability guard and only then hands the call to the tool.

use super::responses::create_output_response;
use super::shared_utils::McpErrorHandler;
use crate::capabilities::{guard, Guard, ToolDescriptor};
use crate::datasets::{DatasetDefinition, DatasetRegistry};
use crate::notes::NoteEngine;
use crate::output::ToolOutput;
use crate::tabular::TabularEngine;
use rmcp::model::{CallToolResult, Tool};
use rmcp::Error as McpError;
use std::collections::HashMap;
use std::sync::Arc;

/// Context shared by all tools during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Dataset descriptors and the active selection
    pub datasets: Arc<DatasetRegistry>,
    /// Note search and retrieval
    pub notes: NoteEngine,
    /// Schema, table preview and SQL tools
    pub tabular: TabularEngine,
    /// Descriptors of every registered tool
    pub catalog: Arc<Vec<ToolDescriptor>>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(
        datasets: Arc<DatasetRegistry>,
        notes: NoteEngine,
        tabular: TabularEngine,
        catalog: Vec<ToolDescriptor>,
    ) -> Self {
        Self {
            datasets,
            notes,
            tabular,
            catalog: Arc::new(catalog),
        }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &'static str;

    /// Get the tool's description
    fn description(&self) -> &'static str;

    /// Get the tool's JSON schema for arguments
    fn schema(&self) -> serde_json::Value;

    /// Capability requirements checked before every call
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.name(), [])
    }

    /// Execute the tool against an already-approved dataset
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
        dataset: Arc<DatasetDefinition>,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// List all registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Capability descriptors of every registered tool
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<ToolDescriptor> =
            self.tools.values().map(|tool| tool.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .map(|tool| {
                let schema_map = match tool.schema() {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };

                Tool {
                    name: tool.name().into(),
                    description: Some(tool.description().into()),
                    input_schema: Arc::new(schema_map),
                    annotations: None,
                }
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call: resolve the active dataset, guard, then execute
    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| McpError::invalid_request(format!("Unknown tool: {name}"), None))?;

        let dataset = McpErrorHandler::handle_result(context.datasets.get_active(), name)?;

        match guard(&tool.descriptor(), &dataset) {
            Guard::Respond(output) => Ok(create_output_response(output)),
            Guard::Proceed => {
                tracing::debug!("Calling {} on dataset {}", name, dataset.name);
                tool.execute(arguments, context, dataset).await
            }
        }
    }
}

/// Base implementation providing common utility methods for MCP tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse tool arguments from a JSON map into a typed struct
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {e}"), None))
    }

    /// Run blocking engine work off the async runtime and wrap its output
    pub async fn run_blocking<F>(operation: &str, work: F) -> std::result::Result<CallToolResult, McpError>
    where
        F: FnOnce() -> ToolOutput + Send + 'static,
    {
        tokio::task::spawn_blocking(work)
            .await
            .map(create_output_response)
            .map_err(|e| McpErrorHandler::handle_join_error(e, operation))
    }
}

/// Register every tool with the registry
pub fn register_all_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::{datasets, notes, tabular};
    datasets::register_dataset_tools(registry);
    tabular::register_tabular_tools(registry);
    notes::register_notes_tools(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::DuckDbBackend;
    use crate::datasets::Modality;
    use crate::test_utils::{NoteCorpus, LONG_NOTE_ID};
    use rmcp::model::RawContent;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        register_all_tools(&mut registry);
        registry
    }

    fn context(corpus: &NoteCorpus, registry: &ToolRegistry) -> ToolContext {
        let tabular_only = DatasetDefinition::new(
            "tabular-only",
            [Modality::Tabular],
            corpus.dataset.database.clone(),
        );
        let datasets = DatasetRegistry::new([corpus.dataset.clone(), tabular_only], "test-notes")
            .unwrap();
        let backend = Arc::new(DuckDbBackend::new());
        ToolContext::new(
            Arc::new(datasets),
            NoteEngine::new(backend.clone()),
            TabularEngine::new(backend, 100),
            registry.descriptors(),
        )
    }

    fn arguments(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    fn text(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(content) => content.text.clone(),
            _ => panic!("expected text content"),
        }
    }

    #[test]
    fn test_all_tools_registered() {
        let registry = registry();
        assert_eq!(
            registry.list_tool_names(),
            vec![
                "execute_query",
                "get_database_schema",
                "get_note",
                "get_table_info",
                "list_datasets",
                "list_patient_notes",
                "search_notes",
                "set_dataset",
            ]
        );
        for tool in registry.list_tools() {
            assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
            assert!(tool.description.is_some());
        }
    }

    #[test]
    fn test_descriptors_carry_requirements() {
        let registry = registry();
        let descriptors = registry.descriptors();
        let find = |name: &str| descriptors.iter().find(|d| d.name == name).unwrap().clone();

        assert!(find("search_notes").required_modalities.contains(&Modality::Notes));
        assert!(find("execute_query").required_modalities.contains(&Modality::Tabular));
        assert!(find("list_datasets").required_modalities.is_empty());
    }

    #[tokio::test]
    async fn test_call_runs_compatible_tool() {
        let corpus = NoteCorpus::new();
        let registry = registry();
        let context = context(&corpus, &registry);

        let result = registry
            .call("get_note", arguments(json!({"note_id": LONG_NOTE_ID, "max_length": 50})), &context)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert!(text(&result).contains("**Note (truncated to 50 chars):**"));
    }

    #[tokio::test]
    async fn test_switching_dataset_changes_guard_decision() {
        let corpus = NoteCorpus::new();
        let registry = registry();
        let context = context(&corpus, &registry);

        let switched = registry
            .call("set_dataset", arguments(json!({"dataset_name": "tabular-only"})), &context)
            .await
            .unwrap();
        assert!(text(&switched).contains("**Unavailable:** get_note, list_patient_notes, search_notes"));

        let blocked = registry
            .call("search_notes", arguments(json!({"query": "pneumonia"})), &context)
            .await
            .unwrap();
        assert_eq!(blocked.is_error, Some(true));
        assert!(text(&blocked).contains("`search_notes` is not available for dataset 'tabular-only'"));

        let allowed = registry
            .call("get_database_schema", serde_json::Map::new(), &context)
            .await
            .unwrap();
        assert!(text(&allowed).contains("- patients"));
    }

    #[tokio::test]
    async fn test_guard_runs_before_argument_parsing() {
        let corpus = NoteCorpus::new();
        let registry = registry();
        let context = context(&corpus, &registry);
        context.datasets.set_active("tabular-only").unwrap();

        let result = registry
            .call("list_patient_notes", serde_json::Map::new(), &context)
            .await
            .unwrap();
        assert!(text(&result).contains("is not available"));
    }

    #[tokio::test]
    async fn test_bad_arguments_are_invalid_params() {
        let corpus = NoteCorpus::new();
        let registry = registry();
        let context = context(&corpus, &registry);

        let err = registry
            .call("list_patient_notes", arguments(json!({"subject_id": "abc"})), &context)
            .await
            .unwrap_err();
        assert!(err.message.contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_rejected() {
        let corpus = NoteCorpus::new();
        let registry = registry();
        let context = context(&corpus, &registry);

        let err = registry
            .call("drop_everything", serde_json::Map::new(), &context)
            .await
            .unwrap_err();
        assert!(err.message.contains("Unknown tool: drop_everything"));
    }
}

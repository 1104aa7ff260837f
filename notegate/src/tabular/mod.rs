//! Generic tabular tools: schema listing, table preview and read-only SQL
//!
//! These share the backend contract with the note engine but carry no
//! snippet logic. Table names are checked against the schema listing before
//! they are interpolated, and free-form SQL is limited to one `SELECT`/`WITH`
//! statement.

use crate::backends::{QueryBackend, Statement};
use crate::datasets::DatasetDefinition;
use crate::error::{ErrorChainExt, Result};
use crate::output::ToolOutput;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Rows shown by `get_table_info` when samples are requested
pub const SAMPLE_ROWS: usize = 3;

fn default_show_sample() -> bool {
    true
}

/// Describe one table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct GetTableInfoRequest {
    /// Exact table name as listed by get_database_schema
    pub table_name: String,
    /// Whether to include sample rows
    #[serde(default = "default_show_sample")]
    pub show_sample: bool,
}

/// Run a read-only query
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ExecuteQueryRequest {
    /// A single SELECT or WITH statement
    pub sql_query: String,
}

/// Quote an identifier for interpolation by doubling double quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Check that `sql` is a single read-only statement; returns it without a
/// trailing semicolon
pub fn validate_read_only(sql: &str) -> std::result::Result<&str, String> {
    let trimmed = sql.trim().trim_end_matches(';').trim_end();
    if trimmed.is_empty() {
        return Err("query is empty".to_string());
    }
    if trimmed.contains(';') {
        return Err("only a single statement is allowed".to_string());
    }

    let keyword = trimmed
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
        .to_uppercase();
    match keyword.as_str() {
        "SELECT" | "WITH" => Ok(trimmed),
        _ => Err(format!(
            "only SELECT and WITH queries are allowed, got '{keyword}'"
        )),
    }
}

/// Runs tabular tools against a backend
#[derive(Clone)]
pub struct TabularEngine {
    backend: Arc<dyn QueryBackend>,
    max_result_rows: usize,
}

impl std::fmt::Debug for TabularEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularEngine")
            .field("max_result_rows", &self.max_result_rows)
            .finish_non_exhaustive()
    }
}

impl TabularEngine {
    /// Create an engine capping `execute_query` output at `max_result_rows`
    pub fn new(backend: Arc<dyn QueryBackend>, max_result_rows: usize) -> Self {
        Self {
            backend,
            max_result_rows,
        }
    }

    /// User tables of the dataset, sorted by name
    pub fn table_names(&self, dataset: &DatasetDefinition) -> Result<Vec<String>> {
        let statement = Statement::new(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema NOT IN ('information_schema', 'pg_catalog') \
             ORDER BY table_name",
        );
        let result = self.backend.execute(dataset, &statement)?;
        Ok(result
            .rows
            .iter()
            .filter_map(|row| row.first())
            .map(|cell| cell.to_string())
            .collect())
    }

    /// List the tables of the dataset
    pub fn schema(&self, dataset: &DatasetDefinition) -> ToolOutput {
        let info = self.backend.backend_info(dataset);
        match self.table_names(dataset) {
            Ok(tables) if tables.is_empty() => {
                ToolOutput::success(format!("{info}\n**No tables found** in {}.", dataset.name))
            }
            Ok(tables) => {
                let listing = tables
                    .iter()
                    .map(|table| format!("- {table}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                ToolOutput::success(format!(
                    "{info}\n**Available tables ({}):**\n{listing}\n\n\
                     **Tip:** Use `get_table_info(table_name)` to see columns and sample rows.",
                    tables.len()
                ))
            }
            Err(e) => ToolOutput::error(format!(
                "{info}\n**Error:** Failed to list tables: {}",
                e.error_chain()
            )),
        }
    }

    /// Columns and optional sample rows of one table
    pub fn table_info(&self, dataset: &DatasetDefinition, request: &GetTableInfoRequest) -> ToolOutput {
        let info = self.backend.backend_info(dataset);

        let tables = match self.table_names(dataset) {
            Ok(tables) => tables,
            Err(e) => {
                return ToolOutput::error(format!(
                    "{info}\n**Error:** Failed to list tables: {}",
                    e.error_chain()
                ))
            }
        };
        let Some(table) = tables
            .iter()
            .find(|name| **name == request.table_name)
            .or_else(|| {
                tables
                    .iter()
                    .find(|name| name.eq_ignore_ascii_case(&request.table_name))
            })
        else {
            return ToolOutput::error(format!(
                "{info}\n**Error:** Table '{}' not found. Use `get_database_schema()` to list available tables.",
                request.table_name
            ));
        };

        let columns = Statement::new(
            "SELECT column_name, data_type, is_nullable FROM information_schema.columns \
             WHERE table_name = ? ORDER BY ordinal_position",
        )
        .bind_text(table.as_str());
        let mut output = match self.backend.execute(dataset, &columns) {
            Ok(result) => format!("{info}\n**Table:** {table}\n\n**Columns:**\n{}", result.render()),
            Err(e) => {
                return ToolOutput::error(format!(
                    "{info}\n**Error:** Failed to describe '{table}': {}",
                    e.error_chain()
                ))
            }
        };

        if request.show_sample {
            let sample = Statement::new(format!(
                "SELECT * FROM {} LIMIT {SAMPLE_ROWS}",
                quote_identifier(table)
            ));
            match self.backend.execute(dataset, &sample) {
                Ok(result) if result.is_empty() => output.push_str("\n\n**Sample data:** table is empty"),
                Ok(result) => {
                    output.push_str(&format!("\n\n**Sample data (first {SAMPLE_ROWS} rows):**\n{}", result.render()))
                }
                Err(e) => output.push_str(&format!(
                    "\n\n**Sample data:** Error - {}",
                    e.error_chain()
                )),
            }
        }

        ToolOutput::success(output)
    }

    /// Run one read-only statement, capping the rows returned
    pub fn execute_query(&self, dataset: &DatasetDefinition, request: &ExecuteQueryRequest) -> ToolOutput {
        let info = self.backend.backend_info(dataset);

        let sql = match validate_read_only(&request.sql_query) {
            Ok(sql) => sql,
            Err(reason) => {
                tracing::info!("Rejected query: {}", reason);
                return ToolOutput::error(format!(
                    "{info}\n**Error:** Query rejected: {reason}. Only read-only SELECT queries are supported."
                ));
            }
        };

        match self.backend.execute(dataset, &Statement::new(sql)) {
            Ok(result) if result.is_empty() => {
                ToolOutput::success(format!("{info}\n**No rows returned.**"))
            }
            Ok(mut result) => {
                let total = result.len();
                let truncated = result.truncate(self.max_result_rows);
                let mut output = format!("{info}\n{}", result.render());
                if truncated {
                    output.push_str(&format!(
                        "\n\n*Showing first {} of {total} rows. Add a LIMIT clause or aggregate to see less.*",
                        self.max_result_rows
                    ));
                }
                ToolOutput::success(output)
            }
            Err(e) => ToolOutput::error(format!(
                "{info}\n**Query Error:** {}\n\n**Tip:** Use `get_database_schema()` and \
                 `get_table_info(table_name)` to check table and column names.",
                e.error_chain()
            )),
        }
    }
}

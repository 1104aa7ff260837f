//! DuckDB query backend
//!
//! Each dataset maps to one DuckDB file. Files are opened read-only on first
//! use and the connection is cached for the life of the backend.

use super::{CellValue, Param, QueryBackend, QueryResult, Statement};
use crate::datasets::DatasetDefinition;
use crate::error::{NotegateError, Result};
use dashmap::DashMap;
use duckdb::types::{ToSqlOutput, Value};
use duckdb::{params_from_iter, AccessMode, Config, Connection, ToSql};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

impl ToSql for Param {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        match self {
            Param::Text(text) => Ok(ToSqlOutput::from(text.as_str())),
            Param::Int(value) => Ok(ToSqlOutput::from(*value)),
        }
    }
}

/// Read-only DuckDB backend with one cached connection per database file
#[derive(Default)]
pub struct DuckDbBackend {
    connections: DashMap<PathBuf, Arc<Mutex<Connection>>>,
}

impl std::fmt::Debug for DuckDbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbBackend")
            .field("open_databases", &self.connections.len())
            .finish()
    }
}

impl DuckDbBackend {
    /// Create a backend with no open connections
    pub fn new() -> Self {
        Self::default()
    }

    fn connection(&self, path: &Path) -> Result<Arc<Mutex<Connection>>> {
        if let Some(existing) = self.connections.get(path) {
            return Ok(Arc::clone(existing.value()));
        }

        if !path.is_file() {
            return Err(NotegateError::DatabaseNotFound(path.to_path_buf()));
        }

        tracing::info!("Opening DuckDB database read-only: {}", path.display());
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let connection = Connection::open_with_flags(path, config).map_err(|e| {
            NotegateError::Query(format!(
                "Failed to open DuckDB database {}: {e}",
                path.display()
            ))
        })?;

        let connection = self
            .connections
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(connection)));
        Ok(Arc::clone(connection.value()))
    }

    fn convert_value(value: Value) -> CellValue {
        match value {
            Value::Null => CellValue::Null,
            Value::Boolean(value) => CellValue::Bool(value),
            Value::TinyInt(value) => CellValue::Int(value.into()),
            Value::SmallInt(value) => CellValue::Int(value.into()),
            Value::Int(value) => CellValue::Int(value.into()),
            Value::BigInt(value) => CellValue::Int(value),
            Value::UTinyInt(value) => CellValue::Int(value.into()),
            Value::USmallInt(value) => CellValue::Int(value.into()),
            Value::UInt(value) => CellValue::Int(value.into()),
            Value::UBigInt(value) => match i64::try_from(value) {
                Ok(value) => CellValue::Int(value),
                Err(_) => CellValue::Text(value.to_string()),
            },
            Value::HugeInt(value) => match i64::try_from(value) {
                Ok(value) => CellValue::Int(value),
                Err(_) => CellValue::Text(value.to_string()),
            },
            Value::Float(value) => CellValue::Float(value.into()),
            Value::Double(value) => CellValue::Float(value),
            Value::Text(text) => CellValue::Text(text),
            Value::Blob(bytes) => CellValue::Text(format!("<{} bytes>", bytes.len())),
            other => CellValue::Text(format!("{other:?}")),
        }
    }
}

impl QueryBackend for DuckDbBackend {
    fn execute(&self, dataset: &DatasetDefinition, statement: &Statement) -> Result<QueryResult> {
        tracing::debug!(
            "Executing on {}: {}",
            dataset.name,
            statement.to_inline_sql()
        );

        let connection = self.connection(&dataset.database)?;
        let conn = connection.lock().map_err(|e| {
            NotegateError::Query(format!("Failed to acquire connection lock: {e}"))
        })?;

        let mut stmt = conn
            .prepare(&statement.sql)
            .map_err(|e| NotegateError::Query(format!("Failed to prepare statement: {e}")))?;
        let mut rows = stmt
            .query(params_from_iter(statement.params.iter()))
            .map_err(|e| NotegateError::Query(format!("Query failed: {e}")))?;

        let columns = rows
            .as_ref()
            .map(|stmt| stmt.column_names())
            .unwrap_or_default();

        let mut result = QueryResult {
            columns,
            rows: Vec::new(),
        };
        while let Some(row) = rows
            .next()
            .map_err(|e| NotegateError::Query(format!("Failed to read row: {e}")))?
        {
            let mut cells = Vec::with_capacity(result.columns.len());
            for index in 0..result.columns.len() {
                let value: Value = row.get(index).map_err(|e| {
                    NotegateError::Query(format!("Failed to read column {index}: {e}"))
                })?;
                cells.push(Self::convert_value(value));
            }
            result.rows.push(cells);
        }

        tracing::debug!("{} rows from {}", result.len(), dataset.name);
        Ok(result)
    }

    fn backend_info(&self, dataset: &DatasetDefinition) -> String {
        format!(
            "**Backend:** DuckDB (local)\n**Dataset:** {}\n**Database:** {}",
            dataset.name,
            dataset.database.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::Modality;
    use crate::test_utils::NoteCorpus;

    #[test]
    fn test_missing_database_is_reported() {
        let backend = DuckDbBackend::new();
        let dataset = DatasetDefinition::new(
            "ghost",
            [Modality::Notes],
            "/definitely/not/here/ghost.duckdb",
        );

        match backend.execute(&dataset, &Statement::new("SELECT 1")) {
            Err(NotegateError::DatabaseNotFound(path)) => {
                assert_eq!(path, PathBuf::from("/definitely/not/here/ghost.duckdb"))
            }
            other => panic!("expected DatabaseNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_execute_binds_parameters() {
        let corpus = NoteCorpus::new();
        let backend = DuckDbBackend::new();

        let statement = Statement::new(
            "SELECT note_id, subject_id, length(text) AS note_length \
             FROM discharge WHERE subject_id = ? AND note_id = ?",
        )
        .bind_int(10000032)
        .bind_text("10000032-DS-21");

        let result = backend.execute(&corpus.dataset, &statement).unwrap();
        assert_eq!(result.columns, vec!["note_id", "subject_id", "note_length"]);
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.value(0, "note_id").and_then(CellValue::as_text),
            Some("10000032-DS-21")
        );
        assert_eq!(
            result.value(0, "subject_id").and_then(CellValue::as_i64),
            Some(10000032)
        );
    }

    #[test]
    fn test_quotes_in_parameters_are_data() {
        let corpus = NoteCorpus::new();
        let backend = DuckDbBackend::new();

        let statement =
            Statement::new("SELECT count(*) AS n FROM discharge WHERE note_id = ?").bind_text("x' OR '1'='1");
        let result = backend.execute(&corpus.dataset, &statement).unwrap();
        assert_eq!(result.value(0, "n").and_then(CellValue::as_i64), Some(0));
    }

    #[test]
    fn test_connection_is_read_only() {
        let corpus = NoteCorpus::new();
        let backend = DuckDbBackend::new();

        let result = backend.execute(
            &corpus.dataset,
            &Statement::new("DELETE FROM discharge"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_syntax_errors_are_query_errors() {
        let corpus = NoteCorpus::new();
        let backend = DuckDbBackend::new();

        let result = backend.execute(&corpus.dataset, &Statement::new("SELEC nonsense"));
        assert!(matches!(result, Err(NotegateError::Query(_))));
    }

    #[test]
    fn test_backend_info_names_dataset_and_file() {
        let corpus = NoteCorpus::new();
        let info = DuckDbBackend::new().backend_info(&corpus.dataset);
        assert!(info.contains("DuckDB"));
        assert!(info.contains(&corpus.dataset.name));
        assert!(info.contains(&corpus.dataset.database.display().to_string()));
    }
}

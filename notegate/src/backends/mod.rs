//! Query backend contract
//!
//! Engines hand a [`Statement`] and a dataset to a [`QueryBackend`] and get
//! back a [`QueryResult`] or an error. The engine behind the trait is opaque to
//! callers; [`duckdb::DuckDbBackend`] is the shipped implementation.

use crate::datasets::DatasetDefinition;
use crate::error::Result;
use std::fmt;
use tabled::{builder::Builder, settings::Style};

pub mod duckdb;

pub use self::duckdb::DuckDbBackend;

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Text(text) => f.write_str(&quote_literal(text)),
            Param::Int(value) => write!(f, "{value}"),
        }
    }
}

/// A parameterized SQL statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with `?` placeholders
    pub sql: String,
    /// Values for the placeholders, in order
    pub params: Vec<Param>,
}

impl Statement {
    /// Statement without parameters
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Bind a text parameter
    pub fn bind_text(mut self, value: impl Into<String>) -> Self {
        self.params.push(Param::Text(value.into()));
        self
    }

    /// Bind an integer parameter
    pub fn bind_int(mut self, value: i64) -> Self {
        self.params.push(Param::Int(value));
        self
    }

    /// Render with parameters substituted inline, for logs only.
    ///
    /// Placeholders are matched positionally; a `?` inside a string literal of
    /// the SQL text would be substituted too.
    pub fn to_inline_sql(&self) -> String {
        let mut rendered = String::with_capacity(self.sql.len());
        let mut params = self.params.iter().peekable();
        for ch in self.sql.chars() {
            match (ch, params.next_if(|_| ch == '?')) {
                (_, Some(param)) => rendered.push_str(&param.to_string()),
                (ch, None) => rendered.push(ch),
            }
        }
        rendered
    }
}

/// Quote a string as a SQL literal by doubling single quotes.
///
/// This keeps rendered SQL syntactically valid. It is not an injection
/// defence; values that reach a backend are bound as parameters.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// A single cell of a query result
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// Any integer type
    Int(i64),
    /// Any floating point or decimal type
    Float(f64),
    /// Text and everything rendered as text
    Text(String),
}

impl CellValue {
    /// Borrow the text content, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integer content, if this is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Bool(value) => write!(f, "{value}"),
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value}"),
            CellValue::Text(text) => f.write_str(text),
        }
    }
}

/// Tabular output of a statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column names in select order
    pub columns: Vec<String>,
    /// Rows, each with one cell per column
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    /// Whether the result has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column, matched case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// Cell at `row` in the named column
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Keep at most `max_rows` rows; returns whether rows were dropped
    pub fn truncate(&mut self, max_rows: usize) -> bool {
        let dropped = self.rows.len() > max_rows;
        self.rows.truncate(max_rows);
        dropped
    }

    /// Render as a text table with a header row
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(|cell| cell.to_string()));
        }
        builder.build().with(Style::psql()).to_string()
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Executes statements against the database behind a dataset
pub trait QueryBackend: Send + Sync {
    /// Run a statement; failures are returned, never panicked
    fn execute(&self, dataset: &DatasetDefinition, statement: &Statement) -> Result<QueryResult>;

    /// One or more lines describing where queries for `dataset` run
    fn backend_info(&self, dataset: &DatasetDefinition) -> String;
}

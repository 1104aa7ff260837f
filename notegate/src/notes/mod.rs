//! Clinical notes search and retrieval
//!
//! Notes live in one table per clinical type. Every operation resolves the
//! tables it needs, runs one statement per table through a [`QueryBackend`]
//! and merges the answers into a single bounded text response. A failing table
//! is reported inline and never hides the others.
//!
//! Operations assume the caller already ran the capability guard; they only
//! validate their own parameters.

use crate::backends::QueryBackend;
use crate::error::{NotegateError, Result};
use crate::output::ToolOutput;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod patient;
pub mod query;
mod retrieve;
mod search;

pub use retrieve::TRUNCATION_MARKER;

/// Characters of note text shown in a patient listing preview
pub const PREVIEW_LENGTH: usize = 100;

/// Tip appended to every successful search or listing
pub const GET_NOTE_TIP: &str =
    "**Tip:** Use `get_note(note_id)` to retrieve full text of a specific note.";

/// A table holding one clinical type of note
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NoteTable {
    /// Discharge summaries
    Discharge,
    /// Radiology reports
    Radiology,
}

impl NoteTable {
    /// Every note table in reporting order
    pub const ALL: [NoteTable; 2] = [NoteTable::Discharge, NoteTable::Radiology];

    /// SQL table name
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTable::Discharge => "discharge",
            NoteTable::Radiology => "radiology",
        }
    }

    /// Section label used in responses
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for NoteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which note tables an operation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteType {
    /// Only discharge summaries
    Discharge,
    /// Only radiology reports
    Radiology,
    /// Every note table
    All,
}

impl NoteType {
    /// Tables covered by this selector, in reporting order
    pub fn tables(&self) -> &'static [NoteTable] {
        match self {
            NoteType::Discharge => &[NoteTable::Discharge],
            NoteType::Radiology => &[NoteTable::Radiology],
            NoteType::All => &NoteTable::ALL,
        }
    }
}

impl FromStr for NoteType {
    type Err = NotegateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "discharge" => Ok(NoteType::Discharge),
            "radiology" => Ok(NoteType::Radiology),
            "all" => Ok(NoteType::All),
            _ => Err(NotegateError::InvalidArgument(invalid_note_type_message(s))),
        }
    }
}

fn invalid_note_type_message(value: &str) -> String {
    format!("**Error:** Invalid note_type '{value}'. Use 'discharge', 'radiology', or 'all'.")
}

fn default_note_type() -> String {
    "all".to_string()
}

fn default_search_limit() -> usize {
    5
}

fn default_snippet_length() -> usize {
    300
}

fn default_list_limit() -> usize {
    20
}

/// Keyword search across note tables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SearchNotesRequest {
    /// Search term to find in notes (case-insensitive substring)
    pub query: String,
    /// 'discharge', 'radiology', or 'all'
    #[serde(default = "default_note_type")]
    pub note_type: String,
    /// Maximum number of results per note type
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    /// Characters of context around each match
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,
}

impl SearchNotesRequest {
    /// Request with default selector and bounds
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            note_type: default_note_type(),
            limit: default_search_limit(),
            snippet_length: default_snippet_length(),
        }
    }
}

/// Retrieve one note by identifier
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct GetNoteRequest {
    /// Note identifier, e.g. from search_notes or list_patient_notes
    pub note_id: String,
    /// Optional maximum number of characters to return
    #[serde(default)]
    pub max_length: Option<usize>,
}

impl GetNoteRequest {
    /// Request for the full text of a note
    pub fn new(note_id: impl Into<String>) -> Self {
        Self {
            note_id: note_id.into(),
            max_length: None,
        }
    }
}

/// List note metadata for one patient
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ListPatientNotesRequest {
    /// Patient identifier
    pub subject_id: i64,
    /// 'discharge', 'radiology', or 'all'
    #[serde(default = "default_note_type")]
    pub note_type: String,
    /// Maximum notes to return per note type
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

impl ListPatientNotesRequest {
    /// Request with default selector and limit
    pub fn new(subject_id: i64) -> Self {
        Self {
            subject_id,
            note_type: default_note_type(),
            limit: default_list_limit(),
        }
    }
}

/// Runs note operations against a backend
#[derive(Clone)]
pub struct NoteEngine {
    backend: Arc<dyn QueryBackend>,
}

impl fmt::Debug for NoteEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteEngine").finish_non_exhaustive()
    }
}

impl NoteEngine {
    /// Create an engine over `backend`
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self { backend }
    }
}

/// Largest bound accepted for `limit`, `snippet_length` and `max_length`;
/// bounds are spliced into SQL as BIGINT literals
pub const MAX_BOUND: usize = i64::MAX as usize;

/// Reject a zero or out-of-range bound with an invalid-input response
fn require_positive(info: &str, name: &str, value: usize) -> std::result::Result<(), ToolOutput> {
    if value == 0 {
        return Err(ToolOutput::error(format!(
            "{info}\n**Error:** {name} must be a positive integer."
        )));
    }
    if value > MAX_BOUND {
        return Err(ToolOutput::error(format!(
            "{info}\n**Error:** {name} must not exceed {MAX_BOUND}."
        )));
    }
    Ok(())
}

/// Resolve a selector or produce the invalid-input response
fn resolve_tables(
    info: &str,
    note_type: &str,
) -> std::result::Result<&'static [NoteTable], ToolOutput> {
    note_type
        .parse::<NoteType>()
        .map(|selector| selector.tables())
        .map_err(|_| ToolOutput::error(format!("{info}\n{}", invalid_note_type_message(note_type))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_selector_resolves_tables_in_order() {
        assert_eq!(
            "discharge".parse::<NoteType>().unwrap().tables(),
            &[NoteTable::Discharge]
        );
        assert_eq!(
            "radiology".parse::<NoteType>().unwrap().tables(),
            &[NoteTable::Radiology]
        );
        assert_eq!(
            "ALL".parse::<NoteType>().unwrap().tables(),
            &[NoteTable::Discharge, NoteTable::Radiology]
        );
    }

    #[test]
    fn test_invalid_selector_message_lists_accepted_values() {
        let err = "nursing".parse::<NoteType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: **Error:** Invalid note_type 'nursing'. Use 'discharge', 'radiology', or 'all'."
        );
    }

    #[test]
    fn test_request_defaults() {
        let search: SearchNotesRequest =
            serde_json::from_value(serde_json::json!({"query": "sepsis"})).unwrap();
        assert_eq!(search, SearchNotesRequest::new("sepsis"));
        assert_eq!(search.limit, 5);
        assert_eq!(search.snippet_length, 300);
        assert_eq!(search.note_type, "all");

        let list: ListPatientNotesRequest =
            serde_json::from_value(serde_json::json!({"subject_id": 10000032})).unwrap();
        assert_eq!(list.limit, 20);

        let get: GetNoteRequest =
            serde_json::from_value(serde_json::json!({"note_id": "x", "max_length": 50})).unwrap();
        assert_eq!(get.max_length, Some(50));
    }

    #[test]
    fn test_negative_bounds_do_not_deserialize() {
        let result: std::result::Result<SearchNotesRequest, _> =
            serde_json::from_value(serde_json::json!({"query": "x", "limit": -1}));
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn unknown_selectors_are_rejected(value in "[a-z]{1,12}") {
            prop_assume!(!["discharge", "radiology", "all"].contains(&value.as_str()));
            prop_assert!(value.parse::<NoteType>().is_err());
        }

        #[test]
        fn selector_parsing_ignores_case(mask in proptest::collection::vec(any::<bool>(), 9)) {
            let raw: String = "radiology"
                .chars()
                .zip(mask)
                .map(|(ch, upper)| if upper { ch.to_ascii_uppercase() } else { ch })
                .collect();
            prop_assert_eq!(raw.parse::<NoteType>().unwrap(), NoteType::Radiology);
        }
    }
}

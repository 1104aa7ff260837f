//! Shared fixtures for unit tests

use crate::backends::{DuckDbBackend, QueryBackend, QueryResult, Statement};
use crate::datasets::{DatasetDefinition, Modality};
use crate::error::{NotegateError, Result};
use duckdb::{params, Connection};
use tempfile::TempDir;

/// Subject with notes in both tables
pub const SUBJECT_WITH_NOTES: i64 = 10000032;

/// Subject that appears in no table
pub const UNKNOWN_SUBJECT: i64 = 999999999;

/// Discharge note exactly [`LONG_NOTE_LENGTH`] characters long
pub const LONG_NOTE_ID: &str = "10000032-DS-22";

/// Length of the note behind [`LONG_NOTE_ID`]
pub const LONG_NOTE_LENGTH: usize = 200;

/// Text of [`LONG_NOTE_ID`]
pub fn long_note_text() -> String {
    "Follow-up: wound healing well, sutures removed, no signs of infection. "
        .chars()
        .cycle()
        .take(LONG_NOTE_LENGTH)
        .collect()
}

const DISCHARGE_NOTES: &[(&str, i64, &str)] = &[
    (
        "10000032-DS-21",
        10000032,
        "Discharge summary. Admitted with community acquired Pneumonia. \
         Treated with ceftriaxone and azithromycin. Chest x-ray showed right lower lobe consolidation. \
         Discharged home in stable condition.",
    ),
    (
        "10000084-DS-17",
        10000084,
        "Discharge summary. Elective hip replacement, uncomplicated course. The patient's daughter \
         will assist at home. Follow up with orthopedics in two weeks.",
    ),
];

const RADIOLOGY_NOTES: &[(&str, i64, &str)] = &[
    (
        "10000032-RR-14",
        10000032,
        "CHEST PA AND LATERAL. Findings: patchy opacity in the right lower lobe concerning for pneumonia. \
         No pleural effusion.",
    ),
    (
        "10000117-RR-3",
        10000117,
        "CT HEAD WITHOUT CONTRAST. No acute intracranial process. Target sign absent.",
    ),
];

/// Temporary DuckDB file seeded with `discharge`, `radiology` and `patients`
pub struct NoteCorpus {
    _dir: TempDir,
    /// Dataset pointing at the seeded file
    pub dataset: DatasetDefinition,
}

impl NoteCorpus {
    /// Seed a fresh corpus
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("notes.duckdb");
        seed_database(&path);

        Self {
            _dir: dir,
            dataset: DatasetDefinition::new("test-notes", [Modality::Notes, Modality::Tabular], path),
        }
    }
}

/// Write the fixture tables into a DuckDB file
pub fn seed_database(path: &std::path::Path) {
    let conn = Connection::open(path).expect("open fixture database");
    conn.execute_batch(
        "CREATE TABLE discharge (note_id VARCHAR, subject_id BIGINT, text VARCHAR);
         CREATE TABLE radiology (note_id VARCHAR, subject_id BIGINT, text VARCHAR);
         CREATE TABLE patients (subject_id BIGINT, gender VARCHAR, anchor_age INTEGER);
         INSERT INTO patients VALUES (10000032, 'F', 52), (10000084, 'M', 72), (10000117, 'F', 48);",
    )
    .expect("create fixture tables");

    for &(note_id, subject_id, text) in DISCHARGE_NOTES {
        conn.execute(
            "INSERT INTO discharge VALUES (?, ?, ?)",
            params![note_id, subject_id, text],
        )
        .expect("insert discharge note");
    }
    conn.execute(
        "INSERT INTO discharge VALUES (?, ?, ?)",
        params![LONG_NOTE_ID, SUBJECT_WITH_NOTES, long_note_text()],
    )
    .expect("insert long discharge note");

    for &(note_id, subject_id, text) in RADIOLOGY_NOTES {
        conn.execute(
            "INSERT INTO radiology VALUES (?, ?, ?)",
            params![note_id, subject_id, text],
        )
        .expect("insert radiology note");
    }
}

/// Backend that fails every statement reading from one table
pub struct FailingTableBackend {
    inner: DuckDbBackend,
    table: &'static str,
}

impl FailingTableBackend {
    /// Fail statements that read `FROM <table>`
    pub fn new(table: &'static str) -> Self {
        Self {
            inner: DuckDbBackend::new(),
            table,
        }
    }
}

impl QueryBackend for FailingTableBackend {
    fn execute(&self, dataset: &DatasetDefinition, statement: &Statement) -> Result<QueryResult> {
        if statement.sql.contains(&format!("FROM {}", self.table)) {
            return Err(NotegateError::Query(format!(
                "Catalog Error: Table with name {} does not exist!",
                self.table
            )));
        }
        self.inner.execute(dataset, statement)
    }

    fn backend_info(&self, dataset: &DatasetDefinition) -> String {
        self.inner.backend_info(dataset)
    }
}

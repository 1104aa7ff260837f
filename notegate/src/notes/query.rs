//! Statement builders for the note tables
//!
//! String inputs are always bound as parameters. Table names come from
//! [`NoteTable`] and integers from typed values, so nothing caller-supplied is
//! spliced into SQL text.

use super::{NoteTable, PREVIEW_LENGTH};
use crate::backends::Statement;

/// Rows whose text contains `query` (case-insensitive), with a snippet around
/// the first match.
///
/// The snippet starts `snippet_length / 2` characters before the match (never
/// before the start of the text) and is at most `snippet_length` characters
/// long. Without a match it is the first `snippet_length` characters.
pub fn search_statement(
    table: NoteTable,
    query: &str,
    limit: usize,
    snippet_length: usize,
) -> Statement {
    let half = snippet_length / 2;
    let sql = format!(
        "SELECT
            note_id,
            subject_id,
            CASE
                WHEN strpos(lower(text), lower(?)) > 0 THEN
                    substring(text, greatest(1, strpos(lower(text), lower(?)) - {half}), {snippet_length})
                ELSE left(text, {snippet_length})
            END AS snippet,
            length(text) AS note_length
        FROM {table}
        WHERE contains(lower(text), lower(?))
        LIMIT {limit}",
        table = table.as_str(),
    );

    Statement::new(sql)
        .bind_text(query)
        .bind_text(query)
        .bind_text(query)
}

/// The row with exactly `note_id`, including full text
pub fn note_statement(table: NoteTable, note_id: &str) -> Statement {
    let sql = format!(
        "SELECT
            note_id,
            subject_id,
            text,
            length(text) AS note_length
        FROM {table}
        WHERE note_id = ?
        LIMIT 1",
        table = table.as_str(),
    );

    Statement::new(sql).bind_text(note_id)
}

/// Note metadata for one patient with a fixed-length preview, never full text
pub fn patient_notes_statement(table: NoteTable, subject_id: i64, limit: usize) -> Statement {
    let sql = format!(
        "SELECT
            note_id,
            subject_id,
            '{table}' AS note_type,
            length(text) AS note_length,
            left(text, {PREVIEW_LENGTH}) AS preview
        FROM {table}
        WHERE subject_id = ?
        LIMIT {limit}",
        table = table.as_str(),
    );

    Statement::new(sql).bind_int(subject_id)
}

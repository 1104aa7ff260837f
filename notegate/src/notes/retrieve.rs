use super::query::note_statement;
use super::{require_positive, NoteEngine, NoteTable, GetNoteRequest};
use crate::backends::{CellValue, QueryResult};
use crate::datasets::DatasetDefinition;
use crate::error::ErrorChainExt;
use crate::output::ToolOutput;

/// Marker appended after truncated note text
pub const TRUNCATION_MARKER: &str = "[...truncated...]";

impl NoteEngine {
    /// Retrieve one note, optionally truncated to `max_length` characters.
    ///
    /// Tables are tried in fixed order and the first hit wins; a failing
    /// table is skipped.
    pub fn get(&self, dataset: &DatasetDefinition, request: &GetNoteRequest) -> ToolOutput {
        let info = self.backend.backend_info(dataset);

        if let Some(max_length) = request.max_length {
            if let Err(output) = require_positive(&info, "max_length", max_length) {
                return output;
            }
        }

        for table in NoteTable::ALL {
            let statement = note_statement(table, &request.note_id);
            match self.backend.execute(dataset, &statement) {
                Ok(result) if result.is_empty() => continue,
                Ok(result) => return render_note(&info, table, &result, request.max_length),
                Err(e) => {
                    tracing::warn!("get_note lookup failed on {}: {}", table, e.error_chain());
                    continue;
                }
            }
        }

        ToolOutput::success(format!(
            "{info}\n**Error:** Note '{}' not found. Use `list_patient_notes(subject_id)` or \
             `search_notes(query)` to find valid note IDs.",
            request.note_id
        ))
    }
}

fn render_note(
    info: &str,
    table: NoteTable,
    result: &QueryResult,
    max_length: Option<usize>,
) -> ToolOutput {
    let cell = |column: &str| result.value(0, column).cloned().unwrap_or(CellValue::Null);
    let text = match cell("text") {
        CellValue::Text(text) => text,
        CellValue::Null => String::new(),
        other => other.to_string(),
    };
    let header = format!(
        "**Note:** {} | {} | subject_id {} | {} chars",
        cell("note_id"),
        table,
        cell("subject_id"),
        cell("note_length")
    );

    match max_length {
        Some(max_length) if text.chars().count() > max_length => {
            let truncated: String = text.chars().take(max_length).collect();
            ToolOutput::success(format!(
                "{info}\n{header}\n**Note (truncated to {max_length} chars):**\n{truncated}\n\n{TRUNCATION_MARKER}"
            ))
        }
        _ => ToolOutput::success(format!("{info}\n{header}\n\n{text}")),
    }
}

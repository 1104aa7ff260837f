use super::query::search_statement;
use super::{require_positive, resolve_tables, NoteEngine, SearchNotesRequest, GET_NOTE_TIP};
use crate::datasets::DatasetDefinition;
use crate::error::ErrorChainExt;
use crate::output::ToolOutput;

impl NoteEngine {
    /// Keyword search returning snippets instead of full notes
    pub fn search(&self, dataset: &DatasetDefinition, request: &SearchNotesRequest) -> ToolOutput {
        let info = self.backend.backend_info(dataset);

        let tables = match resolve_tables(&info, &request.note_type) {
            Ok(tables) => tables,
            Err(output) => return output,
        };
        if let Err(output) = require_positive(&info, "limit", request.limit)
            .and_then(|_| require_positive(&info, "snippet_length", request.snippet_length))
        {
            return output;
        }
        if request.query.trim().is_empty() {
            return ToolOutput::error(format!("{info}\n**Error:** query must not be empty."));
        }

        let mut sections = String::new();
        for table in tables {
            let statement =
                search_statement(*table, &request.query, request.limit, request.snippet_length);
            match self.backend.execute(dataset, &statement) {
                Ok(result) if result.is_empty() => {}
                Ok(result) => {
                    sections.push_str(&format!("\n**{}:**\n{}", table.label(), result.render()));
                }
                Err(e) => {
                    tracing::warn!("search_notes failed on {}: {}", table, e.error_chain());
                    sections.push_str(&format!(
                        "\n**{}:** Error - {}",
                        table.label(),
                        e.error_chain()
                    ));
                }
            }
        }

        if sections.is_empty() {
            let searched = tables
                .iter()
                .map(|table| table.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return ToolOutput::success(format!(
                "{info}\n**No matches found** for '{}' in {searched}.",
                request.query
            ));
        }

        ToolOutput::success(format!(
            "{info}\n**Search:** '{}' (showing snippets of ~{} chars)\n{sections}\n\n{GET_NOTE_TIP}",
            request.query, request.snippet_length
        ))
    }
}

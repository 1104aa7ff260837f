use super::query::patient_notes_statement;
use super::{
    require_positive, resolve_tables, ListPatientNotesRequest, NoteEngine, GET_NOTE_TIP,
};
use crate::datasets::DatasetDefinition;
use crate::error::ErrorChainExt;
use crate::output::ToolOutput;

impl NoteEngine {
    /// List note metadata for a patient without returning full text
    pub fn list_patient_notes(
        &self,
        dataset: &DatasetDefinition,
        request: &ListPatientNotesRequest,
    ) -> ToolOutput {
        let info = self.backend.backend_info(dataset);

        let tables = match resolve_tables(&info, &request.note_type) {
            Ok(tables) => tables,
            Err(output) => return output,
        };
        if let Err(output) = require_positive(&info, "limit", request.limit) {
            return output;
        }

        let mut sections = String::new();
        for table in tables {
            let statement = patient_notes_statement(*table, request.subject_id, request.limit);
            match self.backend.execute(dataset, &statement) {
                Ok(result) if result.is_empty() => {}
                Ok(result) => {
                    sections.push_str(&format!(
                        "\n**{} NOTES:**\n{}",
                        table.label(),
                        result.render()
                    ));
                }
                Err(e) => {
                    tracing::warn!("list_patient_notes failed on {}: {}", table, e.error_chain());
                    sections.push_str(&format!(
                        "\n**{}:** Error - {}",
                        table.label(),
                        e.error_chain()
                    ));
                }
            }
        }

        if sections.is_empty() {
            return ToolOutput::success(format!(
                "{info}\n**No notes found** for subject_id {}.\n\n\
                 **Tip:** Verify the subject_id exists in the related tabular dataset.",
                request.subject_id
            ));
        }

        ToolOutput::success(format!(
            "{info}\n**Notes for subject_id {}:**\n{sections}\n\n{GET_NOTE_TIP}",
            request.subject_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::DuckDbBackend;
    use crate::test_utils::{
        long_note_text, FailingTableBackend, NoteCorpus, SUBJECT_WITH_NOTES, UNKNOWN_SUBJECT,
    };
    use std::sync::Arc;

    fn engine() -> NoteEngine {
        NoteEngine::new(Arc::new(DuckDbBackend::new()))
    }

    #[test]
    fn test_lists_notes_from_every_table() {
        let corpus = NoteCorpus::new();
        let output = engine().list_patient_notes(
            &corpus.dataset,
            &ListPatientNotesRequest::new(SUBJECT_WITH_NOTES),
        );

        assert!(!output.is_error);
        assert!(output.result.contains("**Notes for subject_id 10000032:**"));
        assert!(output.result.contains("**DISCHARGE NOTES:**"));
        assert!(output.result.contains("**RADIOLOGY NOTES:**"));
        assert!(output.result.contains("10000032-DS-21"));
        assert!(output.result.contains("10000032-RR-14"));
        assert!(!output.result.contains("10000084-DS-17"));
    }

    #[test]
    fn test_preview_is_fixed_length() {
        let corpus = NoteCorpus::new();
        let mut request = ListPatientNotesRequest::new(SUBJECT_WITH_NOTES);
        request.note_type = "discharge".to_string();

        let output = engine().list_patient_notes(&corpus.dataset, &request);
        let text = long_note_text();
        assert!(output.result.contains(&text[..100]));
        assert!(!output.result.contains(&text[..101]));
        assert!(!output.result.contains("RADIOLOGY"));
    }

    #[test]
    fn test_limit_caps_rows_per_table() {
        let corpus = NoteCorpus::new();
        let mut request = ListPatientNotesRequest::new(SUBJECT_WITH_NOTES);
        request.note_type = "discharge".to_string();
        request.limit = 1;

        let output = engine().list_patient_notes(&corpus.dataset, &request);
        let hits = ["10000032-DS-21", "10000032-DS-22"]
            .iter()
            .filter(|id| output.result.contains(*id))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_oversized_limit_is_invalid_input() {
        let corpus = NoteCorpus::new();
        let mut request = ListPatientNotesRequest::new(SUBJECT_WITH_NOTES);
        request.limit = usize::MAX;

        let output = engine().list_patient_notes(&corpus.dataset, &request);
        assert!(output.is_error);
        assert!(output.result.contains("limit must not exceed"));
        assert!(!output.result.contains("NOTES:**"));
    }

    #[test]
    fn test_unknown_subject_reports_no_notes() {
        let corpus = NoteCorpus::new();
        let output = engine().list_patient_notes(
            &corpus.dataset,
            &ListPatientNotesRequest::new(UNKNOWN_SUBJECT),
        );

        assert!(!output.is_error);
        assert!(output
            .result
            .contains("**No notes found** for subject_id 999999999."));
        assert!(output.result.contains("Verify the subject_id"));
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let corpus = NoteCorpus::new();
        let mut request = ListPatientNotesRequest::new(SUBJECT_WITH_NOTES);
        request.note_type = "echo".to_string();

        let output = engine().list_patient_notes(&corpus.dataset, &request);
        assert!(output.is_error);
        assert!(output.result.contains("Invalid note_type 'echo'"));
    }

    #[test]
    fn test_failing_table_is_reported_inline() {
        let corpus = NoteCorpus::new();
        let engine = NoteEngine::new(Arc::new(FailingTableBackend::new("discharge")));

        let output = engine.list_patient_notes(
            &corpus.dataset,
            &ListPatientNotesRequest::new(SUBJECT_WITH_NOTES),
        );
        assert!(output.result.contains("**DISCHARGE:** Error - "));
        assert!(output.result.contains("**RADIOLOGY NOTES:**"));
        assert!(output.result.contains("10000032-RR-14"));
    }
}

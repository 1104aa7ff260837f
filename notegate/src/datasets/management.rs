//! `list_datasets` and `set_dataset`

use super::{format_modalities, DatasetRegistry};
use crate::capabilities::{supported_tools_snapshot, ToolDescriptor};
use crate::output::ToolOutput;
use serde::{Deserialize, Serialize};

/// List every registered dataset
#[derive(Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema)]
pub struct ListDatasetsRequest {}

/// Switch the active dataset
#[derive(Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SetDatasetRequest {
    /// Name of the dataset to switch to, e.g. 'mimic-iv-note'
    pub dataset_name: String,
}

impl DatasetRegistry {
    /// Every dataset with its modalities, database status and the active marker
    pub fn list_datasets(&self) -> ToolOutput {
        let active = self.active_name();
        let mut output = String::from("**Available datasets:**\n");

        for dataset in self.list() {
            let marker = if dataset.name == active { " (active)" } else { "" };
            let status = if dataset.database_exists() {
                "available"
            } else {
                "database missing"
            };
            output.push_str(&format!(
                "\n- **{}**{marker}: {} | modalities: {} | {status}",
                dataset.name,
                if dataset.description.is_empty() {
                    "no description"
                } else {
                    dataset.description.as_str()
                },
                format_modalities(&dataset.modalities),
            ));
        }

        output.push_str(&format!(
            "\n\n**Active dataset:** {active}\n\n\
             **Tip:** Use `set_dataset(dataset_name)` to switch datasets."
        ));
        ToolOutput::success(output)
    }

    /// Switch the active dataset and report which tools it supports
    pub fn switch_dataset(&self, request: &SetDatasetRequest, tools: &[ToolDescriptor]) -> ToolOutput {
        match self.set_active(&request.dataset_name) {
            Ok(dataset) => {
                let mut output = format!(
                    "**Active dataset switched to:** {} ({})",
                    dataset.name,
                    format_modalities(&dataset.modalities)
                );
                if !dataset.database_exists() {
                    output.push_str(&format!(
                        "\n\n**Warning:** database file {} does not exist yet.",
                        dataset.database.display()
                    ));
                }
                ToolOutput::success(output).append(&supported_tools_snapshot(tools, &dataset))
            }
            Err(_) => ToolOutput::error(format!(
                "**Error:** Dataset '{}' not found. Available datasets: {}",
                request.dataset_name,
                self.names().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::datasets::Modality;
    use std::path::Path;

    fn registry() -> DatasetRegistry {
        let config = Config {
            data_dir: Path::new("/nonexistent/notegate").to_path_buf(),
            ..Config::default()
        };
        DatasetRegistry::from_config(&config).unwrap()
    }

    fn tools() -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new("search_notes", [Modality::Notes]),
            ToolDescriptor::new("execute_query", [Modality::Tabular]),
        ]
    }

    #[test]
    fn test_list_marks_active_dataset() {
        let output = registry().list_datasets();
        assert!(output.result.contains("- **mimic-iv-demo** (active)"));
        assert!(output.result.contains("modalities: notes, tabular"));
        assert!(output.result.contains("database missing"));
        assert!(output.result.contains("**Active dataset:** mimic-iv-demo"));
    }

    #[test]
    fn test_switch_appends_tool_snapshot() {
        let registry = registry();
        let request = SetDatasetRequest {
            dataset_name: "MIMIC-IV-NOTE".to_string(),
        };
        let output = registry.switch_dataset(&request, &tools());

        assert!(!output.is_error);
        assert!(output.result.contains("**Active dataset switched to:** mimic-iv-note"));
        assert!(output
            .result
            .contains("**Supported tools for mimic-iv-note:** execute_query, search_notes"));
        assert_eq!(registry.active_name(), "mimic-iv-note");
    }

    #[test]
    fn test_switch_to_unknown_dataset_keeps_selection() {
        let registry = registry();
        let request = SetDatasetRequest {
            dataset_name: "eicu".to_string(),
        };
        let output = registry.switch_dataset(&request, &tools());

        assert!(output.is_error);
        assert!(output.result.contains("Dataset 'eicu' not found"));
        assert!(output.result.contains("mimic-iv-note"));
        assert!(!output.result.contains("Supported tools"));
        assert_eq!(registry.active_name(), "mimic-iv-demo");
    }
}

//! Capability gate between tools and datasets
//!
//! Every tool carries a [`ToolDescriptor`] naming the modalities it needs.
//! [`check_compatibility`] is a pure predicate over a (tool, dataset) pair and
//! [`guard`] turns its answer into the decision a caller acts on before any
//! query runs.

use crate::datasets::{format_modalities, DatasetDefinition, Modality};
use crate::output::ToolOutput;
use std::collections::BTreeSet;
use std::fmt;

/// Static requirements of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    /// Tool name as exposed to callers
    pub name: String,
    /// Every one of these must be exposed by the dataset
    pub required_modalities: BTreeSet<Modality>,
    /// Optional allow-list of dataset names
    pub supported_datasets: Option<BTreeSet<String>>,
}

impl ToolDescriptor {
    /// Descriptor requiring the given modalities on any dataset
    pub fn new<I>(name: &str, required_modalities: I) -> Self
    where
        I: IntoIterator<Item = Modality>,
    {
        Self {
            name: name.to_string(),
            required_modalities: required_modalities.into_iter().collect(),
            supported_datasets: None,
        }
    }

    /// Restrict the tool to the named datasets
    pub fn restricted_to<I, S>(mut self, datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.supported_datasets = Some(
            datasets
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        );
        self
    }
}

/// Why a tool cannot run against a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incompatibility {
    /// The dataset is not on the tool's allow-list
    DatasetNotSupported {
        /// Datasets the tool accepts
        supported: BTreeSet<String>,
    },
    /// The dataset lacks modalities the tool needs
    MissingModalities(BTreeSet<Modality>),
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Incompatibility::DatasetNotSupported { supported } => write!(
                f,
                "dataset is not supported (supported datasets: {})",
                supported.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
            Incompatibility::MissingModalities(missing) => {
                write!(f, "missing modalities: {}", format_modalities(missing))
            }
        }
    }
}

/// Result of the capability gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// The tool may run
    Compatible,
    /// The tool may not run
    Incompatible(Incompatibility),
}

impl Compatibility {
    /// Whether the tool may run
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }
}

/// Decide whether `tool` may run against `dataset`
pub fn check_compatibility(tool: &ToolDescriptor, dataset: &DatasetDefinition) -> Compatibility {
    if let Some(supported) = &tool.supported_datasets {
        if !supported.contains(&dataset.name) {
            return Compatibility::Incompatible(Incompatibility::DatasetNotSupported {
                supported: supported.clone(),
            });
        }
    }

    let missing: BTreeSet<Modality> = tool
        .required_modalities
        .difference(&dataset.modalities)
        .copied()
        .collect();
    if !missing.is_empty() {
        return Compatibility::Incompatible(Incompatibility::MissingModalities(missing));
    }

    Compatibility::Compatible
}

/// Pre-call decision composed by every entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Invoke the tool
    Proceed,
    /// Return this output without invoking the tool
    Respond(ToolOutput),
}

/// Run the capability gate and render an incompatibility as the terminal output
pub fn guard(tool: &ToolDescriptor, dataset: &DatasetDefinition) -> Guard {
    match check_compatibility(tool, dataset) {
        Compatibility::Compatible => Guard::Proceed,
        Compatibility::Incompatible(reason) => {
            tracing::debug!(
                "Tool '{}' blocked on dataset '{}': {}",
                tool.name,
                dataset.name,
                reason
            );
            Guard::Respond(ToolOutput::error(incompatibility_message(
                tool, dataset, &reason,
            )))
        }
    }
}

fn incompatibility_message(
    tool: &ToolDescriptor,
    dataset: &DatasetDefinition,
    reason: &Incompatibility,
) -> String {
    let detail = match reason {
        Incompatibility::DatasetNotSupported { supported } => format!(
            "This tool only supports: {}",
            supported.iter().cloned().collect::<Vec<_>>().join(", ")
        ),
        Incompatibility::MissingModalities(_) => format!(
            "This tool requires: {}\nDataset provides: {}",
            format_modalities(&tool.required_modalities),
            format_modalities(&dataset.modalities)
        ),
    };

    format!(
        "**Error:** Tool `{}` is not available for dataset '{}'.\n\n{}\n\n\
         **Tip:** Use `list_datasets()` to see available datasets and \
         `set_dataset(dataset_name)` to switch to a compatible one.",
        tool.name, dataset.name, detail
    )
}

/// Summary of which tools can run on `dataset`, appended after a dataset switch
pub fn supported_tools_snapshot<'a, I>(tools: I, dataset: &DatasetDefinition) -> String
where
    I: IntoIterator<Item = &'a ToolDescriptor>,
{
    let mut available = Vec::new();
    let mut unavailable = Vec::new();
    for tool in tools {
        match check_compatibility(tool, dataset) {
            Compatibility::Compatible => available.push(tool.name.as_str()),
            Compatibility::Incompatible(_) => unavailable.push(tool.name.as_str()),
        }
    }
    available.sort_unstable();
    unavailable.sort_unstable();

    let mut snapshot = format!(
        "\n\n**Supported tools for {}:** {}",
        dataset.name,
        if available.is_empty() {
            "none".to_string()
        } else {
            available.join(", ")
        }
    );
    if !unavailable.is_empty() {
        snapshot.push_str(&format!("\n**Unavailable:** {}", unavailable.join(", ")));
    }
    snapshot
}

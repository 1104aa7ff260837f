//! Dataset descriptors and the process-wide dataset registry
//!
//! A dataset is a named DuckDB database exposing one or more [`Modality`]
//! values. The registry owns every descriptor and the active selection; callers
//! resolve the active descriptor once per call and pass it down explicitly.

use crate::config::Config;
use crate::error::{NotegateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

mod management;

pub use management::{ListDatasetsRequest, SetDatasetRequest};

/// A capability a dataset may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Free-text clinical notes (`discharge`, `radiology` tables)
    Notes,
    /// Structured tables queried with SQL
    Tabular,
}

impl Modality {
    /// Lower-case tag used in configuration and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Notes => "notes",
            Modality::Tabular => "tabular",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join a modality set as `notes, tabular`
pub fn format_modalities<'a, I>(modalities: I) -> String
where
    I: IntoIterator<Item = &'a Modality>,
{
    modalities
        .into_iter()
        .map(Modality::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Static description of a dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDefinition {
    /// Unique, lower-case name
    pub name: String,
    /// Short human-readable description
    pub description: String,
    /// Modalities exposed by the dataset
    pub modalities: BTreeSet<Modality>,
    /// DuckDB file backing the dataset
    pub database: PathBuf,
}

impl DatasetDefinition {
    /// Create a descriptor; the name is normalised to lower case
    pub fn new<I>(name: &str, modalities: I, database: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = Modality>,
    {
        Self {
            name: name.trim().to_lowercase(),
            description: String::new(),
            modalities: modalities.into_iter().collect(),
            database: database.into(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the dataset exposes `modality`
    pub fn has_modality(&self, modality: Modality) -> bool {
        self.modalities.contains(&modality)
    }

    /// Whether the backing database file is present
    pub fn database_exists(&self) -> bool {
        self.database.is_file()
    }
}

/// Datasets every installation knows about; paths are relative to `data_dir`
pub fn builtin_datasets(data_dir: &Path) -> Vec<DatasetDefinition> {
    let path = |name: &str| data_dir.join(format!("{name}.duckdb"));
    vec![
        DatasetDefinition::new("mimic-iv-demo", [Modality::Tabular], path("mimic-iv-demo"))
            .with_description("MIMIC-IV clinical database demo (100 patients, tabular only)"),
        DatasetDefinition::new("mimic-iv-full", [Modality::Tabular], path("mimic-iv-full"))
            .with_description("MIMIC-IV clinical database (credentialed access, tabular only)"),
        DatasetDefinition::new(
            "mimic-iv-note",
            [Modality::Notes, Modality::Tabular],
            path("mimic-iv-note"),
        )
        .with_description("MIMIC-IV-Note discharge summaries and radiology reports"),
    ]
}

/// Process-wide registry of dataset descriptors plus the active selection
#[derive(Debug)]
pub struct DatasetRegistry {
    datasets: BTreeMap<String, Arc<DatasetDefinition>>,
    active: RwLock<String>,
}

impl DatasetRegistry {
    /// Build a registry from descriptors; `active` must name one of them
    pub fn new<I>(datasets: I, active: &str) -> Result<Self>
    where
        I: IntoIterator<Item = DatasetDefinition>,
    {
        let datasets: BTreeMap<_, _> = datasets
            .into_iter()
            .map(|def| (def.name.clone(), Arc::new(def)))
            .collect();

        let active = active.trim().to_lowercase();
        if !datasets.contains_key(&active) {
            return Err(NotegateError::DatasetNotFound(active));
        }

        Ok(Self {
            datasets,
            active: RwLock::new(active),
        })
    }

    /// Built-in datasets plus the ones declared in configuration.
    ///
    /// A configured dataset with a built-in name replaces the built-in one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut datasets = builtin_datasets(&config.data_dir);

        for declared in &config.datasets {
            let name = declared.name.trim().to_lowercase();
            let database = declared
                .database
                .clone()
                .unwrap_or_else(|| config.database_path(&name));
            let def = DatasetDefinition::new(&name, declared.modalities.iter().copied(), database)
                .with_description(declared.description.clone().unwrap_or_default());

            datasets.retain(|existing| existing.name != def.name);
            datasets.push(def);
        }

        let registry = Self::new(datasets, &config.active_dataset)?;
        tracing::debug!(
            "Dataset registry loaded with {} datasets, active: {}",
            registry.datasets.len(),
            registry.active_name()
        );
        Ok(registry)
    }

    /// Look up a dataset by name, ignoring case
    pub fn get(&self, name: &str) -> Option<Arc<DatasetDefinition>> {
        self.datasets.get(&name.trim().to_lowercase()).cloned()
    }

    /// Name of the active dataset
    pub fn active_name(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Resolve the active dataset descriptor
    pub fn get_active(&self) -> Result<Arc<DatasetDefinition>> {
        let name = self.active_name();
        self.get(&name)
            .ok_or(NotegateError::DatasetNotFound(name))
    }

    /// Switch the active dataset
    pub fn set_active(&self, name: &str) -> Result<Arc<DatasetDefinition>> {
        let def = self
            .get(name)
            .ok_or_else(|| NotegateError::DatasetNotFound(name.trim().to_string()))?;

        let mut active = self
            .active
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::info!("Active dataset changed: {} -> {}", *active, def.name);
        *active = def.name.clone();
        Ok(def)
    }

    /// All datasets ordered by name
    pub fn list(&self) -> Vec<Arc<DatasetDefinition>> {
        self.datasets.values().cloned().collect()
    }

    /// All dataset names ordered alphabetically
    pub fn names(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }
}

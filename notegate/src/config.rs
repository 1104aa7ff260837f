//! Configuration management for notegate
//!
//! Values are resolved from defaults, then `NOTEGATE_*` environment variables,
//! then a `notegate.yaml` file (highest precedence).

use crate::common::env_loader::EnvLoader;
use crate::datasets::Modality;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILENAME: &str = "notegate.yaml";
const DEFAULT_ACTIVE_DATASET: &str = "mimic-iv-demo";
const DEFAULT_MAX_RESULT_ROWS: usize = 100;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        /// Path to the configuration file that could not be read
        path: PathBuf,
        /// Underlying I/O error that occurred during file reading
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML content from a configuration file
    #[error("Invalid YAML syntax in {path}:\n{source}\n\nHint: Check for proper indentation and YAML formatting")]
    YamlParse {
        /// Path to the configuration file with invalid YAML content
        path: PathBuf,
        /// Underlying YAML parsing error
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid configuration value for a specific field
    #[error("Invalid configuration value for '{field}': {value}\n{hint}")]
    InvalidValue {
        /// Name of the configuration field that has an invalid value
        field: String,
        /// The invalid value that was provided
        value: String,
        /// Helpful hint about how to fix the issue
        hint: String,
    },
}

/// A dataset declared in configuration in addition to the built-in ones
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetConfig {
    /// Unique dataset name
    pub name: String,
    /// Modalities the dataset exposes
    pub modalities: BTreeSet<Modality>,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// DuckDB file; defaults to `<data_dir>/<name>.duckdb`
    #[serde(default)]
    pub database: Option<PathBuf>,
}

/// Configuration settings for notegate
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `<dataset>.duckdb` files
    pub data_dir: PathBuf,
    /// Dataset selected at startup
    pub active_dataset: String,
    /// Row cap for `execute_query` output
    pub max_result_rows: usize,
    /// Extra datasets declared in YAML
    pub datasets: Vec<DatasetConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            active_dataset: DEFAULT_ACTIVE_DATASET.to_string(),
            max_result_rows: DEFAULT_MAX_RESULT_ROWS,
            datasets: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration instance with values loaded from:
    /// 1. YAML file (highest precedence)
    /// 2. Environment variables
    /// 3. Defaults (lowest precedence)
    ///
    /// An unreadable or invalid YAML file is logged and ignored.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env_vars();

        match YamlConfig::load_or_default() {
            Ok(yaml_config) => {
                yaml_config.apply_to_config(&mut config);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load YAML configuration, falling back to env vars and defaults: {}",
                    e
                );
            }
        }

        config
    }

    /// Load defaults and environment, then apply the given YAML file.
    ///
    /// Unlike [`Config::new`], a broken file is an error here because the
    /// caller named it explicitly.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_vars();
        YamlConfig::load_from_file(path)?.apply_to_config(&mut config);
        Ok(config)
    }

    fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".notegate"))
            .unwrap_or_else(|| PathBuf::from(".notegate"))
            .join("databases")
    }

    /// Apply environment variable configuration to this config
    fn apply_env_vars(&mut self) {
        let loader = EnvLoader::new("NOTEGATE");

        if let Some(data_dir) = loader.load_optional::<PathBuf>("DATA_DIR") {
            self.data_dir = data_dir;
        }
        self.active_dataset = loader.load_string("DATASET", &self.active_dataset);
        self.max_result_rows =
            loader.load_validated("MAX_RESULT_ROWS", self.max_result_rows, |rows| *rows > 0);
    }

    /// Default database location for a dataset
    pub fn database_path(&self, dataset_name: &str) -> PathBuf {
        self.data_dir.join(format!("{dataset_name}.duckdb"))
    }

    /// Find the notegate.yaml configuration file
    ///
    /// The search order is:
    /// 1. Current working directory: `notegate.yaml`
    /// 2. `~/.config/notegate/notegate.yaml`
    /// 3. `~/notegate.yaml`
    pub fn find_yaml_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(CONFIG_FILENAME)];

        if let Some(home_dir) = dirs::home_dir() {
            search_paths.push(
                home_dir
                    .join(".config")
                    .join("notegate")
                    .join(CONFIG_FILENAME),
            );
            search_paths.push(home_dir.join(CONFIG_FILENAME));
        }

        let found = search_paths
            .into_iter()
            .find(|path| Self::check_config_file(path).is_some());

        match &found {
            Some(path) => tracing::debug!("Found configuration file: {:?}", path),
            None => tracing::debug!("No notegate.yaml configuration file found"),
        }
        found
    }

    /// Check if a configuration file exists and is readable
    pub fn check_config_file(config_path: &Path) -> Option<PathBuf> {
        match config_path.try_exists() {
            Ok(true) if config_path.is_file() => match std::fs::File::open(config_path) {
                Ok(_) => Some(config_path.to_path_buf()),
                Err(e) => {
                    tracing::warn!(
                        "Configuration file {:?} exists but cannot be read: {}",
                        config_path,
                        e
                    );
                    None
                }
            },
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    "Error checking for configuration file {:?}: {}",
                    config_path,
                    e
                );
                None
            }
        }
    }
}

/// Configuration loaded from notegate.yaml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    /// Directory holding dataset databases
    pub data_dir: Option<PathBuf>,
    /// Dataset selected at startup
    pub active_dataset: Option<String>,
    /// Row cap for `execute_query`
    pub max_result_rows: Option<usize>,
    /// Extra datasets
    #[serde(default)]
    pub datasets: Vec<DatasetConfig>,
}

impl YamlConfig {
    /// Apply YAML configuration values to an existing Config
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(ref data_dir) = self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(ref active) = self.active_dataset {
            config.active_dataset = active.clone();
        }
        if let Some(rows) = self.max_result_rows {
            config.max_result_rows = rows;
        }
        config.datasets.extend(self.datasets.iter().cloned());
    }

    /// Load YAML configuration from a file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Loading YAML configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: YamlConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load YAML configuration, returning default if file not found
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Config::find_yaml_config_file() {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate YAML configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref active) = self.active_dataset {
            if active.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "active_dataset".to_string(),
                    value: active.clone(),
                    hint: "active_dataset cannot be empty".to_string(),
                });
            }
        }

        if self.max_result_rows == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_result_rows".to_string(),
                value: "0".to_string(),
                hint: "max_result_rows must be at least 1".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        for dataset in &self.datasets {
            let name = dataset.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "datasets.name".to_string(),
                    value: dataset.name.clone(),
                    hint: "every dataset needs a name".to_string(),
                });
            }
            if dataset.modalities.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("datasets.{name}.modalities"),
                    value: "[]".to_string(),
                    hint: "list at least one of: notes, tabular".to_string(),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigError::InvalidValue {
                    field: "datasets.name".to_string(),
                    value: name,
                    hint: "dataset names must be unique".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests that change the working directory must not interleave
    static WORKING_DIR_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        std::env::remove_var("NOTEGATE_DATA_DIR");
        std::env::remove_var("NOTEGATE_DATASET");
        std::env::remove_var("NOTEGATE_MAX_RESULT_ROWS");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_dataset, "mimic-iv-demo");
        assert_eq!(config.max_result_rows, 100);
        assert!(config.datasets.is_empty());
        assert!(config.data_dir.ends_with("databases"));
    }

    #[test]
    fn test_database_path_uses_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/srv/notegate"),
            ..Config::default()
        };
        assert_eq!(
            config.database_path("mimic-iv-note"),
            PathBuf::from("/srv/notegate/mimic-iv-note.duckdb")
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_config_with_env_vars() {
        let _lock = WORKING_DIR_MUTEX.lock().unwrap();
        let temp_dir = tempfile::TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp_dir.path()).unwrap();

        clear_env();
        std::env::set_var("NOTEGATE_DATA_DIR", "/tmp/notegate-data");
        std::env::set_var("NOTEGATE_DATASET", "mimic-iv-note");
        std::env::set_var("NOTEGATE_MAX_RESULT_ROWS", "0");

        let config = Config::new();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/notegate-data"));
        assert_eq!(config.active_dataset, "mimic-iv-note");
        // zero is rejected and the default kept
        assert_eq!(config.max_result_rows, 100);

        clear_env();
        std::env::set_current_dir(original_dir).expect("Could not restore original directory");
    }

    #[test]
    #[serial_test::serial]
    fn test_yaml_overrides_env() {
        let _lock = WORKING_DIR_MUTEX.lock().unwrap();
        let temp_dir = tempfile::TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp_dir.path()).unwrap();

        clear_env();
        std::env::set_var("NOTEGATE_DATASET", "mimic-iv-demo");
        std::fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            "active_dataset: local-notes\nmax_result_rows: 25\ndatasets:\n  - name: local-notes\n    modalities: [notes]\n",
        )
        .unwrap();

        let config = Config::new();
        assert_eq!(config.active_dataset, "local-notes");
        assert_eq!(config.max_result_rows, 25);
        assert_eq!(config.datasets.len(), 1);
        assert_eq!(config.datasets[0].name, "local-notes");
        assert!(config.datasets[0].modalities.contains(&Modality::Notes));

        clear_env();
        std::env::set_current_dir(original_dir).expect("Could not restore original directory");
    }

    #[test]
    fn test_yaml_config_deserialization() {
        let yaml = r#"
data_dir: /data
datasets:
  - name: eicu-notes
    description: eICU free text
    modalities: [notes, tabular]
    database: /data/eicu.duckdb
"#;
        let yaml_config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(yaml_config.data_dir, Some(PathBuf::from("/data")));
        assert_eq!(yaml_config.datasets[0].modalities.len(), 2);
        assert_eq!(
            yaml_config.datasets[0].database,
            Some(PathBuf::from("/data/eicu.duckdb"))
        );
        assert!(yaml_config.validate().is_ok());
    }

    #[test]
    fn test_yaml_config_rejects_unknown_modality() {
        let yaml = "datasets:\n  - name: x\n    modalities: [images]\n";
        assert!(serde_yaml::from_str::<YamlConfig>(yaml).is_err());
    }

    #[test]
    fn test_yaml_config_validation() {
        let duplicate = YamlConfig {
            datasets: vec![
                DatasetConfig {
                    name: "notes".to_string(),
                    modalities: [Modality::Notes].into_iter().collect(),
                    description: None,
                    database: None,
                },
                DatasetConfig {
                    name: "NOTES".to_string(),
                    modalities: [Modality::Notes].into_iter().collect(),
                    description: None,
                    database: None,
                },
            ],
            ..YamlConfig::default()
        };
        assert!(duplicate.validate().is_err());

        let no_modalities = YamlConfig {
            datasets: vec![DatasetConfig {
                name: "empty".to_string(),
                modalities: BTreeSet::new(),
                description: None,
                database: None,
            }],
            ..YamlConfig::default()
        };
        assert!(no_modalities.validate().is_err());

        let zero_rows = YamlConfig {
            max_result_rows: Some(0),
            ..YamlConfig::default()
        };
        assert!(zero_rows.validate().is_err());
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.yaml");
        std::fs::write(&path, "datasets: [unclosed").unwrap();

        match Config::from_file(&path) {
            Err(ConfigError::YamlParse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected YamlParse error, got {other:?}"),
        }
    }
}

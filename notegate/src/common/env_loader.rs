//! Environment variable loading utilities
//!
//! This module provides common patterns for loading environment variables
//! with type conversion and fallback defaults.

use std::env;
use std::str::FromStr;

/// Load an environment variable with a string default
pub fn load_env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Load an environment variable with type conversion and default
pub fn load_env_parsed<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Load an environment variable as an Option<T>
pub fn load_env_optional<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Load an environment variable, falling back to `default` when the parsed
/// value is rejected by `validator`
pub fn load_env_validated<T, F>(key: &str, default: T, validator: F) -> T
where
    T: FromStr + Clone,
    F: Fn(&T) -> bool,
{
    let value = load_env_parsed(key, default.clone());
    if validator(&value) {
        value
    } else {
        tracing::warn!("Ignoring out-of-range value for {}", key);
        default
    }
}

/// Builder for loading multiple environment variables with consistent prefix
#[derive(Debug)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Load a string value with default
    pub fn load_string(&self, suffix: &str, default: &str) -> String {
        load_env_string(&self.key(suffix), default)
    }

    /// Load a parsed value with default
    pub fn load_parsed<T>(&self, suffix: &str, default: T) -> T
    where
        T: FromStr,
    {
        load_env_parsed(&self.key(suffix), default)
    }

    /// Load an optional value
    pub fn load_optional<T>(&self, suffix: &str) -> Option<T>
    where
        T: FromStr,
    {
        load_env_optional(&self.key(suffix))
    }

    /// Load a validated value
    pub fn load_validated<T, F>(&self, suffix: &str, default: T, validator: F) -> T
    where
        T: FromStr + Clone,
        F: Fn(&T) -> bool,
    {
        load_env_validated(&self.key(suffix), default, validator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_load_env_parsed_falls_back_on_garbage() {
        let key = "NOTEGATE_TEST_PARSED_VAR";

        env::remove_var(key);
        assert_eq!(load_env_parsed(key, 42u32), 42);

        env::set_var(key, "123");
        assert_eq!(load_env_parsed::<u32>(key, 42), 123);

        env::set_var(key, "many");
        assert_eq!(load_env_parsed(key, 42u32), 42);

        env::remove_var(key);
    }

    #[test]
    #[serial_test::serial]
    fn test_load_env_validated_rejects_out_of_range() {
        let key = "NOTEGATE_TEST_VALIDATED_VAR";
        let positive = |v: &usize| *v > 0;

        env::set_var(key, "0");
        assert_eq!(load_env_validated(key, 10usize, positive), 10);

        env::set_var(key, "25");
        assert_eq!(load_env_validated(key, 10usize, positive), 25);

        env::remove_var(key);
    }

    #[test]
    #[serial_test::serial]
    fn test_env_loader_prefixes_keys() {
        let loader = EnvLoader::new("NOTEGATE_TEST");

        env::remove_var("NOTEGATE_TEST_DATASET");
        assert_eq!(loader.load_string("DATASET", "mimic-iv-note"), "mimic-iv-note");
        assert_eq!(loader.load_optional::<String>("DATASET"), None);

        env::set_var("NOTEGATE_TEST_DATASET", "mimic-iv-demo");
        assert_eq!(loader.load_string("DATASET", "mimic-iv-note"), "mimic-iv-demo");
        assert_eq!(
            loader.load_optional::<String>("DATASET"),
            Some("mimic-iv-demo".to_string())
        );

        env::remove_var("NOTEGATE_TEST_DATASET");
    }
}

//! Environment variable loading
//!
//! Typed lookups with fallback defaults, used by [`crate::config::Config`]
//! to apply `STICKYNOTES_*` overrides.

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

/// Load an environment variable as an `Option<T>`; empty values count as unset
pub fn load_env_optional<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.parse().ok())
}

/// Loads variables sharing one prefix, e.g. `STICKYNOTES_DATA_DIR`
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_load_env_parsed_falls_back_on_garbage() {
        let key = "STICKYNOTES_TEST_MAX_LENGTH";

        env::remove_var(key);
        assert_eq!(load_env_parsed(key, 50u32), 50);

        env::set_var(key, "80");
        assert_eq!(load_env_parsed::<u32>(key, 50), 80);

        env::set_var(key, "eighty");
        assert_eq!(load_env_parsed(key, 50u32), 50);

        env::remove_var(key);
    }

    #[test]
    #[serial]
    fn test_load_env_optional_treats_empty_as_unset() {
        let key = "STICKYNOTES_TEST_TOKEN";

        env::set_var(key, "   ");
        assert_eq!(load_env_optional::<String>(key), None);

        env::set_var(key, "hf_abc");
        assert_eq!(load_env_optional::<String>(key), Some("hf_abc".to_string()));

        env::remove_var(key);
    }

    #[test]
    #[serial]
    fn test_env_loader_prefix() {
        let loader = EnvLoader::new("STICKYNOTES_TEST");
        let key = "STICKYNOTES_TEST_STORAGE_KEY";

        env::remove_var(key);
        assert_eq!(loader.load_string("STORAGE_KEY", "notes"), "notes");

        env::set_var(key, "board");
        assert_eq!(loader.load_string("STORAGE_KEY", "notes"), "board");
        assert_eq!(loader.load_optional::<String>("STORAGE_KEY"), Some("board".into()));

        env::remove_var(key);
    }
}

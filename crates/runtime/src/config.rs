use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, RuntimeError};

/// Key -> string configuration lookup.
///
/// Values come from an optional `config.json` document merged under process
/// environment variables; the environment wins on conflict. One `Config` is
/// constructed in `main` and passed to every component that needs it.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// Load from `config.json` in the working directory if present, then
    /// overlay the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.json"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut values = HashMap::new();

        if path.exists() {
            let raw =
                std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigFile {
                    path: path.display().to_string(),
                    source,
                })?;
            let doc: HashMap<String, serde_json::Value> = serde_json::from_str(&raw)
                .map_err(|source| RuntimeError::ConfigFormat {
                    path: path.display().to_string(),
                    source,
                })?;
            for (key, value) in doc {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                values.insert(key, value);
            }
            log::debug!("Loaded {} configuration keys from {}", values.len(), path.display());
        }

        for (key, value) in std::env::vars() {
            values.insert(key, value);
        }

        Ok(Self { values })
    }

    /// Build directly from key/value pairs. Test seam.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| RuntimeError::MissingConfig(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_are_visible_and_env_wins() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).expect("create config");
        write!(file, r#"{{"WIT_TOKEN": "from-file", "PATH": "shadowed"}}"#).expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.get("WIT_TOKEN"), Some("from-file"));
        // PATH is always present in the environment and must shadow the file.
        assert_ne!(config.get("PATH"), Some("shadowed"));
    }

    #[test]
    fn non_string_json_values_are_stringified() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"LIMIT": 5}"#).expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.get("LIMIT"), Some("5"));
    }

    #[test]
    fn missing_file_yields_env_only_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from(&dir.path().join("absent.json")).expect("load");
        assert!(config.get("PATH").is_some());
    }

    #[test]
    fn require_reports_the_missing_key() {
        let config = Config::from_pairs([("A", "1")]);
        assert_eq!(config.require("A").expect("present"), "1");
        let err = config.require("B").expect_err("absent");
        assert!(err.to_string().contains("'B'"));
    }
}

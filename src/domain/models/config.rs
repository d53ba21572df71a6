use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One named, versioned set of configuration parameters.
///
/// `(id, version)` identifies exactly one stored record. `id` is minted by the
/// store on first creation and left empty by callers until then.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub version: String,

    /// Parameter name to value
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl Config {
    /// Create an unsaved config with no id.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            version: version.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = Config::new("v1")
            .with_entry("db_host", "localhost")
            .with_entry("db_port", "5432");

        assert!(config.id.is_empty());
        assert_eq!(config.version, "v1");
        assert_eq!(config.entries.len(), 2);
        assert_eq!(config.entries["db_port"], "5432");
    }

    #[test]
    fn test_json_shape() {
        let config = Config::new("v2").with_id("abc").with_entry("k", "v");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "abc", "version": "v2", "entries": {"k": "v"}})
        );
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result: Result<Config, _> =
            serde_json::from_str(r#"{"version": "v1", "entries": {}, "extra": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields_default() {
        let config: Config = serde_json::from_str(r#"{"entries": {"a": "b"}}"#).unwrap();
        assert!(config.id.is_empty());
        assert!(config.version.is_empty());
        assert_eq!(config.entries.len(), 1);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One label-selected variant inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigForGroup {
    /// Label set used only for selection
    #[serde(default)]
    pub entries: BTreeMap<String, String>,

    /// Parameters returned when the labels match
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl ConfigForGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

/// A versioned bundle of label-selected variants.
///
/// `configs` is `None` when the caller never supplied the sequence, which is
/// rejected on creation. Duplicate label sets are allowed and kept in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Group {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub configs: Option<Vec<ConfigForGroup>>,

    #[serde(default)]
    pub version: String,
}

impl Group {
    /// Create an unsaved group with an empty variant list.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            configs: Some(Vec::new()),
            version: version.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_config(mut self, config: ConfigForGroup) -> Self {
        self.configs.get_or_insert_with(Vec::new).push(config);
        self
    }

    /// Variants in stored order; empty when the sequence is absent.
    pub fn configs(&self) -> &[ConfigForGroup] {
        self.configs.as_deref().unwrap_or_default()
    }
}

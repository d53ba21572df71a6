//! Label-set queries over a group's variants.
//!
//! A query looks like `env:prod;region:us`. A variant matches only when its
//! label set is exactly the query's: same size, same pairs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::InvalidInputError;
use crate::domain::models::{ConfigForGroup, Group};

const SEGMENT_SEPARATOR: char = ';';
const PAIR_SEPARATOR: char = ':';

/// Parsed label query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact equality against a variant's label map.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.0.len() == labels.len() && self.0.iter().all(|(k, v)| labels.get(k) == Some(v))
    }
}

impl From<BTreeMap<String, String>> for LabelSet {
    fn from(labels: BTreeMap<String, String>) -> Self {
        Self(labels)
    }
}

/// Canonical form: pairs sorted by key, `k:v` joined with `;`.
impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEGMENT_SEPARATOR}")?;
            }
            write!(f, "{key}{PAIR_SEPARATOR}{value}")?;
        }
        Ok(())
    }
}

impl FromStr for LabelSet {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label_query(s)
    }
}

/// Parse `k1:v1;k2:v2`. Empty segments are skipped, each segment splits on its
/// first `:`, later duplicates of a key win.
pub fn parse_label_query(query: &str) -> Result<LabelSet, InvalidInputError> {
    let mut labels = LabelSet::new();

    for segment in query.split(SEGMENT_SEPARATOR).filter(|s| !s.is_empty()) {
        let (key, value) = segment.split_once(PAIR_SEPARATOR).ok_or_else(|| {
            InvalidInputError::InvalidLabelFormat {
                segment: segment.to_string(),
            }
        })?;
        labels.insert(key, value);
    }

    Ok(labels)
}

/// Every variant of `group` whose labels equal `labels`, in stored order.
pub fn select_matching(group: &Group, labels: &LabelSet) -> Vec<ConfigForGroup> {
    group
        .configs()
        .iter()
        .filter(|config| labels.matches(&config.entries))
        .cloned()
        .collect()
}

//! Backend key schema.
//!
//! Every record lives under `<kind>/<id>/<version>`. Listing one entity scans
//! `<kind>/<id>/`, listing a whole kind scans `<kind>/`. Ids and versions must
//! not contain `/`; this is not checked here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key hierarchy delimiter.
pub const DELIMITER: char = '/';

/// Kind of stored entity, which is also the first key segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Config,
    Group,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Config => "config",
            EntityKind::Group => "group",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "config" => Ok(EntityKind::Config),
            "group" => Ok(EntityKind::Group),
            other => Err(format!("Unknown entity kind: {other}")),
        }
    }
}

/// A backend key split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParts {
    pub kind: EntityKind,
    pub id: String,
    pub version: String,
}

/// `<kind>/<id>/<version>`
pub fn build_key(kind: EntityKind, id: &str, version: &str) -> String {
    format!("{kind}{DELIMITER}{id}{DELIMITER}{version}")
}

/// `<kind>/<id>`
pub fn entity_prefix(kind: EntityKind, id: &str) -> String {
    format!("{kind}{DELIMITER}{id}")
}

/// `<kind>`
pub fn kind_prefix(kind: EntityKind) -> String {
    kind.as_str().to_string()
}

/// Terminate a prefix with the delimiter before handing it to a prefix scan,
/// so `config/a` cannot pick up `config/ab/...`. Always appends, so the
/// prefix of an empty id (`config/`) scans `config//` and not the whole kind.
pub fn scan_prefix(prefix: &str) -> String {
    format!("{prefix}{DELIMITER}")
}

/// Fresh random id for the first version of an entity.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Interpret a backend key. Returns `None` unless the key has exactly three
/// non-empty segments and a known kind.
pub fn parse_key(key: &str) -> Option<KeyParts> {
    let mut segments = key.split(DELIMITER);
    let kind = segments.next()?.parse::<EntityKind>().ok()?;
    let id = segments.next().filter(|s| !s.is_empty())?;
    let version = segments.next().filter(|s| !s.is_empty())?;
    if segments.next().is_some() {
        return None;
    }

    Some(KeyParts {
        kind,
        id: id.to_string(),
        version: version.to_string(),
    })
}

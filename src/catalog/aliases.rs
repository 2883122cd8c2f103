use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::store::CacheError;

/// Hand-maintained alternative names for players, keyed by DSDA spelling.
///
/// Stored as a JSON object of string arrays:
///
/// ```json
/// { "Cybermind": ["Cyb", "Cyber"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    owners: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the table from disk. A missing file yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Io` if the file cannot be read and
    /// `CacheError::InvalidAliases` if it is not a valid table.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Alias table {} not found, continuing without aliases", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let table = Self::from_json(&content).map_err(|source| CacheError::InvalidAliases {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded aliases for {} players", table.owners.len());
        Ok(table)
    }

    /// `(owner, alias)` pairs, owners in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.owners.iter().flat_map(|(owner, aliases)| {
            aliases.iter().map(move |alias| (owner.as_str(), alias.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

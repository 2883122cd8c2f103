use thiserror::Error;

use crate::catalog::resolve::{self, Candidate};
use crate::catalog::CacheError;
use crate::core::types::EntityKind;
use crate::matching::NoQualifyingRecord;
use crate::parsing::ParseError;
use crate::site::FetchError;

/// Query outcomes reported to the user as a message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please provide {0}!")]
    MissingArgument(&'static str),

    #[error("{}", .0.not_found_message())]
    NotFound(EntityKind),

    #[error("{}", render_ambiguous(.kind, .candidates))]
    Ambiguous {
        kind: EntityKind,
        candidates: Vec<Candidate>,
    },

    #[error("Invalid category name!")]
    InvalidCategory,

    #[error("{}", no_run_message(.level_scoped))]
    NoQualifyingRecord { level_scoped: bool },

    #[error("Please sync the wad compats first!")]
    UncachedDependency,

    #[error("No cached {} for {url}, try syncing", .kind.noun())]
    UnknownIndex { kind: EntityKind, url: String },
}

fn render_ambiguous(kind: &EntityKind, candidates: &[Candidate]) -> String {
    resolve::render_candidates(*kind, candidates)
}

fn no_run_message(level_scoped: &bool) -> &'static str {
    if *level_scoped {
        "No run for given wad, category, and map combination!"
    } else {
        "No run for given wad and category!"
    }
}

impl From<NoQualifyingRecord> for QueryError {
    fn from(e: NoQualifyingRecord) -> Self {
        Self::NoQualifyingRecord {
            level_scoped: e.level_scoped,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ClientError {
    /// Cache errors leave the local state unusable; everything else only
    /// fails the current query
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Cache(_))
    }
}

impl From<NoQualifyingRecord> for ClientError {
    fn from(e: NoQualifyingRecord) -> Self {
        Self::Query(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            QueryError::MissingArgument("a wad name and category").to_string(),
            "Please provide a wad name and category!"
        );
        assert_eq!(
            QueryError::NotFound(EntityKind::Wad).to_string(),
            "Wad name not found!"
        );
        assert_eq!(
            QueryError::NoQualifyingRecord { level_scoped: true }.to_string(),
            "No run for given wad, category, and map combination!"
        );
        assert_eq!(
            QueryError::NoQualifyingRecord { level_scoped: false }.to_string(),
            "No run for given wad and category!"
        );
        assert_eq!(
            QueryError::UncachedDependency.to_string(),
            "Please sync the wad compats first!"
        );
    }

    #[test]
    fn test_only_cache_errors_are_fatal() {
        let query = ClientError::from(QueryError::InvalidCategory);
        assert!(!query.is_fatal());

        let cache = ClientError::from(CacheError::Malformed {
            path: "x.txt".into(),
            line_no: 1,
            line: "x".to_string(),
        });
        assert!(cache.is_fatal());
    }
}

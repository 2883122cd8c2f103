//! Free-text name resolution against the cached indexes.
//!
//! Resolution tries, in order:
//!
//! 1. **Exact**: the query as typed, then case-insensitively
//! 2. **Suffix** (wads only): the query without a trailing `.wad` / `.pk3`
//! 3. **Substring**: every name containing the query, case-insensitively
//! 4. **Aliases** (players only): an alias equal to the query wins outright;
//!    aliases containing the query add their owner as a candidate

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::catalog::aliases::AliasTable;
use crate::catalog::index::NameIndex;
use crate::core::types::EntityKind;

/// Candidate lists longer than this are reported by count only
pub const MAX_LISTED_CANDIDATES: usize = 20;

const WAD_SUFFIXES: [&str; 2] = [".wad", ".pk3"];

/// A possible match for an ambiguous query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub name: String,
    /// Alias through which the candidate matched
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Exact(String),
    Ambiguous(Vec<Candidate>),
    NotFound,
}

fn strip_wad_suffix(query: &str) -> &str {
    for suffix in WAD_SUFFIXES {
        let Some(split) = query.len().checked_sub(suffix.len()) else {
            continue;
        };
        if query.is_char_boundary(split) && query[split..].eq_ignore_ascii_case(suffix) {
            return &query[..split];
        }
    }
    query
}

/// Steps 1 and 2 only: the canonical name when the query names an entry
/// outright
pub fn resolve_exact<'i, V>(
    query: &str,
    kind: EntityKind,
    index: &'i NameIndex<V>,
) -> Option<&'i str> {
    let query = query.trim_end();
    if let Some(name) = index.canonical(query) {
        return Some(name);
    }
    match kind {
        EntityKind::Player => None,
        EntityKind::Wad | EntityKind::WadCompat => index.canonical(strip_wad_suffix(query)),
    }
}

/// Full resolution. `aliases` is consulted for players only.
pub fn resolve<V>(
    query: &str,
    kind: EntityKind,
    index: &NameIndex<V>,
    aliases: Option<&AliasTable>,
) -> Resolution {
    if let Some(name) = resolve_exact(query, kind, index) {
        return Resolution::Exact(name.to_string());
    }

    let mut needle = query.trim_end();
    if kind != EntityKind::Player {
        needle = strip_wad_suffix(needle);
    }
    let needle = needle.to_lowercase();

    // name -> alias it matched through
    let mut candidates: BTreeMap<String, Option<String>> = index
        .names()
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(|name| (name.to_string(), None))
        .collect();

    if kind == EntityKind::Player {
        for (owner, alias) in aliases.into_iter().flat_map(AliasTable::iter) {
            let Some(owner) = index.canonical(owner) else {
                debug!("Alias owner {owner:?} is not a known player");
                continue;
            };
            let alias_lower = alias.to_lowercase();
            if alias_lower == needle {
                return Resolution::Exact(owner.to_string());
            }
            if alias_lower.contains(&needle) {
                candidates.insert(owner.to_string(), Some(alias.to_string()));
            }
        }
    }

    let mut candidates: Vec<Candidate> = candidates
        .into_iter()
        .map(|(name, alias)| Candidate { name, alias })
        .collect();
    match candidates.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Exact(candidates.remove(0).name),
        _ => Resolution::Ambiguous(candidates),
    }
}

/// Message listing the candidates of an ambiguous query
pub fn render_candidates(kind: EntityKind, candidates: &[Candidate]) -> String {
    let noun = kind.noun();
    let count = candidates.len();
    let mut message = format!("Found {count} matching {noun}s!");
    if count > MAX_LISTED_CANDIDATES {
        return message;
    }

    message.push_str(&format!(" Possible {noun}s:"));
    for (i, candidate) in candidates.iter().enumerate() {
        message.push_str(&format!("\n  {}: {}", i + 1, candidate.name));
        if let Some(alias) = &candidate.alias {
            message.push_str(&format!(" ({alias})"));
        }
    }
    message
}

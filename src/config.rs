use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://doomedsda.us";
pub const DEFAULT_ALIAS_FILE: &str = "config/player_aliases.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// DSDA splits its wad list over `wadlist1.html` .. `wadlist9.html`
pub const DEFAULT_WAD_LIST_PAGES: usize = 9;

/// Wads DSDA splits over several pages, one per level range
pub const PAGINATED_WADS: &[&str] = &[
    "doom2",
    "doom",
    "tnt",
    "plutonia",
    "hr",
    "scythe",
    "mm",
    "av (2nd Release)",
    "mm2",
    "requiem",
];

/// Configuration for the client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root, without trailing slash
    pub base_url: String,
    /// Directory holding the sync caches
    pub cache_dir: PathBuf,
    /// Player alias table (JSON)
    pub alias_file: PathBuf,
    /// Per-request timeout
    pub timeout: Duration,
    pub wad_list_pages: usize,
    pub paginated_wads: Vec<String>,
}

impl ClientConfig {
    pub fn is_paginated(&self, wad: &str) -> bool {
        self.paginated_wads.iter().any(|w| w == wad)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: PathBuf::from("."),
            alias_file: PathBuf::from(DEFAULT_ALIAS_FILE),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            wad_list_pages: DEFAULT_WAD_LIST_PAGES,
            paginated_wads: PAGINATED_WADS.iter().map(|w| (*w).to_string()).collect(),
        }
    }
}

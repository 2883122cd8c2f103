use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::catalog::index::NameIndex;
use crate::core::types::Tier;

pub const PLAYER_CACHE_FILE: &str = "player_name_to_url.txt";
pub const WAD_CACHE_FILE: &str = "wad_name_to_url.txt";
pub const TIER_CACHE_FILE: &str = "wad_name_to_compat.txt";
pub const HIGHEST_PLAYER_FILE: &str = "highest_player.txt";
pub const HIGHEST_WAD_FILE: &str = "highest_wad.txt";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to access cache file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed line {line_no} in {}: {line:?}", path.display())]
    Malformed {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    #[error("Failed to parse alias table {}: {source}", path.display())]
    InvalidAliases {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a `<name>=<value>` file, splitting each line on its last `=`.
///
/// Returns `Ok(None)` if the file does not exist.
fn read_flat(path: &Path) -> Result<Option<Vec<(String, String)>>, CacheError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::io(path, e)),
    };

    let mut entries = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.rsplit_once('=').ok_or_else(|| CacheError::Malformed {
            path: path.to_path_buf(),
            line_no: i + 1,
            line: line.to_string(),
        })?;
        entries.push((name.to_string(), value.to_string()));
    }
    debug!("Read {} entries from {}", entries.len(), path.display());
    Ok(Some(entries))
}

fn write_lines<I>(path: &Path, lines: I) -> Result<(), CacheError>
where
    I: IntoIterator<Item = String>,
{
    let mut content = String::new();
    for line in lines {
        content.push_str(&line);
        content.push('\n');
    }
    fs::write(path, content).map_err(|e| CacheError::io(path, e))
}

/// Sort a cache file line-wise in place
fn sort_file(path: &Path) -> Result<(), CacheError> {
    let content = fs::read_to_string(path).map_err(|e| CacheError::io(path, e))?;
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    lines.sort();
    write_lines(path, lines)
}

fn read_highest(path: &Path) -> Result<Option<u64>, CacheError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::io(path, e)),
    };
    let line = content.trim();
    line.parse().map(Some).map_err(|_| CacheError::Malformed {
        path: path.to_path_buf(),
        line_no: 1,
        line: line.to_string(),
    })
}

/// The on-disk caches a sync produces, loaded lazily into memory.
///
/// | File | Contents |
/// |------|----------|
/// | `player_name_to_url.txt` | player name → demo page URL |
/// | `wad_name_to_url.txt` | wad name → wad page URL |
/// | `wad_name_to_compat.txt` | wad name → guessed tier |
/// | `highest_player.txt` | largest player page index |
/// | `highest_wad.txt` | largest wad page index |
#[derive(Debug)]
pub struct CacheStore {
    dir: PathBuf,
    players: Option<NameIndex<String>>,
    wads: Option<NameIndex<String>>,
    tiers: Option<NameIndex<Tier>>,
    loaded: bool,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            players: None,
            wads: None,
            tiers: None,
            loaded: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Load every cache file present on disk. Files already in memory are
    /// not read again.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Io` on read failures and `CacheError::Malformed`
    /// for lines without `=` or with a tier outside the vocabulary.
    pub fn ensure_loaded(&mut self) -> Result<(), CacheError> {
        if self.loaded {
            return Ok(());
        }
        if self.players.is_none() {
            self.players = read_flat(&self.path(PLAYER_CACHE_FILE))?
                .map(|entries| entries.into_iter().collect());
        }
        if self.wads.is_none() {
            self.wads = read_flat(&self.path(WAD_CACHE_FILE))?
                .map(|entries| entries.into_iter().collect());
        }
        if self.tiers.is_none() {
            self.tiers = self.read_tiers()?;
        }
        self.loaded = true;
        Ok(())
    }

    fn read_tiers(&self) -> Result<Option<NameIndex<Tier>>, CacheError> {
        let path = self.path(TIER_CACHE_FILE);
        let Some(entries) = read_flat(&path)? else {
            return Ok(None);
        };

        let mut tiers = NameIndex::new();
        for (i, (name, value)) in entries.into_iter().enumerate() {
            let value = value.trim_end();
            let tier = Tier::parse(value)
                .filter(|tier| !tier.is_transient())
                .ok_or_else(|| CacheError::Malformed {
                    path: path.clone(),
                    line_no: i + 1,
                    line: format!("{name}={value}"),
                })?;
            tiers.insert(name, tier);
        }
        Ok(Some(tiers))
    }

    pub fn players(&self) -> Option<&NameIndex<String>> {
        self.players.as_ref()
    }

    pub fn wads(&self) -> Option<&NameIndex<String>> {
        self.wads.as_ref()
    }

    pub fn tiers(&self) -> Option<&NameIndex<Tier>> {
        self.tiers.as_ref()
    }

    pub fn has_tier_file(&self) -> bool {
        self.path(TIER_CACHE_FILE).is_file()
    }

    /// Replace the player cache and its highest index
    pub fn replace_players(
        &mut self,
        players: NameIndex<String>,
        highest: Option<u64>,
    ) -> Result<(), CacheError> {
        write_lines(
            &self.path(PLAYER_CACHE_FILE),
            players.iter().map(|(name, url)| format!("{name}={url}")),
        )?;
        write_highest(&self.path(HIGHEST_PLAYER_FILE), highest)?;
        self.players = Some(players);
        Ok(())
    }

    /// Replace the wad URL cache and its highest index
    pub fn replace_wads(
        &mut self,
        wads: NameIndex<String>,
        highest: Option<u64>,
    ) -> Result<(), CacheError> {
        write_lines(
            &self.path(WAD_CACHE_FILE),
            wads.iter().map(|(name, url)| format!("{name}={url}")),
        )?;
        write_highest(&self.path(HIGHEST_WAD_FILE), highest)?;
        self.wads = Some(wads);
        Ok(())
    }

    /// Replace the tier cache, written sorted line-wise
    pub fn replace_tiers(&mut self, tiers: NameIndex<Tier>) -> Result<(), CacheError> {
        let mut lines: Vec<String> = tiers
            .iter()
            .map(|(name, tier)| format!("{name}={tier}"))
            .collect();
        lines.sort();
        write_lines(&self.path(TIER_CACHE_FILE), lines)?;
        self.tiers = Some(tiers);
        Ok(())
    }

    /// Append tiers for newly discovered wads and re-sort the file
    pub fn append_tiers(&mut self, added: Vec<(String, Tier)>) -> Result<(), CacheError> {
        if added.is_empty() {
            return Ok(());
        }
        let path = self.path(TIER_CACHE_FILE);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| CacheError::io(&path, e))?;
        for (name, tier) in &added {
            writeln!(file, "{name}={tier}").map_err(|e| CacheError::io(&path, e))?;
        }
        drop(file);
        sort_file(&path)?;

        let tiers = self.tiers.get_or_insert_with(NameIndex::new);
        for (name, tier) in added {
            tiers.insert(name, tier);
        }
        Ok(())
    }

    pub fn highest_player(&self) -> Result<Option<u64>, CacheError> {
        read_highest(&self.path(HIGHEST_PLAYER_FILE))
    }

    pub fn highest_wad(&self) -> Result<Option<u64>, CacheError> {
        read_highest(&self.path(HIGHEST_WAD_FILE))
    }
}

fn write_highest(path: &Path, highest: Option<u64>) -> Result<(), CacheError> {
    match highest {
        Some(n) => write_lines(path, [n.to_string()]),
        // Nothing listed: leave no stale index behind
        None => match fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(CacheError::io(path, e)),
            _ => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_files_load_as_absent() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::new(dir.path());
        store.ensure_loaded().unwrap();
        assert!(store.players().is_none());
        assert!(store.tiers().is_none());
        assert!(!store.has_tier_file());
        assert_eq!(store.highest_wad().unwrap(), None);
    }

    #[test]
    fn test_split_on_last_equals() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(WAD_CACHE_FILE),
            "a=b=http://doomedsda.us/wad1.html\n",
        )
        .unwrap();
        let mut store = CacheStore::new(dir.path());
        store.ensure_loaded().unwrap();
        let wads = store.wads().unwrap();
        assert_eq!(
            wads.get("a=b").map(String::as_str),
            Some("http://doomedsda.us/wad1.html")
        );
    }

    #[test]
    fn test_tier_values_trimmed() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(TIER_CACHE_FILE),
            "scythe=Boom \nav=limit-removing\r\n",
        )
        .unwrap();
        let mut store = CacheStore::new(dir.path());
        store.ensure_loaded().unwrap();
        let tiers = store.tiers().unwrap();
        assert_eq!(tiers.get("scythe"), Some(&Tier::Boom));
        assert_eq!(tiers.get("av"), Some(&Tier::LimitRemoving));
    }

    #[test]
    fn test_malformed_lines_are_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PLAYER_CACHE_FILE), "Alice=x\nno separator\n").unwrap();
        let err = CacheStore::new(dir.path()).ensure_loaded().unwrap_err();
        assert!(matches!(err, CacheError::Malformed { line_no: 2, .. }));

        let dir = tempdir().unwrap();
        fs::write(dir.path().join(TIER_CACHE_FILE), "scythe=Vanilla\n").unwrap();
        let err = CacheStore::new(dir.path()).ensure_loaded().unwrap_err();
        assert!(matches!(err, CacheError::Malformed { line_no: 1, .. }));

        let dir = tempdir().unwrap();
        fs::write(dir.path().join(TIER_CACHE_FILE), "scythe=PrBoom\n").unwrap();
        assert!(CacheStore::new(dir.path()).ensure_loaded().is_err());
    }

    #[test]
    fn test_replace_and_reload() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::new(dir.path());
        let players: NameIndex<String> = [("Bob".to_string(), "u2".to_string())]
            .into_iter()
            .collect();
        store.replace_players(players, Some(2)).unwrap();

        let mut reloaded = CacheStore::new(dir.path());
        reloaded.ensure_loaded().unwrap();
        assert_eq!(reloaded.players().unwrap().canonical("bob"), Some("Bob"));
        assert_eq!(reloaded.highest_player().unwrap(), Some(2));
    }

    #[test]
    fn test_round_trip_many_pairs() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::new(dir.path());
        let wads: Vec<(String, String)> = vec![
            ("Eviternity".to_string(), "http://doomedsda.us/wad1.html".to_string()),
            ("a=b".to_string(), "http://doomedsda.us/wad2.html".to_string()),
            ("Ancient Aliens".to_string(), "http://doomedsda.us/wad3.html".to_string()),
            ("scythe2".to_string(), "http://doomedsda.us/wad4.html".to_string()),
        ];
        store
            .replace_wads(wads.clone().into_iter().collect(), Some(4))
            .unwrap();
        let tiers: Vec<(String, Tier)> = vec![
            ("Eviternity".to_string(), Tier::Mbf),
            ("a=b".to_string(), Tier::Boom),
            ("scythe2".to_string(), Tier::LimitRemoving),
        ];
        store
            .replace_tiers(tiers.clone().into_iter().collect())
            .unwrap();

        // Hand-edited lines may carry trailing whitespace
        let tier_path = dir.path().join(TIER_CACHE_FILE);
        let mut content = fs::read_to_string(&tier_path).unwrap();
        content.push_str("zdoom wad=GZDoom \t\n");
        fs::write(&tier_path, content).unwrap();

        let mut reloaded = CacheStore::new(dir.path());
        reloaded.ensure_loaded().unwrap();

        let mut expected_wads = wads;
        expected_wads.sort();
        let reloaded_wads: Vec<(String, String)> = reloaded
            .wads()
            .unwrap()
            .iter()
            .map(|(name, url)| (name.to_string(), url.clone()))
            .collect();
        assert_eq!(reloaded_wads, expected_wads);

        let mut expected_tiers = tiers;
        expected_tiers.push(("zdoom wad".to_string(), Tier::GzDoom));
        expected_tiers.sort_by(|a, b| a.0.cmp(&b.0));
        let reloaded_tiers: Vec<(String, Tier)> = reloaded
            .tiers()
            .unwrap()
            .iter()
            .map(|(name, tier)| (name.to_string(), *tier))
            .collect();
        assert_eq!(reloaded_tiers, expected_tiers);
        assert_eq!(reloaded.highest_wad().unwrap(), Some(4));
    }

    #[test]
    fn test_tier_file_sorted_after_append() {
        let dir = tempdir().unwrap();
        let mut store = CacheStore::new(dir.path());
        let tiers: NameIndex<Tier> = [
            ("zeta".to_string(), Tier::Boom),
            ("alpha".to_string(), Tier::Mbf),
        ]
        .into_iter()
        .collect();
        store.replace_tiers(tiers).unwrap();
        store
            .append_tiers(vec![("beta".to_string(), Tier::Unknown)])
            .unwrap();

        let content = fs::read_to_string(dir.path().join(TIER_CACHE_FILE)).unwrap();
        assert_eq!(content, "alpha=MBF\nbeta=Unknown\nzeta=Boom\n");
        assert_eq!(store.tiers().unwrap().get("beta"), Some(&Tier::Unknown));
    }

    #[test]
    fn test_malformed_highest_index() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(HIGHEST_WAD_FILE), "many\n").unwrap();
        let store = CacheStore::new(dir.path());
        assert!(store.highest_wad().is_err());
    }
}

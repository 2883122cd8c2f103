//! The query surface: records, stats, random pages and update info.
//!
//! [`DsdaClient`] owns the cache store and a [`PageFetcher`]. Queries resolve
//! names against the local caches, syncing the player and wad listings on
//! first use; the tier cache is never built implicitly because a full compat
//! sync reads every wad page on the site.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dsda_client::client::DsdaClient;
//! use dsda_client::config::ClientConfig;
//! use dsda_client::site::HttpFetcher;
//!
//! let config = ClientConfig::default();
//! let fetcher = HttpFetcher::new(config.timeout).unwrap();
//! let mut client = DsdaClient::new(fetcher, config);
//!
//! client.sync_full().unwrap();
//! let found = client.get_record("scythe", "uvmax", Some("map01")).unwrap();
//! println!("{} by {}", found.record.time, found.record.player);
//! ```

pub mod error;
pub mod sync;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::catalog::resolve::{self, Resolution};
use crate::catalog::{AliasTable, CacheStore, NameIndex};
use crate::config::ClientConfig;
use crate::core::category::CategorySet;
use crate::core::level;
use crate::core::types::{EntityKind, Tier};
use crate::matching::{stats, PlayerStats, PortClassifier, Record, RecordQuery, RecordSelector, WadStats};
use crate::parsing::html;
use crate::site::{PageFetcher, SiteUrls};

pub use error::{ClientError, QueryError};
pub use sync::SyncSummary;

/// A record together with what it was looked up for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub wad: String,
    pub category: String,
    pub level: Option<String>,
    pub tier: Tier,
    pub record: Record,
}

/// A randomly picked player or wad page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomPage {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateInfo {
    pub date: String,
    pub demo_count: usize,
    /// Runners of the update not yet in the player cache, first seen first
    pub new_players: Vec<String>,
}

fn into_exact(resolution: Resolution, kind: EntityKind) -> Result<String, QueryError> {
    match resolution {
        Resolution::Exact(name) => Ok(name),
        Resolution::Ambiguous(candidates) => Err(QueryError::Ambiguous { kind, candidates }),
        Resolution::NotFound => Err(QueryError::NotFound(kind)),
    }
}

pub struct DsdaClient<F: PageFetcher> {
    fetcher: F,
    config: ClientConfig,
    urls: SiteUrls,
    cache: CacheStore,
    aliases: Option<AliasTable>,
    classifier: PortClassifier,
}

impl<F: PageFetcher> DsdaClient<F> {
    pub fn new(fetcher: F, config: ClientConfig) -> Self {
        Self {
            urls: SiteUrls::new(&config.base_url),
            cache: CacheStore::new(config.cache_dir.clone()),
            fetcher,
            config,
            aliases: None,
            classifier: PortClassifier::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    fn fetch(&self, url: &str) -> Result<String, ClientError> {
        Ok(self.fetcher.fetch(url)?)
    }

    /// Load the player cache, syncing it when it was never written
    fn ensure_players(&mut self) -> Result<(), ClientError> {
        self.cache.ensure_loaded()?;
        if self.cache.players().is_none() {
            debug!("No player cache, syncing players");
            self.sync_players()?;
        }
        Ok(())
    }

    /// Load the wad URL cache, syncing it when it was never written
    fn ensure_wads(&mut self) -> Result<(), ClientError> {
        self.cache.ensure_loaded()?;
        if self.cache.wads().is_none() {
            debug!("No wad cache, syncing wads");
            self.sync_wads()?;
        }
        Ok(())
    }

    fn player_index(&self) -> Result<&NameIndex<String>, QueryError> {
        self.cache
            .players()
            .ok_or(QueryError::NotFound(EntityKind::Player))
    }

    fn wad_index(&self) -> Result<&NameIndex<String>, QueryError> {
        self.cache.wads().ok_or(QueryError::NotFound(EntityKind::Wad))
    }

    /// Canonical name and page URL of a player
    fn resolve_player(&mut self, query: &str) -> Result<(String, String), ClientError> {
        self.ensure_players()?;
        let needs_aliases =
            resolve::resolve_exact(query, EntityKind::Player, self.player_index()?).is_none();
        if needs_aliases && self.aliases.is_none() {
            self.aliases = Some(AliasTable::load(&self.config.alias_file)?);
        }

        let players = self.player_index()?;
        let resolution = resolve::resolve(query, EntityKind::Player, players, self.aliases.as_ref());
        let name = into_exact(resolution, EntityKind::Player)?;
        let url = players
            .get(&name)
            .cloned()
            .ok_or(QueryError::NotFound(EntityKind::Player))?;
        Ok((name, url))
    }

    /// Canonical name and page URL of a wad
    fn resolve_wad(&mut self, query: &str) -> Result<(String, String), ClientError> {
        self.ensure_wads()?;
        let wads = self.wad_index()?;
        let name = into_exact(resolve::resolve(query, EntityKind::Wad, wads, None), EntityKind::Wad)?;
        let url = wads
            .get(&name)
            .cloned()
            .ok_or(QueryError::NotFound(EntityKind::Wad))?;
        Ok((name, url))
    }

    /// Every page of a wad: the page itself, plus the pages its navigation
    /// table links when DSDA splits the wad
    fn wad_pages(&self, name: &str, url: &str) -> Result<Vec<String>, ClientError> {
        let mut pages = vec![url.to_string()];
        if !self.config.is_paginated(name) {
            return Ok(pages);
        }
        let first = self.fetch(url)?;
        for link in html::navigation_links(&first)? {
            let page = self.urls.absolute(&link.href);
            if !pages.contains(&page) {
                pages.push(page);
            }
        }
        debug!("{name} spans {} pages", pages.len());
        Ok(pages)
    }

    /// Page of a split wad holding `level`, the first page when no
    /// navigation entry names it
    fn level_page(&self, url: &str, level: &str) -> Result<String, ClientError> {
        let first = self.fetch(url)?;
        let wanted = level::page_label(level);
        let page = html::navigation_links(&first)?
            .into_iter()
            .find(|link| link.label.to_lowercase() == wanted)
            .map_or_else(|| url.to_string(), |link| self.urls.absolute(&link.href));
        Ok(page)
    }

    /// Fastest valid run for a wad, category and optional level.
    ///
    /// Without a level the first level listed on the wad page is searched.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UncachedDependency` before touching the network
    /// when no tier cache exists, and the other `QueryError` variants for
    /// bad arguments, unresolved names and empty results.
    pub fn get_record(
        &mut self,
        wad: &str,
        category: &str,
        level: Option<&str>,
    ) -> Result<RecordReport, ClientError> {
        if wad.trim().is_empty() || category.trim().is_empty() {
            return Err(QueryError::MissingArgument("a wad name and category").into());
        }
        self.cache.ensure_loaded()?;
        if self.cache.tiers().is_none() {
            return Err(QueryError::UncachedDependency.into());
        }

        let categories = CategorySet::lookup(category).ok_or(QueryError::InvalidCategory)?;
        let level = level
            .filter(|l| !l.trim().is_empty())
            .map(level::sanitize_level);

        let (name, url) = self.resolve_wad(wad)?;
        // Tier of the wad the URL cache resolved
        let tier = self
            .cache
            .tiers()
            .and_then(|tiers| tiers.canonical(&name).and_then(|name| tiers.get(name)))
            .copied()
            .ok_or(QueryError::NotFound(EntityKind::WadCompat))?;

        let page = match &level {
            Some(level) if self.config.is_paginated(&name) => self.level_page(&url, level)?,
            _ => url,
        };
        let rows = html::demo_rows(&self.fetch(&page)?)?;

        let selector = RecordSelector::new(&self.classifier, self.urls.base());
        let query = RecordQuery {
            compat: tier,
            categories,
            level: level.as_deref(),
        };
        let record = selector.select(&rows, &query)?;

        Ok(RecordReport {
            wad: name,
            category: categories.primary().to_string(),
            level,
            tier,
            record,
        })
    }

    /// Aggregates over a player's demo page.
    ///
    /// A name with spaces that resolves to nothing is retried once with the
    /// spaces removed.
    pub fn player_stats(&mut self, name: &str) -> Result<PlayerStats, ClientError> {
        if name.trim().is_empty() {
            return Err(QueryError::MissingArgument("a player name").into());
        }
        let (name, url) = match self.resolve_player(name) {
            Err(ClientError::Query(_)) if name.contains(' ') => {
                self.resolve_player(&name.replace(' ', ""))?
            }
            resolved => resolved?,
        };
        let rows = html::all_demo_rows(&self.fetch(&url)?);
        Ok(stats::player_stats(&name, &rows))
    }

    /// Aggregates over every page of a wad
    pub fn wad_stats(&mut self, name: &str) -> Result<WadStats, ClientError> {
        if name.trim().is_empty() {
            return Err(QueryError::MissingArgument("a wad name").into());
        }
        let (name, url) = self.resolve_wad(name)?;
        let rows = self.wad_rows(&name, &url)?;
        Ok(stats::wad_stats(&name, &rows))
    }

    pub fn random_player_page<R: Rng>(
        &mut self,
        rng: &mut R,
    ) -> Result<RandomPage, ClientError> {
        self.ensure_players()?;
        let highest = self
            .cache
            .highest_player()?
            .ok_or(QueryError::NotFound(EntityKind::Player))?;
        let url = self.urls.player(rng.gen_range(1..=highest.max(1)));
        self.random_page(EntityKind::Player, url)
    }

    pub fn random_wad_page<R: Rng>(
        &mut self,
        rng: &mut R,
    ) -> Result<RandomPage, ClientError> {
        self.ensure_wads()?;
        let highest = self
            .cache
            .highest_wad()?
            .ok_or(QueryError::NotFound(EntityKind::Wad))?;
        let url = self.urls.wad(rng.gen_range(1..=highest.max(1)));
        self.random_page(EntityKind::Wad, url)
    }

    fn random_page(&self, kind: EntityKind, url: String) -> Result<RandomPage, ClientError> {
        let index = match kind {
            EntityKind::Player => self.player_index()?,
            EntityKind::Wad | EntityKind::WadCompat => self.wad_index()?,
        };
        match index.name_of(&url) {
            Some(name) => Ok(RandomPage {
                name: name.to_string(),
                url,
            }),
            None => Err(QueryError::UnknownIndex { kind, url }.into()),
        }
    }

    /// Date, demo count and new runners of the latest DSDA update
    pub fn last_update(&mut self) -> Result<UpdateInfo, ClientError> {
        self.ensure_players()?;
        let summary = html::update_summary(&self.fetch(&self.urls.updates())?)?;

        let players = self.player_index()?;
        let mut new_players: Vec<String> = Vec::new();
        for runner in summary.runners {
            if !players.contains_folded(&runner) && !new_players.contains(&runner) {
                new_players.push(runner);
            }
        }

        Ok(UpdateInfo {
            date: summary.date,
            demo_count: summary.demo_count,
            new_players,
        })
    }
}

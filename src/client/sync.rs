//! Cache synchronisation.
//!
//! | Operation | Reads | Rewrites |
//! |-----------|-------|----------|
//! | [`DsdaClient::sync_players`] | `players.html` | player cache, highest player |
//! | [`DsdaClient::sync_wads`] | `wadlist1..N.html` | wad cache, highest wad |
//! | [`DsdaClient::sync_compats_full`] | every wad page | tier cache |
//! | [`DsdaClient::sync_compats_new`] | `wad{n}.html` past the highest wad | tier cache (appended) |

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::NameIndex;
use crate::core::row::TableRow;
use crate::core::types::Tier;
use crate::matching::CompatEstimator;
use crate::parsing::html::{self, ListEntry};
use crate::site::PageFetcher;

use super::{ClientError, DsdaClient};

/// Wads between progress messages during a full compat sync
const PROGRESS_INTERVAL: usize = 250;

/// What a full sync did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub players: usize,
    pub wads: usize,
    /// Wads whose tier was (re)estimated
    pub compats: usize,
    /// Whether every wad was re-estimated rather than only new ones
    pub full_compat_sync: bool,
}

impl<F: PageFetcher> DsdaClient<F> {
    /// Turn listing entries into an index of absolute URLs and the highest
    /// page index they link to
    fn index_entries(&self, entries: Vec<ListEntry>) -> (NameIndex<String>, Option<u64>) {
        let highest = entries
            .iter()
            .filter_map(|entry| html::first_index(&entry.href))
            .max();
        let index = entries
            .into_iter()
            .map(|entry| {
                let url = self.urls.absolute(&entry.href);
                (entry.name, url)
            })
            .collect();
        (index, highest)
    }

    /// Players, then compats (all of them when no tier cache exists, only
    /// new wads otherwise), then wads
    pub fn sync_full(&mut self) -> Result<SyncSummary, ClientError> {
        let mut summary = SyncSummary {
            players: self.sync_players()?,
            ..SyncSummary::default()
        };

        if self.cache.has_tier_file() {
            self.cache.ensure_loaded()?;
            summary.compats = self.sync_compats_new()?;
        } else {
            summary.compats = self.sync_compats_full()?;
            summary.full_compat_sync = true;
        }

        summary.wads = self.sync_wads()?;
        Ok(summary)
    }

    /// Rewrite the player cache from `players.html`
    pub fn sync_players(&mut self) -> Result<usize, ClientError> {
        let page = self.fetch(&self.urls.players())?;
        let (players, highest) = self.index_entries(html::player_list(&page)?);
        let count = players.len();
        self.cache.replace_players(players, highest)?;
        info!("Synced {count} players");
        Ok(count)
    }

    /// Rewrite the wad cache from every wad list page
    pub fn sync_wads(&mut self) -> Result<usize, ClientError> {
        let pages: Vec<String> = (1..=self.config.wad_list_pages)
            .map(|page| self.urls.wad_list(page))
            .collect();
        let mut entries = Vec::new();
        for (page, body) in pages.iter().zip(self.fetcher.fetch_all(&pages)?) {
            let listed = html::wad_list(&body);
            debug!("{page}: {} wads", listed.len());
            entries.extend(listed);
        }
        let (wads, highest) = self.index_entries(entries);
        let count = wads.len();
        self.cache.replace_wads(wads, highest)?;
        info!("Synced {count} wads");
        Ok(count)
    }

    /// Demo rows of every page of a wad, in page order
    pub(super) fn wad_rows(&self, name: &str, url: &str) -> Result<Vec<TableRow>, ClientError> {
        let pages = self.wad_pages(name, url)?;
        let mut rows = Vec::new();
        for body in self.fetcher.fetch_all(&pages)? {
            rows.extend(html::demo_rows(&body)?);
        }
        Ok(rows)
    }

    /// Re-estimate the tier of every cached wad. Reads every wad page on the
    /// site, so this is slow.
    pub fn sync_compats_full(&mut self) -> Result<usize, ClientError> {
        self.ensure_wads()?;
        let wads: Vec<(String, String)> = self
            .wad_index()?
            .iter()
            .map(|(name, url)| (name.to_string(), url.clone()))
            .collect();
        info!("Estimating compats for {} wads", wads.len());

        let estimator = CompatEstimator::new(&self.classifier);
        let mut tiers = NameIndex::new();
        for (i, (name, url)) in wads.iter().enumerate() {
            let rows = self.wad_rows(name, url)?;
            let estimate = estimator.estimate(&rows, url);
            debug!("{name}: {}", estimate.tier);
            tiers.insert(name.clone(), estimate.tier);

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                info!("Estimated {}/{} wads", i + 1, wads.len());
            }
        }

        let count = tiers.len();
        self.cache.replace_tiers(tiers)?;
        info!("Synced {count} compats");
        Ok(count)
    }

    /// Estimate tiers for wads added since the last wad sync.
    ///
    /// Walks `wad{n}.html` upwards from the highest known index until DSDA
    /// serves a page without a title or a 404.
    pub fn sync_compats_new(&mut self) -> Result<usize, ClientError> {
        let highest = match self.cache.highest_wad()? {
            Some(highest) => highest,
            None => {
                self.sync_wads()?;
                self.cache.highest_wad()?.unwrap_or(0)
            }
        };

        let estimator = CompatEstimator::new(&self.classifier);
        let mut added: Vec<(String, Tier)> = Vec::new();
        for index in highest + 1.. {
            let url = self.urls.wad(index);
            let body = match self.fetcher.fetch(&url) {
                Ok(body) => body,
                Err(e) if e.is_not_found() => break,
                Err(e) => return Err(e.into()),
            };
            let Some(title) = html::wad_title(&body) else {
                break;
            };
            let rows = html::demo_rows(&body)?;
            let estimate = estimator.estimate(&rows, &url);
            info!("New wad {title}: {}", estimate.tier);
            added.push((title, estimate.tier));
        }

        let count = added.len();
        self.cache.append_tiers(added)?;
        Ok(count)
    }
}

//! Player and wad aggregates.
//!
//! Run counts and times follow DSDA's own convention of leaving FDAs out.

use chrono::TimeDelta;
use serde::Serialize;
use tracing::debug;

use crate::core::row::TableRow;
use crate::core::time::{self, TimeSummary};

const FDA_CATEGORY: &str = "FDA";

/// Counts keyed by name, in first-seen order
#[derive(Debug, Clone, Default)]
struct Tally {
    counts: Vec<(String, usize)>,
}

impl Tally {
    fn bump(&mut self, name: &str) {
        match self.counts.iter_mut().find(|(n, _)| n == name) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((name.to_string(), 1)),
        }
    }

    /// Highest count, first seen wins ties
    fn top(&self) -> Option<NamedCount> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.counts {
            if best.map_or(true, |(_, n)| entry.1 > *n) {
                best = Some(entry);
            }
        }
        best.map(|(name, count)| NamedCount {
            name: name.clone(),
            count: *count,
        })
    }

    fn len(&self) -> usize {
        self.counts.len()
    }

    fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    pub player_name: String,
    pub total_run_count: usize,
    pub tas_run_count: usize,
    pub num_distinct_wads: usize,
    pub max_wad: Option<NamedCount>,
    pub max_category: Option<NamedCount>,
    pub average_runs_per_wad: u64,
    pub total_time: Option<String>,
    pub average_time: Option<String>,
    pub longest_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WadStats {
    pub wad_name: String,
    pub total_run_count: usize,
    pub num_distinct_players: usize,
    pub max_player: Option<NamedCount>,
    pub total_time: Option<String>,
    pub average_time: Option<String>,
}

fn demo_time(time_text: &str) -> Option<TimeDelta> {
    let token = time::first_token(time_text);
    let parsed = time::parse_duration(token);
    if parsed.is_none() {
        debug!("Skipping unparsable demo time {token:?}");
    }
    parsed
}

fn is_fda(category: &str) -> bool {
    category.trim() == FDA_CATEGORY
}

/// Aggregate a player page's demo rows
pub fn player_stats(player_name: &str, rows: &[TableRow]) -> PlayerStats {
    let mut run_count = 0;
    let mut tas_run_count = 0;
    let mut num_distinct_wads = 0;
    let mut times = TimeSummary::default();
    let mut wads = Tally::default();
    let mut categories = Tally::default();
    let mut wad: Option<String> = None;
    let mut category: Option<String> = None;

    for row in rows.iter().filter(|row| row.carries_run()) {
        if row.opens_category() {
            if row.is_top_row() {
                wad = row.cells[0].child_text.clone();
                num_distinct_wads += 1;
            }
            category = row.category_cell().and_then(|c| c.text.clone());
        }

        let time_text = row.time_text();
        if time_text.contains("TAS") {
            tas_run_count += 1;
        }

        let Some(category) = category.as_deref() else {
            continue;
        };
        if is_fda(category) {
            continue;
        }
        run_count += 1;
        if let Some(t) = demo_time(time_text) {
            times.add(t);
        }
        categories.bump(category);
        if let Some(wad) = wad.as_deref() {
            wads.bump(wad);
        }
    }

    let average_runs_per_wad = if wads.len() > 0 {
        (wads.total() as f64 / wads.len() as f64).round_ties_even() as u64
    } else {
        0
    };

    PlayerStats {
        player_name: player_name.to_string(),
        total_run_count: run_count,
        tas_run_count,
        num_distinct_wads,
        max_wad: wads.top(),
        max_category: categories.top(),
        average_runs_per_wad,
        total_time: time::format_hms(times.total),
        average_time: time::format_hms(times.average()),
        longest_time: times.longest.and_then(time::format_hms),
    }
}

/// Aggregate the demo rows of every page of a wad
pub fn wad_stats<'r, I>(wad_name: &str, rows: I) -> WadStats
where
    I: IntoIterator<Item = &'r TableRow>,
{
    let mut run_count = 0;
    let mut times = TimeSummary::default();
    let mut players = Tally::default();
    let mut category: Option<String> = None;

    for row in rows.into_iter().filter(|row| row.carries_run()) {
        if row.opens_category() {
            category = row.category_cell().and_then(|c| c.text.clone());
        }
        let Some(category) = category.as_deref() else {
            continue;
        };
        if is_fda(category) {
            continue;
        }

        run_count += 1;
        if let Some(t) = demo_time(row.time_text()) {
            times.add(t);
        }
        // Co-op cells nest the runners in links and carry no leading text
        if let Some(player) = row.player_cell().and_then(|c| c.text.as_deref()) {
            players.bump(player);
        }
    }

    WadStats {
        wad_name: wad_name.to_string(),
        total_run_count: run_count,
        num_distinct_players: players.len(),
        max_player: players.top(),
        total_time: time::format_hms(times.total),
        average_time: time::format_hms(times.average()),
    }
}

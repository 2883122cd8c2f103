use clap::Args;

use crate::cli::OutputFormat;
use crate::client::DsdaClient;
use crate::matching::{NamedCount, PlayerStats, WadStats};
use crate::site::PageFetcher;

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct NameArgs {
    /// Name; separate words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

impl NameArgs {
    pub fn joined(&self) -> String {
        self.name.join(" ")
    }
}

/// Execute playerstats
///
/// # Errors
///
/// Returns an error if the player cannot be resolved or the page read.
pub fn run_player<F: PageFetcher>(
    client: &mut DsdaClient<F>,
    args: &NameArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let stats = client.player_stats(&args.joined())?;

    match format {
        OutputFormat::Text => print_text_player(&stats),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }

    Ok(())
}

/// Execute wadstats
///
/// # Errors
///
/// Returns an error if the wad cannot be resolved or a page read.
pub fn run_wad<F: PageFetcher>(
    client: &mut DsdaClient<F>,
    args: &NameArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let stats = client.wad_stats(&args.joined())?;

    match format {
        OutputFormat::Text => print_text_wad(&stats),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }

    Ok(())
}

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("None")
}

/// `name, N demos`, or `None, no demos` when nothing was counted
fn most(value: Option<&NamedCount>) -> String {
    match value {
        Some(NamedCount { name, count }) => format!("{name}, {count} demos"),
        None => "None, no demos".to_string(),
    }
}

fn print_text_player(stats: &PlayerStats) {
    println!("Player name: {}", stats.player_name);
    println!("Total demo count: {}", stats.total_run_count);
    println!("Total demo time: {}", or_none(stats.total_time.as_deref()));
    println!("Longest demo: {}", or_none(stats.longest_time.as_deref()));
    println!("Average demo time: {}", or_none(stats.average_time.as_deref()));
    println!("Total TAS demo count: {}", stats.tas_run_count);
    println!("Average demos recorded per wad: {}", stats.average_runs_per_wad);
    println!("Number of distinct wads recorded for: {}", stats.num_distinct_wads);
    println!("Maximum recorded wad: {}", most(stats.max_wad.as_ref()));
    println!("Maximum recorded category: {}", most(stats.max_category.as_ref()));
}

fn print_text_wad(stats: &WadStats) {
    println!("Wad name: {}", stats.wad_name);
    println!("Total demo count: {}", stats.total_run_count);
    println!("Total demo time: {}", or_none(stats.total_time.as_deref()));
    println!("Average demo time: {}", or_none(stats.average_time.as_deref()));
    println!("Number of players: {}", stats.num_distinct_players);
    println!("Player with most demos: {}", most(stats.max_player.as_ref()));
}

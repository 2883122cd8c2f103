//! Command-line interface for dsda-client.
//!
//! This module implements the CLI using clap. Every command can be run once
//! from the shell or typed at the interactive prompt, which starts when no
//! command is given:
//!
//! - **sync** (`s`): Rebuild the player, wad and compat caches
//! - **get_record** (`gr`, `g`): Fastest valid run for a wad, category and level
//! - **playerstats** (`ps`, `p`): Aggregates over a player's demos
//! - **wadstats** (`ws`, `w`): Aggregates over a wad's demos
//! - **random_player_page** (`rpp`, `rp`): A random player page
//! - **random_wad_page** (`rwp`, `rw`): A random wad page
//! - **last_dsda_update** (`ldu`, `l`): Date and new runners of the last update
//!
//! ## Usage
//!
//! ```text
//! # Interactive prompt
//! dsda-client
//!
//! # Build the caches (slow the first time)
//! dsda-client sync
//!
//! # Record lookup; names with spaces go in quotes
//! dsda-client get_record scythe uvmax 1
//! dsda-client gr "2 (1994)" nm100 map05
//!
//! # JSON output for scripting
//! dsda-client --format json playerstats 4shockblast
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::client::DsdaClient;
use crate::config::{self, ClientConfig};
use crate::site::PageFetcher;

pub mod pages;
pub mod record;
pub mod repl;
pub mod stats;
pub mod sync;

#[derive(Parser)]
#[command(name = "dsda-client")]
#[command(author = "4shockblast")]
#[command(version)]
#[command(about = "Look up records and stats on the Doom Speed Demo Archive")]
#[command(
    long_about = "dsda-client reads the Doom Speed Demo Archive (DSDA) pages and answers questions about them.\n\nIt keeps a local cache of player and wad pages and a guessed compatibility level per wad, and uses them to:\n- Find the fastest run for a wad, category and level that was recorded on a compatible port\n- Summarise a player's or a wad's demos\n- Point at a random player or wad page\n\nRun without a command to start the interactive prompt."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding the sync caches
    #[arg(long, global = true, env = "DSDA_CACHE_DIR", default_value = ".")]
    pub cache_dir: PathBuf,

    /// Player alias table (JSON)
    #[arg(long, global = true, env = "DSDA_ALIASES", default_value = config::DEFAULT_ALIAS_FILE)]
    pub aliases: PathBuf,

    /// Site root
    #[arg(long, global = true, env = "DSDA_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of wad list pages to read during sync
    #[arg(long, global = true, default_value_t = config::DEFAULT_WAD_LIST_PAGES)]
    pub wad_list_pages: usize,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            cache_dir: self.cache_dir.clone(),
            alias_file: self.aliases.clone(),
            timeout: Duration::from_secs(self.timeout),
            wad_list_pages: self.wad_list_pages,
            ..ClientConfig::default()
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sync player URLs, wad URLs and wad compat guesses to the local cache
    #[command(name = "sync", visible_alias = "s")]
    Sync,

    /// Get the record for a wad, category and optional level
    #[command(name = "get_record", visible_aliases = ["gr", "g"])]
    GetRecord(record::RecordArgs),

    /// Get stats for a player
    #[command(name = "playerstats", visible_aliases = ["ps", "p"])]
    PlayerStats(stats::NameArgs),

    /// Get stats for a wad
    #[command(name = "wadstats", visible_aliases = ["ws", "w"])]
    WadStats(stats::NameArgs),

    /// Print a random player page URL
    #[command(name = "random_player_page", visible_aliases = ["rpp", "rp"])]
    RandomPlayerPage,

    /// Print a random wad page URL
    #[command(name = "random_wad_page", visible_aliases = ["rwp", "rw"])]
    RandomWadPage,

    /// Print the date of the last DSDA update
    #[command(name = "last_dsda_update", visible_aliases = ["ldu", "l"])]
    LastDsdaUpdate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Run one command against the client
///
/// # Errors
///
/// Returns the client error of the query (a `ClientError` inside the
/// `anyhow::Error`) or an output serialization error.
pub fn execute<F: PageFetcher>(
    client: &mut DsdaClient<F>,
    command: Commands,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Sync => sync::run(client, format),
        Commands::GetRecord(args) => record::run(client, &args, format),
        Commands::PlayerStats(args) => stats::run_player(client, &args, format),
        Commands::WadStats(args) => stats::run_wad(client, &args, format),
        Commands::RandomPlayerPage => pages::run_random_player(client, format),
        Commands::RandomWadPage => pages::run_random_wad(client, format),
        Commands::LastDsdaUpdate => pages::run_last_update(client, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_aliases() {
        let cli = Cli::try_parse_from(["dsda-client", "gr", "scythe", "uvmax", "1"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::GetRecord(record::RecordArgs {
                wad: "scythe".to_string(),
                category: "uvmax".to_string(),
                level: Some("1".to_string()),
            }))
        );

        let cli = Cli::try_parse_from(["dsda-client", "ldu"]).unwrap();
        assert_eq!(cli.command, Some(Commands::LastDsdaUpdate));
    }

    #[test]
    fn test_no_command_starts_prompt() {
        let cli = Cli::try_parse_from(["dsda-client", "--format", "json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_client_config_from_flags() {
        let cli = Cli::try_parse_from([
            "dsda-client",
            "--cache-dir",
            "/tmp/dsda",
            "--timeout",
            "5",
            "sync",
        ])
        .unwrap();
        let config = cli.client_config();
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/dsda"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.is_paginated("doom2"));
    }
}

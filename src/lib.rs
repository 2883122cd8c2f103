//! # dsda-client
//!
//! A library and command-line client for the Doom Speed Demo Archive (DSDA).
//!
//! DSDA lists thousands of wads, each with a table of recorded demos per level
//! and category, but it does not say which source port a wad needs. A record
//! set on GZDoom is no use to someone running a limit-removing wad on
//! Chocolate Doom. `dsda-client` guesses a compatibility tier for every wad
//! from the ports its demos were recorded with, and only counts runs on
//! compatible ports when it looks up a record.
//!
//! ## Features
//!
//! - **Compat estimation**: Port label histogram per wad, with PrBoom
//!   complevels folded into the vanilla/Boom/MBF tiers
//! - **Record lookup**: Fastest non-TAS, non-co-op run on a compatible port
//!   for a wad, category and level, with category fallbacks
//! - **Name resolution**: Case-insensitive substring lookup of wads and
//!   players, plus a player alias table
//! - **Stats**: Demo counts and times per player and per wad
//! - **Local caches**: Flat `name=value` files rebuilt by sync
//!
//! ## Example
//!
//! ```rust,no_run
//! use dsda_client::{ClientConfig, DsdaClient, HttpFetcher};
//!
//! let config = ClientConfig::default();
//! let fetcher = HttpFetcher::new(config.timeout).unwrap();
//! let mut client = DsdaClient::new(fetcher, config);
//!
//! let stats = client.wad_stats("scythe").unwrap();
//! println!("{}: {} demos", stats.wad_name, stats.total_run_count);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Name indexes, cache files, aliases and name resolution
//! - [`client`]: The query surface and sync
//! - [`core`]: Demo rows, tiers, categories, levels and times
//! - [`matching`]: Port classification, compat estimation, record selection and stats
//! - [`parsing`]: DSDA page parsing
//! - [`site`]: Page fetching and URL layout
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod site;

// Re-export commonly used types for convenience
pub use client::{ClientError, DsdaClient, QueryError};
pub use config::ClientConfig;
pub use core::types::*;
pub use matching::{PlayerStats, PortClassifier, Record, WadStats};
pub use site::{HttpFetcher, PageFetcher};

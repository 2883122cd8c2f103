//! Local caches of DSDA's player, wad and tier listings.
//!
//! A sync scrapes DSDA once and writes plain `<name>=<value>` files to the
//! cache directory; every query afterwards resolves names against those
//! files instead of the site.
//!
//! - [`CacheStore`]: reads and rewrites the cache files
//! - [`NameIndex`]: name lookup with case-insensitive fallback
//! - [`AliasTable`]: hand-maintained player aliases
//! - [`resolve`]: free-text name resolution
//!
//! ## Example
//!
//! ```rust
//! use dsda_client::catalog::{resolve, NameIndex, Resolution};
//! use dsda_client::core::EntityKind;
//!
//! let wads: NameIndex<String> = [("scythe".to_string(), "wad1.html".to_string())]
//!     .into_iter()
//!     .collect();
//!
//! let found = resolve::resolve("Scythe.wad", EntityKind::Wad, &wads, None);
//! assert_eq!(found, Resolution::Exact("scythe".to_string()));
//! ```

pub mod aliases;
pub mod index;
pub mod resolve;
pub mod store;

pub use aliases::AliasTable;
pub use index::NameIndex;
pub use resolve::{Candidate, Resolution};
pub use store::{CacheError, CacheStore};

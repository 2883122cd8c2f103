//! Compatibility estimation, record selection and statistics over DSDA tables.
//!
//! - [`PortClassifier`]: maps a source port label to a [`Tier`](crate::core::Tier)
//! - [`CompatEstimator`]: guesses a wad's tier from the ports of its runs
//! - [`RecordSelector`]: finds the fastest valid run for a wad, category and level
//! - [`stats`]: player and wad aggregates
//!
//! ## Compatibility estimation
//!
//! Every run row votes for the tier of its port. Bare PrBoom votes carry no
//! information on their own, so they are folded into the most frequent of
//! limit-removing, Boom and MBF before the majority is taken:
//!
//! 1. **Classify**: first matching port rule, PrBoom resolved by complevel
//! 2. **Redistribute**: PrBoom count moves to the best resolvable tier
//! 3. **Majority**: highest count, earliest seen on ties
//!
//! ## Example
//!
//! ```rust
//! use dsda_client::core::{Cell, TableRow, Tier};
//! use dsda_client::matching::{CompatEstimator, PortClassifier};
//!
//! let rows = vec![TableRow::new(
//!     "row1",
//!     vec![
//!         Cell::text("Player"),
//!         Cell::text("MBF v2.03"),
//!         Cell::link("1:23", "lmps/a.zip", ""),
//!     ],
//! )];
//!
//! let classifier = PortClassifier::new();
//! let estimate = CompatEstimator::new(&classifier).estimate(&rows, "example");
//! assert_eq!(estimate.tier, Tier::Mbf);
//! ```

pub mod classifier;
pub mod estimator;
pub mod selector;
pub mod stats;

pub use classifier::PortClassifier;
pub use estimator::{CompatEstimator, Estimate, TierHistogram};
pub use selector::{NoQualifyingRecord, Record, RecordQuery, RecordSelector};
pub use stats::{NamedCount, PlayerStats, WadStats};

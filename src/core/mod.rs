//! Core data types shared by the matching, parsing and catalog layers.
//!
//! - [`Tier`]: compatibility tier of a wad or port
//! - [`TableRow`], [`Cell`]: owned snapshot of a DSDA table row
//! - [`CategorySet`]: the DSDA categories a record query accepts
//! - [`time`]: demo time parsing, ranking keys and formatting
//! - [`level`]: level query normalization
//!
//! ## Row layout
//!
//! | Cells | Row kind | Columns |
//! |-------|----------|---------|
//! | ≥5    | level header | level, category, player, port, time |
//! | 4     | category header | category, player, port, time |
//! | 3     | run | player, port, time |

pub mod category;
pub mod level;
pub mod row;
pub mod time;
pub mod types;

pub use category::CategorySet;
pub use row::{Cell, TableRow};
pub use types::{EntityKind, Tier};

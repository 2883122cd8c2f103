//! Parsers for the HTML pages DSDA serves.
//!
//! DSDA pages carry almost no ids or classes beyond the row classes, so the
//! parsers lean on page structure:
//!
//! | Page | Source | Extracted |
//! |------|--------|-----------|
//! | `wad{n}.html` | first `<table>` | demo rows ([`TableRow`](crate::core::TableRow)) |
//! | `wad{n}.html` | second `<table>` | pagination links of split wads |
//! | `wad{n}.html` | `th[colspan="5"]` | wad title |
//! | `player{n}lmps.html` | every demo row | demo rows |
//! | `players.html` | `row1`/`row2` rows | player names and page links |
//! | `wadlist{n}.html` | `row1`/`row2` rows | wad names and page links |
//! | `updates.html` | `span.date`, `span.lmp` | last update summary |
//!
//! ## Example
//!
//! ```rust
//! use dsda_client::parsing::html::demo_rows;
//!
//! let page = r#"<table>
//!   <tr class="row1"><th>Player</th><th>Port</th><th>Time</th></tr>
//!   <tr class="row2"><td>Alice</td><td>Boom v2.02</td><td><a href="lmps/a.zip">1:23</a></td></tr>
//! </table>"#;
//!
//! let rows = demo_rows(page).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].port(), "Boom v2.02");
//! ```

pub mod html;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Page has no table #{0}")]
    MissingTable(usize),

    #[error("Page is missing {0}")]
    MissingElement(&'static str),
}

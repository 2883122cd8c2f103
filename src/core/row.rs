//! Owned snapshot of the table rows DSDA renders demos in.
//!
//! DSDA lays a wad page out as one table where the number of cells in a row
//! says what the row is: a level header carries the level and category cells
//! in front of the run cells, a category header carries only the category,
//! and a continuation row carries just player, port and time.

use serde::Serialize;

/// Rows with at least this many cells open a new level
pub const LEVEL_ROW_CELLS: usize = 5;
/// Rows with exactly this many cells open a new category within a level
pub const CATEGORY_ROW_CELLS: usize = 4;
/// Rows with fewer cells than this are padding and carry no run
pub const RUN_ROW_CELLS: usize = 3;

/// A single `<td>`/`<th>` of a table row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Text before the first nested element, `None` when there is none
    pub text: Option<String>,
    /// All text inside the cell, nested elements included
    pub content: String,
    /// Number of nested elements
    pub children: usize,
    /// Full text of the first nested element
    pub child_text: Option<String>,
    /// `href` of the first nested element
    pub href: Option<String>,
}

impl Cell {
    /// Plain text cell with no nested elements
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            content: text.clone(),
            text: Some(text),
            ..Self::default()
        }
    }

    /// Cell wrapping a single link, e.g. `<td><a href="..">1:23</a> TAS</td>`
    pub fn link(text: impl Into<String>, href: impl Into<String>, trailing: &str) -> Self {
        let text = text.into();
        Self {
            text: None,
            content: format!("{text}{trailing}"),
            children: 1,
            child_text: Some(text),
            href: Some(href.into()),
        }
    }

    /// Leading text trimmed, empty when absent
    pub fn label(&self) -> &str {
        self.text.as_deref().map_or("", str::trim)
    }

    pub fn has_children(&self) -> bool {
        self.children > 0
    }
}

/// One `<tr>` of a DSDA table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Value of the row's `class` attribute (`row1`, `row2top`, ...)
    pub class: String,
    pub cells: Vec<Cell>,
}

impl TableRow {
    pub fn new(class: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            class: class.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell counted from the end, `from_end(1)` being the last one
    pub fn from_end(&self, n: usize) -> Option<&Cell> {
        if n == 0 {
            return None;
        }
        self.cells.len().checked_sub(n).map(|i| &self.cells[i])
    }

    pub fn carries_run(&self) -> bool {
        self.cells.len() >= RUN_ROW_CELLS
    }

    pub fn opens_level(&self) -> bool {
        self.cells.len() >= LEVEL_ROW_CELLS
    }

    pub fn opens_category(&self) -> bool {
        self.cells.len() >= CATEGORY_ROW_CELLS
    }

    /// Rows heading a new wad on a player page
    pub fn is_top_row(&self) -> bool {
        self.class == "row1top" || self.class == "row2top"
    }

    pub fn time_cell(&self) -> Option<&Cell> {
        self.from_end(1)
    }

    pub fn port_cell(&self) -> Option<&Cell> {
        self.from_end(2)
    }

    pub fn player_cell(&self) -> Option<&Cell> {
        self.from_end(3)
    }

    pub fn category_cell(&self) -> Option<&Cell> {
        self.from_end(4)
    }

    /// Source port label of a run row
    pub fn port(&self) -> &str {
        self.port_cell().map_or("", Cell::label)
    }

    /// Full time text, markers such as `TAS` or `CO` included
    pub fn time_text(&self) -> &str {
        self.time_cell().map_or("", |c| c.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_row() -> TableRow {
        TableRow::new(
            "row1",
            vec![
                Cell::text("Player"),
                Cell::text("PRBoom-plus 2.5.1.4cl9"),
                Cell::link("1:23", "lmps/a.zip", " TAS"),
            ],
        )
    }

    #[test]
    fn test_from_end_indexes_backwards() {
        let row = run_row();
        assert_eq!(row.from_end(1).unwrap().content, "1:23 TAS");
        assert_eq!(row.port(), "PRBoom-plus 2.5.1.4cl9");
        assert_eq!(row.player_cell().unwrap().label(), "Player");
        assert!(row.category_cell().is_none());
        assert!(row.from_end(0).is_none());
    }

    #[test]
    fn test_row_kind_thresholds() {
        let mut row = run_row();
        assert!(row.carries_run());
        assert!(!row.opens_category());
        row.cells.insert(0, Cell::text("UV Max"));
        assert!(row.opens_category());
        assert!(!row.opens_level());
        row.cells.insert(0, Cell::text("Map01"));
        assert!(row.opens_level());
    }

    #[test]
    fn test_link_cell_has_no_leading_text() {
        let cell = Cell::link("wad", "wad1.html", "");
        assert_eq!(cell.label(), "");
        assert!(cell.has_children());
        assert_eq!(cell.child_text.as_deref(), Some("wad"));
    }
}

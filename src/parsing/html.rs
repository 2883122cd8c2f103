use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::core::row::{Cell, TableRow};
use crate::parsing::ParseError;

const DEMO_ROWS: &str = r#"tr[class="row1"], tr[class="row2"], tr[class="row1top"], tr[class="row2top"]"#;
const LIST_ROWS: &str = r#"tr[class="row1"], tr[class="row2"]"#;

/// A named link from a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    /// Link relative to the site root, e.g. `wad12.html`
    pub href: String,
}

/// One page link of a split wad's navigation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Link text, the level the page starts at
    pub label: String,
    pub href: String,
}

/// What `updates.html` says about the latest update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    pub date: String,
    pub demo_count: usize,
    /// Runner of every listed demo, in page order, duplicates kept
    pub runners: Vec<String>,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selectors are valid")
}

fn tables(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&selector("table")).collect()
}

fn nth_table<'a>(document: &'a Html, index: usize) -> Result<ElementRef<'a>, ParseError> {
    tables(document)
        .get(index)
        .copied()
        .ok_or(ParseError::MissingTable(index + 1))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Snapshot a `<td>`/`<th>`: leading text stops at the first non-text node
pub fn read_cell(element: ElementRef<'_>) -> Cell {
    let mut leading: Option<String> = None;
    for node in element.children() {
        match node.value().as_text() {
            Some(text) => leading.get_or_insert_with(String::new).push_str(text),
            None => break,
        }
    }

    let first_child = child_elements(element).next();
    Cell {
        text: leading,
        content: text_of(element),
        children: child_elements(element).count(),
        child_text: first_child.map(text_of),
        href: first_child
            .and_then(|child| child.value().attr("href"))
            .map(str::to_string),
    }
}

/// Snapshot a `<tr>`, one cell per child element
pub fn read_row(element: ElementRef<'_>) -> TableRow {
    let class = element.value().attr("class").unwrap_or_default();
    TableRow::new(class, child_elements(element).map(read_cell).collect())
}

/// Demo rows of a wad page's first table, header row skipped.
///
/// # Errors
///
/// Returns `ParseError::MissingTable` if the page has no table.
pub fn demo_rows(page: &str) -> Result<Vec<TableRow>, ParseError> {
    let document = Html::parse_document(page);
    let table = nth_table(&document, 0)?;
    Ok(table.select(&selector(DEMO_ROWS)).skip(1).map(read_row).collect())
}

/// Demo rows anywhere on the page, header row skipped. Used for player pages.
pub fn all_demo_rows(page: &str) -> Vec<TableRow> {
    let document = Html::parse_document(page);
    let rows = selector(DEMO_ROWS);
    document.select(&rows).skip(1).map(read_row).collect()
}

/// Page links of a split wad, read from the second table.
///
/// Padding cells without a link are skipped.
///
/// # Errors
///
/// Returns `ParseError::MissingTable` if the page has no second table.
pub fn navigation_links(page: &str) -> Result<Vec<NavLink>, ParseError> {
    let document = Html::parse_document(page);
    let table = nth_table(&document, 1)?;

    let mut links = Vec::new();
    for row in table.select(&selector(LIST_ROWS)) {
        for cell in child_elements(row) {
            let Some(href) = child_elements(cell)
                .next()
                .and_then(|child| child.value().attr("href"))
            else {
                continue;
            };
            links.push(NavLink {
                label: text_of(cell).trim().to_string(),
                href: href.to_string(),
            });
        }
    }
    Ok(links)
}

/// Players listed on `players.html`.
///
/// Players with a profile nest their name in a link; the others carry it as
/// plain text. The demo page link sits in the second cell.
///
/// # Errors
///
/// Returns `ParseError::MissingElement` if a player row has no page link.
pub fn player_list(page: &str) -> Result<Vec<ListEntry>, ParseError> {
    let document = Html::parse_document(page);
    let mut players = Vec::new();

    for row in document.select(&selector(LIST_ROWS)).skip(1).map(read_row) {
        if row.len() < 2 {
            continue;
        }
        let name_cell = &row.cells[0];
        let name = if name_cell.has_children() {
            name_cell.child_text.clone().unwrap_or_default()
        } else {
            name_cell.text.clone().unwrap_or_default()
        };
        let href = row.cells[1]
            .href
            .clone()
            .ok_or(ParseError::MissingElement("player page link"))?;
        players.push(ListEntry { name, href });
    }
    Ok(players)
}

/// Wads listed on one `wadlist{n}.html` page
pub fn wad_list(page: &str) -> Vec<ListEntry> {
    let document = Html::parse_document(page);
    document
        .select(&selector(LIST_ROWS))
        .skip(1)
        .map(read_row)
        .filter_map(|row| {
            let cell = row.cells.first()?;
            Some(ListEntry {
                name: cell.child_text.clone()?,
                href: cell.href.clone()?,
            })
        })
        .collect()
}

/// Title of a wad page, `None` when DSDA rendered the empty placeholder
/// it serves for indices past the last wad
pub fn wad_title(page: &str) -> Option<String> {
    let document = Html::parse_document(page);
    let header = document.select(&selector(r#"th[colspan="5"]"#)).next()?;
    let title = child_elements(header).next().map(text_of)?;
    (!title.is_empty()).then_some(title)
}

/// Date and demos of the latest update.
///
/// # Errors
///
/// Returns `ParseError::MissingElement` if the page has no date.
pub fn update_summary(page: &str) -> Result<UpdateSummary, ParseError> {
    let document = Html::parse_document(page);
    let date = document
        .select(&selector("span.date"))
        .next()
        .map(|span| read_cell(span).text.unwrap_or_default())
        .ok_or(ParseError::MissingElement("update date"))?;

    let runners: Vec<String> = document
        .select(&selector("span.lmp"))
        .map(|span| {
            let text = text_of(span);
            text.rsplit(" by ").next().unwrap_or_default().to_string()
        })
        .collect();

    Ok(UpdateSummary {
        date,
        demo_count: runners.len(),
        runners,
    })
}

/// First integer in a link, e.g. `12` for `player12lmps.html`
pub fn first_index(href: &str) -> Option<u64> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static pattern is valid"));
    digits.find(href)?.as_str().parse().ok()
}

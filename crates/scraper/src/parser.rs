// ABOUTME: Extracts candidate records from the portal's candidate table HTML.
// ABOUTME: Cell positions come from a ColumnLayout rather than being baked into the parsing code.

//! Candidate table parsing.
//!
//! The portal returns an HTML fragment with one `<tr>` per candidate. Only `<td>`
//! cells are counted; the serial number is a `<th>` and never shifts the ordinals.
//!
//! Key behaviors:
//! - Rows with fewer data cells than the layout needs are skipped.
//! - Rows whose name cell is empty are skipped (spacer rows).
//! - A photo cell without an `<img>` yields an empty photo URL.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::Candidate;

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

/// Highest cell ordinal a layout may reference.
pub const MAX_ORDINAL: usize = 64;

/// Zero-based `<td>` ordinals for each candidate field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub name: usize,
    pub photo: usize,
    pub party: usize,
    #[serde(default)]
    pub symbol: Option<usize>,
}

impl ColumnLayout {
    /// `[name, photo, party, symbol]`.
    pub fn with_symbol() -> Self {
        Self {
            name: 0,
            photo: 1,
            party: 2,
            symbol: Some(3),
        }
    }

    /// `[name, photo, party]`.
    pub fn without_symbol() -> Self {
        Self {
            name: 0,
            photo: 1,
            party: 2,
            symbol: None,
        }
    }

    fn ordinals(&self) -> impl Iterator<Item = usize> {
        [Some(self.name), Some(self.photo), Some(self.party), self.symbol]
            .into_iter()
            .flatten()
    }

    /// Minimum number of data cells a row needs to qualify.
    pub fn min_cells(&self) -> usize {
        self.ordinals().max().unwrap_or(0).saturating_add(1)
    }

    /// Rejects layouts that point two fields at one cell or address cells past `MAX_ORDINAL`.
    pub fn validate(&self) -> Result<(), String> {
        let ordinals: Vec<usize> = self.ordinals().collect();
        if let Some(&bad) = ordinals.iter().find(|&&i| i > MAX_ORDINAL) {
            return Err(format!("cell ordinal {} exceeds {}", bad, MAX_ORDINAL));
        }
        for (i, a) in ordinals.iter().enumerate() {
            if ordinals[i + 1..].contains(a) {
                return Err(format!("cell ordinal {} is used by more than one field", a));
            }
        }
        Ok(())
    }

    /// Parses and validates a layout from JSON such as `{"name": 0, "photo": 1, "party": 2, "symbol": 3}`.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let layout: ColumnLayout = serde_json::from_str(raw)?;
        layout.validate().map_err(anyhow::Error::msg)?;
        Ok(layout)
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::with_symbol()
    }
}

/// Parses candidate tables under a fixed column layout.
#[derive(Debug, Clone)]
pub struct CandidateTableParser {
    layout: ColumnLayout,
    base_url: Option<Url>,
}

impl CandidateTableParser {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            base_url: None,
        }
    }

    /// Resolve relative photo URLs against `base`. Unparseable bases are ignored.
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.base_url = Url::parse(base).ok();
        self
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Extracts every qualifying candidate row in document order.
    pub fn parse(&self, html: &str) -> Vec<Candidate> {
        let doc = Html::parse_fragment(&wrap_bare_rows(html));
        let min_cells = self.layout.min_cells();

        let mut candidates = Vec::new();
        for row in doc.select(&ROW_SELECTOR) {
            let cells = data_cells(row);
            if cells.len() < min_cells {
                continue;
            }

            let name = cell_text(&cells[self.layout.name]);
            if name.is_empty() {
                continue;
            }

            candidates.push(Candidate {
                name,
                party: cell_text(&cells[self.layout.party]),
                symbol: self.layout.symbol.map(|i| cell_text(&cells[i])),
                photo_url: self.photo_url(&cells[self.layout.photo]),
            });
        }
        candidates
    }

    fn photo_url(&self, cell: &ElementRef) -> String {
        let src = cell
            .select(&IMG_SELECTOR)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::trim)
            .unwrap_or("");
        resolve_photo_url(src, self.base_url.as_ref())
    }
}

/// html5ever drops `<tr>` outside a table, so bare rows get a wrapper.
///
/// A fragment counts as bare when it opens with a row-level tag, even if a cell
/// holds a nested table further in.
fn wrap_bare_rows(html: &str) -> String {
    let lower = html.trim_start().to_ascii_lowercase();
    let starts_with_rows = ["<tr", "<tbody", "<thead", "<tfoot"]
        .iter()
        .any(|tag| lower.starts_with(tag));
    if starts_with_rows || !lower.contains("<table") {
        format!("<table>{}</table>", html)
    } else {
        html.to_string()
    }
}

/// The row's own `<td>` children; cells of nested tables never shift the ordinals.
fn data_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| CELL_SELECTOR.matches(el))
        .collect()
}

/// Trimmed text nodes of the cell joined by single spaces.
fn cell_text(cell: &ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_photo_url(src: &str, base: Option<&Url>) -> String {
    if src.is_empty()
        || src.starts_with("http://")
        || src.starts_with("https://")
        || src.starts_with("data:")
    {
        return src.to_string();
    }
    match base.and_then(|b| b.join(src).ok()) {
        Some(resolved) => resolved.to_string(),
        None => src.to_string(),
    }
}

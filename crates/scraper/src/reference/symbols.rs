// ABOUTME: Ballot symbol name to image URL lookup loaded from the symbol image JSON file.
// ABOUTME: Falls back to NFC-normalized matching so differently composed Bengali text still resolves.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, ScrapeError};

fn nfc(s: &str) -> String {
    s.nfc().collect()
}

/// Immutable symbol → image URL table.
///
/// Empty URLs are legal entries meaning "known symbol, no image".
#[derive(Debug, Clone, Default)]
pub struct SymbolImageIndex {
    entries: HashMap<String, String>,
    normalized: HashMap<String, String>,
}

impl SymbolImageIndex {
    /// An index with no symbols; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the index from pairs in file order; the first key to normalize to a given form wins.
    pub fn from_map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut index = Self::default();
        for (key, url) in entries {
            index
                .normalized
                .entry(nfc(&key))
                .or_insert_with(|| url.clone());
            index.entries.insert(key, url);
        }
        index
    }

    /// Parses a flat `{"<symbol>": "<url>"}` object, keeping its key order.
    pub fn from_json_str(raw: &str) -> std::result::Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_str(raw)?;
        let mut pairs = Vec::with_capacity(object.len());
        for (key, url) in object {
            pairs.push((key, serde_json::from_value::<String>(url)?));
        }
        Ok(Self::from_map(pairs))
    }

    /// Loads the symbol file at `path`.
    ///
    /// A missing file yields an empty index; unreadable or malformed files are Reference errors.
    pub fn load(path: &Path) -> Result<Self> {
        let target = path.display().to_string();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %target, "symbol image file not found, using candidate photos");
                return Ok(Self::empty());
            }
            Err(e) => {
                return Err(ScrapeError::reference(
                    &target,
                    "LoadSymbolImages",
                    Some(e.into()),
                ))
            }
        };
        Self::from_json_str(&raw)
            .map_err(|e| ScrapeError::reference(&target, "LoadSymbolImages", Some(e.into())))
    }

    /// Image URL for `symbol`, or `""` when the symbol is unknown or has no image.
    pub fn lookup(&self, symbol: &str) -> &str {
        if symbol.is_empty() {
            return "";
        }
        if let Some(url) = self.entries.get(symbol) {
            return url;
        }
        self.normalized
            .get(&nfc(symbol))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "দাঁড়িপাল্লা" with the precomposed RRA (U+09DC).
    const SCALES_PRECOMPOSED: &str = "\u{09A6}\u{09BE}\u{0981}\u{09DC}\u{09BF}\u{09AA}\u{09BE}\u{09B2}\u{09CD}\u{09B2}\u{09BE}";
    // Same name with DDA + NUKTA (U+09A1 U+09BC).
    const SCALES_DECOMPOSED: &str = "\u{09A6}\u{09BE}\u{0981}\u{09A1}\u{09BC}\u{09BF}\u{09AA}\u{09BE}\u{09B2}\u{09CD}\u{09B2}\u{09BE}";

    fn index() -> SymbolImageIndex {
        let raw = serde_json::json!({
            "ধানের শীষ": "https://img.example/paddy.png",
            SCALES_PRECOMPOSED: "https://img.example/scales.png",
            "ট্রাক": ""
        })
        .to_string();
        SymbolImageIndex::from_json_str(&raw).unwrap()
    }

    #[test]
    fn exact_match() {
        assert_eq!(index().lookup("ধানের শীষ"), "https://img.example/paddy.png");
    }

    #[test]
    fn differently_composed_names_resolve_to_same_url() {
        assert_ne!(SCALES_PRECOMPOSED, SCALES_DECOMPOSED);
        let idx = index();
        assert_eq!(idx.lookup(SCALES_PRECOMPOSED), "https://img.example/scales.png");
        assert_eq!(idx.lookup(SCALES_DECOMPOSED), "https://img.example/scales.png");
    }

    #[test]
    fn vowel_sign_composition() {
        // "নৌকা" with AU written as E + AU length mark.
        let idx = SymbolImageIndex::from_map([(
            "\u{09A8}\u{09CC}\u{0995}\u{09BE}".to_string(),
            "https://img.example/boat.png".to_string(),
        )]);
        assert_eq!(
            idx.lookup("\u{09A8}\u{09C7}\u{09D7}\u{0995}\u{09BE}"),
            "https://img.example/boat.png"
        );
    }

    #[test]
    fn first_normalized_match_follows_file_order() {
        // Both keys compose to U+1EC7; the first one in the file must win even
        // though it sorts after the second.
        let raw = r#"{"\u1eb9\u0302": "https://img.example/first.png", "\u00ea\u0323": "https://img.example/second.png"}"#;
        let idx = SymbolImageIndex::from_json_str(raw).unwrap();
        assert_eq!(idx.lookup("e\u{0323}\u{0302}"), "https://img.example/first.png");
        assert_eq!(idx.lookup("\u{00EA}\u{0323}"), "https://img.example/second.png");
    }

    #[test]
    fn known_symbol_without_image_is_empty() {
        assert_eq!(index().lookup("ট্রাক"), "");
    }

    #[test]
    fn unknown_and_empty_symbols_miss() {
        let idx = index();
        assert_eq!(idx.lookup("আপেল"), "");
        assert_eq!(idx.lookup(""), "");
    }

    #[test]
    fn missing_file_degrades_to_empty_index() {
        let idx = SymbolImageIndex::load(Path::new("/nonexistent/symbol_images.json")).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn malformed_file_is_reference_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symbol_images.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = SymbolImageIndex::load(&path).unwrap_err();
        assert!(err.is_reference());
    }
}

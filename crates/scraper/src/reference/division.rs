// ABOUTME: District-id to division and English district name lookup built from the division mapping file.
// ABOUTME: Applies a fixed override table so names line up with the boundary GeoJSON spellings.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, ScrapeError};

/// Division reported for districts missing from the mapping file.
pub const UNKNOWN_DIVISION: &str = "Unknown";

/// English district names that differ between the mapping file and the boundary dataset.
const BOUNDARY_SPELLINGS: &[(&str, &str)] = &[
    ("Brahmanbaria", "Brahamanbaria"),
    ("Moulvibazar", "Maulvibazar"),
    ("Netrokona", "Netrakona"),
];

/// Immutable replacement table keyed by resolved English district name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictNameOverrides {
    names: HashMap<String, String>,
}

impl DistrictNameOverrides {
    /// An override table with no entries.
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Build a table from `(from, to)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns a copy with the extra pairs layered on top.
    pub fn with_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in pairs {
            self.names.insert(k.into(), v.into());
        }
        self
    }

    /// Substitutes `name` if it has an override, otherwise returns it unchanged.
    pub fn apply<'a>(&'a self, name: &'a str) -> &'a str {
        self.names.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for DistrictNameOverrides {
    fn default() -> Self {
        Self::from_pairs(BOUNDARY_SPELLINGS.iter().copied())
    }
}

/// Division and English name for one district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionEntry {
    pub division: String,
    pub english_name: String,
}

// `serde_json::Map` keeps file order, which decides duplicate ids.
#[derive(Debug, Deserialize)]
struct MappingFile {
    divisions: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DivisionBlock {
    #[serde(default)]
    districts: Map<String, Value>,
}

/// Flat district-id keyed lookup, inverted from the division → districts hierarchy.
#[derive(Debug, Clone)]
pub struct DivisionMappingIndex {
    entries: HashMap<String, DivisionEntry>,
    overrides: DistrictNameOverrides,
}

impl DivisionMappingIndex {
    /// Loads the mapping file at `path`. Any read or parse failure is a Reference error.
    pub fn load(path: &Path, overrides: DistrictNameOverrides) -> Result<Self> {
        let target = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|e| {
            ScrapeError::reference(&target, "LoadDivisionMapping", Some(e.into()))
        })?;
        Self::from_json_str(&raw, overrides).map_err(|e| {
            ScrapeError::reference(&target, "LoadDivisionMapping", Some(e.into()))
        })
    }

    /// Parses `{"divisions": {"<division>": {"districts": {"<id>": "<name>"}}}}`.
    pub fn from_json_str(
        raw: &str,
        overrides: DistrictNameOverrides,
    ) -> std::result::Result<Self, serde_json::Error> {
        let file: MappingFile = serde_json::from_str(raw)?;
        let mut entries: HashMap<String, DivisionEntry> = HashMap::new();
        for (division, block) in file.divisions {
            let block: DivisionBlock = serde_json::from_value(block)?;
            for (id, name) in block.districts {
                let entry = DivisionEntry {
                    division: division.clone(),
                    english_name: serde_json::from_value(name)?,
                };
                if let Some(replaced) = entries.insert(id.clone(), entry) {
                    tracing::warn!(
                        district_id = %id,
                        replaced = %replaced.division,
                        kept = %division,
                        "district listed under more than one division, keeping the later one"
                    );
                }
            }
        }
        Ok(Self { entries, overrides })
    }

    /// Raw lookup without overrides.
    pub fn get(&self, district_id: &str) -> Option<&DivisionEntry> {
        self.entries.get(district_id)
    }

    /// Resolves division and boundary-ready English name for a district.
    ///
    /// Unknown ids yield division [`UNKNOWN_DIVISION`] and `local_name` as the English name.
    /// The override table is applied to the English name in both cases.
    pub fn resolve(&self, district_id: &str, local_name: &str) -> DivisionEntry {
        let (division, english_name) = match self.entries.get(district_id) {
            Some(entry) => (entry.division.as_str(), entry.english_name.as_str()),
            None => (UNKNOWN_DIVISION, local_name),
        };
        DivisionEntry {
            division: division.to_string(),
            english_name: self.overrides.apply(english_name).to_string(),
        }
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

    const MAPPING: &str = r#"{
        "divisions": {
            "Chattogram": {"districts": {"12": "Brahmanbaria", "15": "Chattogram"}},
            "Sylhet": {"districts": {"58": "Moulvibazar"}},
            "Dhaka": {"districts": {"26": "Dhaka"}}
        }
    }"#;

    fn index() -> DivisionMappingIndex {
        DivisionMappingIndex::from_json_str(MAPPING, DistrictNameOverrides::default()).unwrap()
    }

    #[test]
    fn inverts_hierarchy() {
        let idx = index();
        assert_eq!(idx.len(), 4);
        let entry = idx.get("15").unwrap();
        assert_eq!(entry.division, "Chattogram");
        assert_eq!(entry.english_name, "Chattogram");
    }

    #[test]
    fn resolve_known_district() {
        let entry = index().resolve("26", "ঢাকা");
        assert_eq!(entry.division, "Dhaka");
        assert_eq!(entry.english_name, "Dhaka");
    }

    #[test]
    fn unknown_district_defaults() {
        let entry = index().resolve("999", "অজানা");
        assert_eq!(entry.division, UNKNOWN_DIVISION);
        assert_eq!(entry.english_name, "অজানা");
    }

    #[test]
    fn overrides_take_precedence_over_mapping() {
        let idx = index();
        assert_eq!(idx.resolve("12", "ব্রাহ্মণবাড়িয়া").english_name, "Brahamanbaria");
        assert_eq!(idx.resolve("58", "মৌলভীবাজার").english_name, "Maulvibazar");
        assert_eq!(idx.get("12").unwrap().english_name, "Brahmanbaria");
    }

    #[test]
    fn overrides_apply_to_fallback_names() {
        let overrides = DistrictNameOverrides::empty().with_pairs([("অজানা", "Ajana")]);
        let idx = DivisionMappingIndex::from_json_str(MAPPING, overrides).unwrap();
        assert_eq!(idx.resolve("999", "অজানা").english_name, "Ajana");
    }

    #[test]
    fn later_division_wins_for_duplicate_ids() {
        let raw = r#"{
            "divisions": {
                "Sylhet": {"districts": {"58": "Moulvibazar"}},
                "Dhaka": {"districts": {"58": "Moulvibazar", "26": "Dhaka"}},
                "Khulna": {"districts": {"58": "Moulvibazar"}}
            }
        }"#;
        let idx = DivisionMappingIndex::from_json_str(raw, DistrictNameOverrides::empty()).unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.get("58").unwrap().division, "Khulna");
    }

    #[test]
    fn rejects_non_string_district_names() {
        let raw = r#"{"divisions": {"Dhaka": {"districts": {"26": 26}}}}"#;
        assert!(DivisionMappingIndex::from_json_str(raw, DistrictNameOverrides::empty()).is_err());
    }

    #[test]
    fn rejects_malformed_file() {
        assert!(
            DivisionMappingIndex::from_json_str("{\"zones\": {}}", DistrictNameOverrides::empty())
                .is_err()
        );
    }

    #[test]
    fn load_missing_file_is_reference_error() {
        let err = DivisionMappingIndex::load(
            Path::new("/nonexistent/district_division_mapping.json"),
            DistrictNameOverrides::default(),
        )
        .unwrap_err();
        assert!(err.is_reference());
    }

    #[test]
    fn default_overrides_cover_boundary_spellings() {
        let overrides = DistrictNameOverrides::default();
        assert_eq!(overrides.len(), 3);
        assert_eq!(overrides.apply("Netrokona"), "Netrakona");
        assert_eq!(overrides.apply("Dhaka"), "Dhaka");
    }
}

// ABOUTME: Fixed-width output row assembly: seven identity columns then one group per candidate slot.
// ABOUTME: Pads short candidate lists with empty strings and truncates long ones to the slot count.

use crate::models::{CandidateEntry, Constituency, District};
use crate::options::SchemaVariant;

/// Identity column names, in output order.
pub const IDENTITY_HEADER: [&str; 7] = [
    "Districts",
    "District Name Clean",
    "Electoral Name Clean",
    "constituency",
    "url",
    "parent_district",
    "divisions",
];

/// The seven per-seat identity cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityColumns {
    pub districts: String,
    pub district_name_clean: String,
    pub electoral_name_clean: String,
    pub constituency: String,
    /// Reserved for an external reference page; never filled by the scraper.
    pub url: String,
    pub parent_district: String,
    pub divisions: String,
}

impl IdentityColumns {
    pub fn for_seat(district: &District, constituency: &Constituency) -> Self {
        Self {
            districts: district.local_name.clone(),
            district_name_clean: district.english_name.clone(),
            electoral_name_clean: constituency.local_name.clone(),
            constituency: constituency.display_code.clone(),
            url: String::new(),
            parent_district: district.english_name.clone(),
            divisions: district.division.clone(),
        }
    }

    fn into_cells(self) -> [String; 7] {
        [
            self.districts,
            self.district_name_clean,
            self.electoral_name_clean,
            self.constituency,
            self.url,
            self.parent_district,
            self.divisions,
        ]
    }
}

/// One output record, already laid out in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    cells: Vec<String>,
}

impl OutputRow {
    /// Wraps cells read back from an earlier output file.
    pub fn from_cells(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// `(Districts, Electoral Name Clean)`: the localized district and seat labels.
    pub fn seat_key(&self) -> Option<(&str, &str)> {
        match (self.cells.first(), self.cells.get(2)) {
            (Some(district), Some(seat)) => Some((district.as_str(), seat.as_str())),
            _ => None,
        }
    }

    /// Number of candidate slots with a non-empty name.
    pub fn filled_slots(&self, schema: SchemaVariant) -> usize {
        self.cells
            .iter()
            .skip(IDENTITY_HEADER.len())
            .step_by(schema.slot_width())
            .filter(|name| !name.is_empty())
            .count()
    }
}

/// Lays out identity and candidate cells for a given schema and slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAssembler {
    schema: SchemaVariant,
    max_candidates: usize,
}

impl RowAssembler {
    pub fn new(schema: SchemaVariant, max_candidates: usize) -> Self {
        Self {
            schema,
            max_candidates,
        }
    }

    pub fn schema(&self) -> SchemaVariant {
        self.schema
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Total number of columns in every row.
    pub fn width(&self) -> usize {
        IDENTITY_HEADER.len() + self.schema.slot_width() * self.max_candidates
    }

    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = IDENTITY_HEADER.iter().map(|s| s.to_string()).collect();
        for i in 1..=self.max_candidates {
            header.push(format!("Candidate_{}", i));
            header.push(format!("Party_{}", i));
            if self.schema.has_symbol() {
                header.push(format!("Symbol_{}", i));
            }
            header.push(format!("Img_{}", i));
        }
        header
    }

    /// Builds a row with exactly `max_candidates` slot groups.
    ///
    /// Candidates past the slot count are dropped.
    pub fn assemble(&self, identity: IdentityColumns, candidates: &[CandidateEntry]) -> OutputRow {
        let mut cells = Vec::with_capacity(self.width());
        cells.extend(identity.into_cells());

        for slot in 0..self.max_candidates {
            match candidates.get(slot) {
                Some(c) => {
                    cells.push(c.name.clone());
                    cells.push(c.party.clone());
                    if self.schema.has_symbol() {
                        cells.push(c.symbol.clone().unwrap_or_default());
                    }
                    cells.push(c.image_url.clone());
                }
                None => {
                    cells.extend(std::iter::repeat(String::new()).take(self.schema.slot_width()));
                }
            }
        }
        OutputRow { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(i: usize) -> CandidateEntry {
        CandidateEntry {
            name: format!("name{}", i),
            party: format!("party{}", i),
            symbol: Some(format!("symbol{}", i)),
            image_url: format!("https://img/{}.png", i),
        }
    }

    fn identity() -> IdentityColumns {
        let district = District {
            id: "26".into(),
            local_name: "ঢাকা".into(),
            english_name: "Dhaka".into(),
            division: "Dhaka".into(),
        };
        let seat = Constituency {
            id: "174".into(),
            local_name: "ঢাকা-১".into(),
            number: "1".into(),
            display_code: "Dhaka-1".into(),
        };
        IdentityColumns::for_seat(&district, &seat)
    }

    #[test]
    fn header_with_symbol() {
        let header = RowAssembler::new(SchemaVariant::WithSymbol, 2).header();
        assert_eq!(
            header,
            vec![
                "Districts",
                "District Name Clean",
                "Electoral Name Clean",
                "constituency",
                "url",
                "parent_district",
                "divisions",
                "Candidate_1",
                "Party_1",
                "Symbol_1",
                "Img_1",
                "Candidate_2",
                "Party_2",
                "Symbol_2",
                "Img_2",
            ]
        );
    }

    #[test]
    fn header_without_symbol() {
        let asm = RowAssembler::new(SchemaVariant::NoSymbol, 1);
        assert_eq!(&asm.header()[7..], ["Candidate_1", "Party_1", "Img_1"]);
        assert_eq!(asm.width(), 10);
    }

    #[test]
    fn identity_cells_leave_url_empty() {
        let row = RowAssembler::new(SchemaVariant::WithSymbol, 0).assemble(identity(), &[]);
        assert_eq!(
            row.cells(),
            ["ঢাকা", "Dhaka", "ঢাকা-১", "Dhaka-1", "", "Dhaka", "Dhaka"]
        );
        assert_eq!(row.seat_key(), Some(("ঢাকা", "ঢাকা-১")));
    }

    #[test]
    fn width_is_fixed_for_any_candidate_count() {
        let max = 15;
        let asm = RowAssembler::new(SchemaVariant::WithSymbol, max);
        for n in 0..=max + 5 {
            let candidates: Vec<CandidateEntry> = (0..n).map(entry).collect();
            let row = asm.assemble(identity(), &candidates);
            assert_eq!(row.len(), 7 + 4 * max, "n = {}", n);
            assert_eq!(row.len(), asm.header().len());
            assert_eq!(row.filled_slots(SchemaVariant::WithSymbol), n.min(max));

            for slot in n.min(max)..max {
                let start = 7 + 4 * slot;
                assert!(row.cells()[start..start + 4].iter().all(String::is_empty));
            }
            if n > max {
                assert!(!row.cells().contains(&format!("name{}", max)));
            }
        }
    }

    #[test]
    fn slots_follow_candidate_order() {
        let asm = RowAssembler::new(SchemaVariant::WithSymbol, 3);
        let row = asm.assemble(identity(), &[entry(0), entry(1)]);
        assert_eq!(
            &row.cells()[7..],
            [
                "name0",
                "party0",
                "symbol0",
                "https://img/0.png",
                "name1",
                "party1",
                "symbol1",
                "https://img/1.png",
                "",
                "",
                "",
                "",
            ]
        );
    }

    #[test]
    fn no_symbol_schema_omits_symbol_cells() {
        let asm = RowAssembler::new(SchemaVariant::NoSymbol, 2);
        let row = asm.assemble(identity(), &[entry(7)]);
        assert_eq!(row.len(), 7 + 3 * 2);
        assert_eq!(&row.cells()[7..10], ["name7", "party7", "https://img/7.png"]);
    }
}

// ABOUTME: Drives a scrape run: probe, load reference data, walk districts and constituencies, write CSV.
// ABOUTME: ScrapePipeline holds the traversal; run() sequences the whole job from startup to output.

//! Scrape orchestration.
//!
//! A run moves strictly forward through these stages:
//!
//! 1. probe the portal (failure aborts before anything is loaded or fetched)
//! 2. load the division mapping (required) and symbol images (optional)
//! 3. list districts, then each district's constituencies, in portal order
//! 4. per constituency: wait out the request delay, fetch and parse the
//!    candidate table, resolve images, assemble one fixed-width row
//! 5. write header and rows to the output file
//!
//! Under [`FailurePolicy::Abort`] any traversal error ends the run and nothing is
//! written. [`FailurePolicy::SkipConstituency`] absorbs candidate table failures
//! only; listing failures still abort.

use std::path::PathBuf;
use std::thread;

use crate::constituency::{display_code, resolve_code};
use crate::error::{Result, ScrapeError};
use crate::models::{Candidate, CandidateEntry, Constituency, District};
use crate::options::{FailurePolicy, ScrapeOptions};
use crate::output::write_csv;
use crate::parser::CandidateTableParser;
use crate::portal::{CandidateQuery, ConstituencyRecord, DistrictRecord, PortalClient};
use crate::reference::{DivisionMappingIndex, SymbolImageIndex, UNKNOWN_DIVISION};
use crate::resume::ResumeIndex;
use crate::rows::{IdentityColumns, OutputRow, RowAssembler};

/// A constituency left out of the output because its candidate table could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConstituency {
    pub district: String,
    pub constituency: String,
    pub error: String,
}

/// Everything a finished traversal produced.
#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    pub header: Vec<String>,
    pub rows: Vec<OutputRow>,
    pub districts: usize,
    pub constituencies: usize,
    /// Candidates parsed from fetched tables, before truncation to the slot count.
    pub candidates: usize,
    /// Rows carried over from a resume file instead of being fetched.
    pub resumed: usize,
    pub skipped: Vec<SkippedConstituency>,
}

/// File locations for a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunPaths {
    pub division_map: PathBuf,
    /// Symbol image JSON; `None` means candidate photos are always used.
    pub symbol_images: Option<PathBuf>,
    /// Earlier output to resume from.
    pub resume_from: Option<PathBuf>,
    pub output: PathBuf,
}

/// Traversal over the portal with read-only reference data.
#[derive(Debug, Clone)]
pub struct ScrapePipeline {
    opts: ScrapeOptions,
    client: PortalClient,
    divisions: DivisionMappingIndex,
    symbols: SymbolImageIndex,
    parser: CandidateTableParser,
    assembler: RowAssembler,
    resume: Option<ResumeIndex>,
}

impl ScrapePipeline {
    pub fn new(
        opts: ScrapeOptions,
        client: PortalClient,
        divisions: DivisionMappingIndex,
        symbols: SymbolImageIndex,
    ) -> Self {
        let parser =
            CandidateTableParser::new(opts.layout()).with_base_url(client.base_url().as_str());
        let assembler = RowAssembler::new(opts.schema, opts.max_candidates);
        Self {
            opts,
            client,
            divisions,
            symbols,
            parser,
            assembler,
            resume: None,
        }
    }

    /// Reuse rows from an earlier run instead of refetching those seats.
    pub fn with_resume(mut self, resume: ResumeIndex) -> Self {
        self.resume = Some(resume);
        self
    }

    pub fn assembler(&self) -> &RowAssembler {
        &self.assembler
    }

    /// Walks every district and constituency and returns the assembled rows.
    pub fn traverse(&self) -> Result<ScrapeReport> {
        let mut report = ScrapeReport {
            header: self.assembler.header(),
            ..Default::default()
        };

        let districts = self.client.list_districts(self.opts.election_id)?;
        tracing::info!(count = districts.len(), "found districts");

        for (i, record) in districts.iter().enumerate() {
            let district = self.enrich_district(record);
            tracing::info!(
                "[{}/{}] {} ({})",
                i + 1,
                districts.len(),
                district.english_name,
                district.division
            );
            self.traverse_district(&district, &mut report)?;
            report.districts += 1;
        }

        tracing::info!(
            constituencies = report.constituencies,
            candidates = report.candidates,
            resumed = report.resumed,
            skipped = report.skipped.len(),
            "traversal complete"
        );
        Ok(report)
    }

    fn traverse_district(&self, district: &District, report: &mut ScrapeReport) -> Result<()> {
        let records = self
            .client
            .list_constituencies(&district.id, self.opts.election_id)?;
        tracing::debug!(district = %district.english_name, count = records.len(), "found constituencies");

        for record in &records {
            let seat = enrich_constituency(record, district);
            report.constituencies += 1;

            if let Some(row) = self
                .resume
                .as_ref()
                .and_then(|r| r.get(&district.local_name, &seat.local_name))
            {
                tracing::debug!(seat = %seat.display_code, "reusing row from resume file");
                report.rows.push(row.clone());
                report.resumed += 1;
                continue;
            }

            match self.fetch_candidates(district, &seat) {
                Ok(candidates) => {
                    tracing::debug!(seat = %seat.display_code, count = candidates.len(), "candidates");
                    if candidates.is_empty() {
                        tracing::warn!(seat = %seat.display_code, "no qualifying candidate rows");
                    } else if candidates.len() > self.opts.max_candidates {
                        tracing::warn!(
                            seat = %seat.display_code,
                            count = candidates.len(),
                            max = self.opts.max_candidates,
                            "truncating candidates to slot count"
                        );
                    }
                    report.candidates += candidates.len();
                    let entries = self.resolve_candidates(candidates);
                    let identity = IdentityColumns::for_seat(district, &seat);
                    report.rows.push(self.assembler.assemble(identity, &entries));
                }
                Err(err) => self.absorb_failure(err, district, &seat, report)?,
            }
        }
        Ok(())
    }

    fn absorb_failure(
        &self,
        err: ScrapeError,
        district: &District,
        seat: &Constituency,
        report: &mut ScrapeReport,
    ) -> Result<()> {
        if self.opts.failure_policy != FailurePolicy::SkipConstituency || !err.is_traversal() {
            return Err(err);
        }
        tracing::error!(seat = %seat.display_code, error = %err, "skipping constituency");
        report.skipped.push(SkippedConstituency {
            district: district.local_name.clone(),
            constituency: seat.local_name.clone(),
            error: err.to_string(),
        });
        Ok(())
    }

    fn fetch_candidates(&self, district: &District, seat: &Constituency) -> Result<Vec<Candidate>> {
        if !self.opts.request_delay.is_zero() {
            thread::sleep(self.opts.request_delay);
        }
        let query = CandidateQuery {
            election_id: self.opts.election_id,
            district_id: &district.id,
            constituency_id: &seat.id,
            candidate_type: self.opts.candidate_type,
            status_id: self.opts.status_filter,
        };
        let html = self.client.fetch_candidate_html(&query)?;
        Ok(self.parser.parse(&html))
    }

    fn enrich_district(&self, record: &DistrictRecord) -> District {
        let entry = self.divisions.resolve(&record.id, &record.name);
        if entry.division == UNKNOWN_DIVISION {
            tracing::warn!(district_id = %record.id, name = %record.name, "district missing from division mapping");
        }
        District {
            id: record.id.clone(),
            local_name: record.name.clone(),
            english_name: entry.english_name,
            division: entry.division,
        }
    }

    /// Picks each candidate's image: symbol image when one is known, else the candidate photo.
    pub fn resolve_candidates(&self, candidates: Vec<Candidate>) -> Vec<CandidateEntry> {
        candidates
            .into_iter()
            .map(|c| {
                let symbol_image = c
                    .symbol
                    .as_deref()
                    .map(|s| self.symbols.lookup(s))
                    .unwrap_or("");
                let image_url = if symbol_image.is_empty() {
                    c.photo_url
                } else {
                    symbol_image.to_string()
                };
                CandidateEntry {
                    name: c.name,
                    party: c.party,
                    symbol: c.symbol,
                    image_url,
                }
            })
            .collect()
    }
}

fn enrich_constituency(record: &ConstituencyRecord, district: &District) -> Constituency {
    let (_, number) = resolve_code(&record.name);
    Constituency {
        id: record.id.clone(),
        local_name: record.name.clone(),
        number,
        display_code: display_code(&district.english_name, &record.name, &record.id),
    }
}

/// Runs a complete job and writes the dataset to `paths.output`.
///
/// Nothing is written unless every stage before output succeeds.
pub fn run(opts: ScrapeOptions, paths: &RunPaths) -> Result<ScrapeReport> {
    if let Some(layout) = &opts.column_layout {
        layout.validate().map_err(|msg| {
            ScrapeError::reference(
                "column layout",
                "ValidateColumnLayout",
                Some(anyhow::Error::msg(msg)),
            )
        })?;
    }
    let client = PortalClient::new(&opts)?;
    client.probe()?;
    tracing::info!(base_url = %client.base_url(), "connected to portal");

    let divisions = DivisionMappingIndex::load(&paths.division_map, opts.district_overrides.clone())?;
    tracing::info!(districts = divisions.len(), "loaded division mapping");
    let symbols = match &paths.symbol_images {
        Some(path) => SymbolImageIndex::load(path)?,
        None => SymbolImageIndex::empty(),
    };
    tracing::info!(symbols = symbols.len(), "loaded symbol images");

    let mut pipeline = ScrapePipeline::new(opts, client, divisions, symbols);
    if let Some(path) = &paths.resume_from {
        let resume = ResumeIndex::load(path, &pipeline.assembler().header())?;
        pipeline = pipeline.with_resume(resume);
    }

    let report = pipeline.traverse()?;
    write_csv(&paths.output, &report.header, &report.rows)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SchemaVariant;
    use crate::reference::DistrictNameOverrides;
    use std::collections::BTreeMap;

    fn pipeline(schema: SchemaVariant) -> ScrapePipeline {
        let opts = ScrapeOptions::builder()
            .base_url("http://portal.example")
            .schema(schema)
            .build();
        let client = PortalClient::new(&opts).unwrap();
        let divisions = DivisionMappingIndex::from_json_str(
            r#"{"divisions": {"Dhaka": {"districts": {"26": "Dhaka"}}}}"#,
            DistrictNameOverrides::default(),
        )
        .unwrap();
        let symbols = SymbolImageIndex::from_map(BTreeMap::from([
            ("নৌকা".to_string(), "https://img/boat.png".to_string()),
            ("ট্রাক".to_string(), String::new()),
        ]));
        ScrapePipeline::new(opts, client, divisions, symbols)
    }

    fn candidate(symbol: Option<&str>) -> Candidate {
        Candidate {
            name: "Karim".into(),
            party: "Party".into(),
            symbol: symbol.map(String::from),
            photo_url: "https://portal/photo.jpg".into(),
        }
    }

    #[test]
    fn symbol_image_preferred_over_photo() {
        let entries = pipeline(SchemaVariant::WithSymbol).resolve_candidates(vec![candidate(Some("নৌকা"))]);
        assert_eq!(entries[0].image_url, "https://img/boat.png");
        assert_eq!(entries[0].symbol.as_deref(), Some("নৌকা"));
    }

    #[test]
    fn photo_used_when_symbol_has_no_image() {
        let p = pipeline(SchemaVariant::WithSymbol);
        let entries = p.resolve_candidates(vec![
            candidate(Some("ট্রাক")),
            candidate(Some("আপেল")),
            candidate(None),
        ]);
        assert!(entries.iter().all(|e| e.image_url == "https://portal/photo.jpg"));
    }

    #[test]
    fn district_enrichment_falls_back_to_unknown() {
        let p = pipeline(SchemaVariant::WithSymbol);
        let known = p.enrich_district(&DistrictRecord {
            id: "26".into(),
            name: "ঢাকা".into(),
        });
        assert_eq!(known.english_name, "Dhaka");
        assert_eq!(known.division, "Dhaka");

        let unknown = p.enrich_district(&DistrictRecord {
            id: "77".into(),
            name: "অজানা".into(),
        });
        assert_eq!(unknown.english_name, "অজানা");
        assert_eq!(unknown.division, UNKNOWN_DIVISION);
    }

    #[test]
    fn constituency_display_code() {
        let district = District {
            id: "26".into(),
            local_name: "ঢাকা".into(),
            english_name: "Dhaka".into(),
            division: "Dhaka".into(),
        };
        let seat = enrich_constituency(
            &ConstituencyRecord {
                id: "174".into(),
                name: "ঢাকা-১২".into(),
            },
            &district,
        );
        assert_eq!(seat.number, "12");
        assert_eq!(seat.display_code, "Dhaka-12");

        let odd = enrich_constituency(
            &ConstituencyRecord {
                id: "175".into(),
                name: "সংরক্ষিত আসন".into(),
            },
            &district,
        );
        assert_eq!(odd.number, "");
        assert_eq!(odd.display_code, "সংরক্ষিত আসন");
    }
}

// ABOUTME: Library entry point for the election portal candidate scraper.
// ABOUTME: Re-exports the public API: run, ScrapePipeline, ScrapeOptions, ScrapeError and the lookup indexes.

//! ecmap-scraper - builds the per-constituency candidate dataset behind the election map.
//!
//! The portal is walked district by district and constituency by constituency.
//! Bengali seat labels are normalized into `"<District>-<n>"` codes, districts are
//! joined with their division, candidate symbols are mapped to images, and every
//! seat becomes one fixed-width CSV row.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use ecmap_scraper::{run, RunPaths, ScrapeError, ScrapeOptions};
//!
//! fn main() -> Result<(), ScrapeError> {
//!     let opts = ScrapeOptions::builder().status_filter(Some(11)).build();
//!     let paths = RunPaths {
//!         division_map: PathBuf::from("district_division_mapping.json"),
//!         symbol_images: Some(PathBuf::from("symbol_images.json")),
//!         resume_from: None,
//!         output: PathBuf::from("candidates.csv"),
//!     };
//!     let report = run(opts, &paths)?;
//!     println!("{} constituencies", report.constituencies);
//!     Ok(())
//! }
//! ```

pub mod constituency;
pub mod error;
pub mod models;
pub mod numerals;
pub mod options;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod portal;
pub mod reference;
pub mod resume;
pub mod rows;

pub use crate::constituency::{display_code, resolve_code};
pub use crate::error::{ErrorCode, Result, ScrapeError};
pub use crate::models::{Candidate, CandidateEntry, Constituency, District};
pub use crate::numerals::{to_bengali_digits, to_latin_digits};
pub use crate::options::{FailurePolicy, SchemaVariant, ScrapeOptions, ScrapeOptionsBuilder};
pub use crate::output::write_csv;
pub use crate::parser::{CandidateTableParser, ColumnLayout};
pub use crate::pipeline::{run, RunPaths, ScrapePipeline, ScrapeReport, SkippedConstituency};
pub use crate::portal::{CandidateQuery, PortalClient};
pub use crate::reference::{
    DistrictNameOverrides, DivisionEntry, DivisionMappingIndex, SymbolImageIndex, UNKNOWN_DIVISION,
};
pub use crate::resume::ResumeIndex;
pub use crate::rows::{IdentityColumns, OutputRow, RowAssembler, IDENTITY_HEADER};

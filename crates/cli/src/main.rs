// ABOUTME: CLI binary that scrapes the Election Commission portal into a candidates CSV.
// ABOUTME: Maps flags onto ScrapeOptions, sets up logging on stderr, prints a one-line summary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ecmap_scraper::{
    options::{DEFAULT_BASE_URL, DEFAULT_CANDIDATE_TYPE, DEFAULT_ELECTION_ID, DEFAULT_MAX_CANDIDATES},
    run, ColumnLayout, DistrictNameOverrides, FailurePolicy, RunPaths, SchemaVariant,
    ScrapeError, ScrapeOptions, ScrapeReport,
};
use tracing::Level;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Schema {
    /// Name, photo, party and ballot symbol columns
    WithSymbol,
    /// Name, photo and party columns
    NoSymbol,
}

impl From<Schema> for SchemaVariant {
    fn from(schema: Schema) -> Self {
        match schema {
            Schema::WithSymbol => SchemaVariant::WithSymbol,
            Schema::NoSymbol => SchemaVariant::NoSymbol,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ecmap-scrape")]
#[command(about = "Scrape candidate lists for every constituency into a single CSV")]
struct Args {
    /// Portal base URL
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long = "election-id", default_value_t = DEFAULT_ELECTION_ID)]
    election_id: u32,

    /// Candidate type (1 = member of parliament)
    #[arg(long = "candidate-type", default_value_t = DEFAULT_CANDIDATE_TYPE)]
    candidate_type: u32,

    /// Candidate status filter, e.g. 11 for finalised candidates (default: no filter)
    #[arg(long = "status-id")]
    status_id: Option<u32>,

    /// Candidate table layout
    #[arg(long = "schema", value_enum, default_value_t = Schema::WithSymbol)]
    schema: Schema,

    /// JSON file with custom cell ordinals, e.g. {"name": 1, "photo": 2, "party": 3, "symbol": 4}
    #[arg(long = "column-layout")]
    column_layout: Option<PathBuf>,

    /// Candidate slots per output row
    #[arg(long = "max-candidates", default_value_t = DEFAULT_MAX_CANDIDATES)]
    max_candidates: usize,

    /// Pause before each candidate table request, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 500)]
    delay_ms: u64,

    /// Timeout for listing and candidate requests, in seconds
    #[arg(long = "timeout-secs", default_value_t = 30)]
    timeout_secs: u64,

    /// Timeout for the startup connectivity check, in seconds
    #[arg(long = "probe-timeout-secs", default_value_t = 10)]
    probe_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long = "user-agent")]
    user_agent: Option<String>,

    /// Extra district spelling fix, FROM=TO (repeatable)
    #[arg(long = "district-override", value_parser = parse_override)]
    district_overrides: Vec<(String, String)>,

    /// Leave out constituencies whose candidate table fails instead of aborting
    #[arg(long = "skip-failed")]
    skip_failed: bool,

    /// Earlier output to resume from; seats already present are not refetched
    #[arg(long = "resume")]
    resume: Option<PathBuf>,

    /// District id to division and English name mapping
    #[arg(long = "division-map", default_value = "district_division_mapping.json")]
    division_map: PathBuf,

    /// Symbol name to image URL mapping (optional; missing file falls back to photos)
    #[arg(long = "symbol-images", default_value = "symbol_images.json")]
    symbol_images: PathBuf,

    /// Output CSV path
    #[arg(short = 'o', long = "output", default_value = "candidates.csv")]
    output: PathBuf,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
            Ok((from.trim().to_string(), to.trim().to_string()))
        }
        _ => Err(format!("expected FROM=TO, got {:?}", raw)),
    }
}

fn log_level(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_options(args: &Args) -> anyhow::Result<ScrapeOptions> {
    let overrides = DistrictNameOverrides::default().with_pairs(args.district_overrides.clone());
    let policy = if args.skip_failed {
        FailurePolicy::SkipConstituency
    } else {
        FailurePolicy::Abort
    };
    let mut builder = ScrapeOptions::builder()
        .base_url(args.base_url.as_str())
        .election_id(args.election_id)
        .candidate_type(args.candidate_type)
        .status_filter(args.status_id)
        .schema(args.schema.into())
        .max_candidates(args.max_candidates)
        .request_delay(Duration::from_millis(args.delay_ms))
        .request_timeout(Duration::from_secs(args.timeout_secs))
        .probe_timeout(Duration::from_secs(args.probe_timeout_secs))
        .district_overrides(overrides)
        .failure_policy(policy);
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    if let Some(path) = &args.column_layout {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading column layout {}", path.display()))?;
        let layout = ColumnLayout::from_json_str(&raw)
            .with_context(|| format!("invalid column layout {}", path.display()))?;
        builder = builder.column_layout(layout);
    }
    Ok(builder.build())
}

fn execute(args: &Args) -> anyhow::Result<ScrapeReport> {
    let opts = build_options(args)?;
    let paths = RunPaths {
        division_map: args.division_map.clone(),
        symbol_images: Some(args.symbol_images.clone()),
        resume_from: args.resume.clone(),
        output: args.output.clone(),
    };
    Ok(run(opts, &paths)?)
}

fn summary(report: &ScrapeReport, output: &Path) -> String {
    let mut line = format!(
        "wrote {} rows ({} districts, {} constituencies, {} candidates",
        report.rows.len(),
        report.districts,
        report.constituencies,
        report.candidates
    );
    if report.resumed > 0 {
        line.push_str(&format!(", {} resumed", report.resumed));
    }
    if !report.skipped.is_empty() {
        line.push_str(&format!(", {} skipped", report.skipped.len()));
    }
    line.push_str(&format!(") to {}", output.display()));
    line
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(args.verbose, args.quiet))
        .with_target(false)
        .init();

    let start = Instant::now();
    match execute(&args) {
        Ok(report) => {
            for skipped in &report.skipped {
                tracing::warn!(
                    district = %skipped.district,
                    constituency = %skipped.constituency,
                    "not in output: {}",
                    skipped.error
                );
            }
            tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "done");
            println!("{}", summary(&report, &args.output));
            ExitCode::SUCCESS
        }
        Err(e) => {
            // ScrapeError's Display already carries its source.
            match e.downcast_ref::<ScrapeError>() {
                Some(scrape) => tracing::error!(code = %scrape.code, "{}", scrape),
                None => tracing::error!("{:#}", e),
            }
            ExitCode::from(1)
        }
    }
}

// ABOUTME: Configuration for a scrape run: ScrapeOptions, SchemaVariant, FailurePolicy and a builder.
// ABOUTME: ScrapeOptionsBuilder provides a fluent API; defaults match the 2026 parliamentary election job.

use std::fmt;
use std::time::Duration;

use crate::parser::ColumnLayout;
use crate::reference::division::DistrictNameOverrides;

/// Portal the scraper talks to unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://103.183.38.66";
/// 13th National Parliament Election.
pub const DEFAULT_ELECTION_ID: u32 = 478;
/// Member of Parliament.
pub const DEFAULT_CANDIDATE_TYPE: u32 = 1;
/// Largest seat has 14 candidates.
pub const DEFAULT_MAX_CANDIDATES: usize = 15;

/// Which candidate table layout the portal serves, and therefore which columns are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVariant {
    /// Name, photo, party and ballot symbol.
    #[default]
    WithSymbol,
    /// Name, photo and party.
    NoSymbol,
}

impl SchemaVariant {
    /// The ordinal-to-field mapping for this layout.
    pub fn layout(self) -> ColumnLayout {
        match self {
            SchemaVariant::WithSymbol => ColumnLayout::with_symbol(),
            SchemaVariant::NoSymbol => ColumnLayout::without_symbol(),
        }
    }

    pub fn has_symbol(self) -> bool {
        matches!(self, SchemaVariant::WithSymbol)
    }

    /// Number of output columns per candidate slot.
    pub fn slot_width(self) -> usize {
        if self.has_symbol() {
            4
        } else {
            3
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchemaVariant::WithSymbol => "with-symbol",
            SchemaVariant::NoSymbol => "no-symbol",
        };
        write!(f, "{}", s)
    }
}

/// What to do when fetching one candidate table fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole run and write nothing.
    #[default]
    Abort,
    /// Record the failure, leave the seat out and keep going.
    SkipConstituency,
}

/// Configuration options for a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub base_url: String,
    pub election_id: u32,
    pub candidate_type: u32,
    /// Sent as `status_id` only when set (11 = finalised candidates).
    pub status_filter: Option<u32>,
    pub schema: SchemaVariant,
    /// Replaces the schema's built-in cell ordinals when the portal markup shifts.
    pub column_layout: Option<ColumnLayout>,
    pub max_candidates: usize,
    /// Pause before every candidate table request.
    pub request_delay: Duration,
    pub probe_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub district_overrides: DistrictNameOverrides,
    pub failure_policy: FailurePolicy,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            election_id: DEFAULT_ELECTION_ID,
            candidate_type: DEFAULT_CANDIDATE_TYPE,
            status_filter: None,
            schema: SchemaVariant::WithSymbol,
            column_layout: None,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            request_delay: Duration::from_millis(500),
            probe_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("ecmap-scraper/", env!("CARGO_PKG_VERSION")).to_string(),
            district_overrides: DistrictNameOverrides::default(),
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl ScrapeOptions {
    pub fn builder() -> ScrapeOptionsBuilder {
        ScrapeOptionsBuilder::new()
    }

    /// The column layout candidate tables are parsed with.
    pub fn layout(&self) -> ColumnLayout {
        self.column_layout.unwrap_or_else(|| self.schema.layout())
    }
}

/// Builder for constructing ScrapeOptions with custom settings.
#[derive(Debug, Clone)]
pub struct ScrapeOptionsBuilder {
    opts: ScrapeOptions,
}

impl ScrapeOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            opts: ScrapeOptions::default(),
        }
    }

    /// Set the portal base URL (scheme and host, no trailing path).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn election_id(mut self, id: u32) -> Self {
        self.opts.election_id = id;
        self
    }

    pub fn candidate_type(mut self, candidate_type: u32) -> Self {
        self.opts.candidate_type = candidate_type;
        self
    }

    /// Set or clear the candidate status filter.
    pub fn status_filter(mut self, status: Option<u32>) -> Self {
        self.opts.status_filter = status;
        self
    }

    pub fn schema(mut self, schema: SchemaVariant) -> Self {
        self.opts.schema = schema;
        self
    }

    /// Use a custom ordinal-to-field mapping instead of the schema's default.
    pub fn column_layout(mut self, layout: ColumnLayout) -> Self {
        self.opts.column_layout = Some(layout);
        self
    }

    /// Set the number of candidate slots per output row.
    pub fn max_candidates(mut self, max: usize) -> Self {
        self.opts.max_candidates = max;
        self
    }

    /// Set the delay observed before each candidate table request.
    pub fn request_delay(mut self, delay: Duration) -> Self {
        self.opts.request_delay = delay;
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.opts.probe_timeout = timeout;
        self
    }

    /// Set the timeout for listing and candidate requests.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.opts.request_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Replace the district name override table.
    pub fn district_overrides(mut self, overrides: DistrictNameOverrides) -> Self {
        self.opts.district_overrides = overrides;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.opts.failure_policy = policy;
        self
    }

    pub fn build(self) -> ScrapeOptions {
        self.opts
    }
}

impl Default for ScrapeOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_election_job() {
        let opts = ScrapeOptions::default();
        assert_eq!(opts.base_url, "http://103.183.38.66");
        assert_eq!(opts.election_id, 478);
        assert_eq!(opts.candidate_type, 1);
        assert_eq!(opts.status_filter, None);
        assert_eq!(opts.schema, SchemaVariant::WithSymbol);
        assert_eq!(opts.max_candidates, 15);
        assert_eq!(opts.request_delay, Duration::from_millis(500));
        assert_eq!(opts.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn builder_trims_trailing_slash() {
        let opts = ScrapeOptions::builder()
            .base_url("http://localhost:8080/")
            .status_filter(Some(11))
            .schema(SchemaVariant::NoSymbol)
            .build();
        assert_eq!(opts.base_url, "http://localhost:8080");
        assert_eq!(opts.status_filter, Some(11));
        assert_eq!(opts.schema.slot_width(), 3);
    }

    #[test]
    fn custom_layout_replaces_schema_default() {
        let opts = ScrapeOptions::builder().schema(SchemaVariant::NoSymbol).build();
        assert_eq!(opts.layout(), ColumnLayout::without_symbol());

        let shifted = ColumnLayout {
            name: 1,
            photo: 2,
            party: 3,
            symbol: Some(4),
        };
        let opts = ScrapeOptions::builder().column_layout(shifted).build();
        assert_eq!(opts.layout(), shifted);
        assert_eq!(opts.schema, SchemaVariant::WithSymbol);
    }

    #[test]
    fn schema_display() {
        assert_eq!(SchemaVariant::WithSymbol.to_string(), "with-symbol");
        assert_eq!(SchemaVariant::NoSymbol.to_string(), "no-symbol");
    }
}

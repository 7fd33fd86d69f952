// ABOUTME: Error types for the candidate scraper including ErrorCode enum and ScrapeError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the failure categories of a scrape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Connectivity,
    Reference,
    Fetch,
    Decode,
    Output,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Connectivity => "portal unreachable",
            ErrorCode::Reference => "reference data error",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Decode => "decode error",
            ErrorCode::Output => "output error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for scrape operations.
///
/// `target` is the URL or file path the operation was working on.
#[derive(Debug, thiserror::Error)]
pub struct ScrapeError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ecmap: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ScrapeError {
    fn with_code(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidUrl, target, op, source)
    }

    /// Create a Connectivity error.
    pub fn connectivity(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Connectivity, target, op, source)
    }

    /// Create a Reference error.
    pub fn reference(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Reference, target, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Fetch, target, op, source)
    }

    /// Create a Decode error.
    pub fn decode(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Decode, target, op, source)
    }

    /// Create an Output error.
    pub fn output(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Output, target, op, source)
    }

    /// Returns true if this is a Connectivity error.
    pub fn is_connectivity(&self) -> bool {
        self.code == ErrorCode::Connectivity
    }

    /// Returns true if this is a Reference error.
    pub fn is_reference(&self) -> bool {
        self.code == ErrorCode::Reference
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Decode error.
    pub fn is_decode(&self) -> bool {
        self.code == ErrorCode::Decode
    }

    /// Returns true if this is an Output error.
    pub fn is_output(&self) -> bool {
        self.code == ErrorCode::Output
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true for failures of a single traversal request (fetch or decode).
    ///
    /// These are the only errors a skip policy may absorb.
    pub fn is_traversal(&self) -> bool {
        matches!(self.code, ErrorCode::Fetch | ErrorCode::Decode)
    }
}

/// Result alias used throughout the scraper.
pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_target_and_source() {
        let err = ScrapeError::fetch(
            "http://portal/get/candidate/data",
            "FetchCandidateHtml",
            Some(anyhow::anyhow!("status 500")),
        );
        assert_eq!(
            err.to_string(),
            "ecmap: FetchCandidateHtml http://portal/get/candidate/data: fetch error: status 500"
        );
    }

    #[test]
    fn display_without_source() {
        let err = ScrapeError::connectivity("http://portal/", "Probe", None);
        assert_eq!(err.to_string(), "ecmap: Probe http://portal/: portal unreachable");
    }

    #[test]
    fn traversal_predicate_covers_fetch_and_decode_only() {
        assert!(ScrapeError::fetch("u", "op", None).is_traversal());
        assert!(ScrapeError::decode("u", "op", None).is_traversal());
        assert!(!ScrapeError::connectivity("u", "op", None).is_traversal());
        assert!(!ScrapeError::reference("f", "op", None).is_traversal());
        assert!(!ScrapeError::output("f", "op", None).is_traversal());
    }
}

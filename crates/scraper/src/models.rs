// ABOUTME: Domain records for one traversal pass: districts, constituencies and candidates.
// ABOUTME: Districts and constituencies are enriched copies of the raw portal records.

use serde::{Deserialize, Serialize};

/// A district (zilla) enriched with its division and boundary-dataset English name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub local_name: String,
    pub english_name: String,
    pub division: String,
}

/// An electoral seat inside a district.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituency {
    pub id: String,
    pub local_name: String,
    /// Seat number in Latin digits; empty when the label carried none.
    pub number: String,
    /// `"<District>-<n>"`, or the label verbatim when no number was found.
    pub display_code: String,
}

/// A candidate row as read from the portal's candidate table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub party: String,
    /// Ballot symbol name; only present for the symbol-bearing table layout.
    pub symbol: Option<String>,
    pub photo_url: String,
}

/// A candidate ready for output, with the image already resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub name: String,
    pub party: String,
    pub symbol: Option<String>,
    pub image_url: String,
}

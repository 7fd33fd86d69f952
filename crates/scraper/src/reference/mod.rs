// ABOUTME: Read-only lookup tables loaded once before traversal begins.
// ABOUTME: Division/district names for enrichment and ballot symbol images.

pub mod division;
pub mod symbols;

pub use division::{DistrictNameOverrides, DivisionEntry, DivisionMappingIndex, UNKNOWN_DIVISION};
pub use symbols::SymbolImageIndex;

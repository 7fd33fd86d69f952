// ABOUTME: Splits localized constituency labels such as "ঢাকা-১" into district fragment and seat number.
// ABOUTME: Also derives the "<District>-<n>" display code used as the constituency column.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::numerals::to_latin_digits;

/// Greedy prefix, then a dash and a suffix made only of Bengali or Latin digits.
static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)-([০-৯0-9]+)$").unwrap());

/// Splits `label` into `(prefix, number)` with the number in Latin digits.
///
/// Labels that do not end in `-<digits>` come back as `(label, "")`.
pub fn resolve_code(label: &str) -> (String, String) {
    match LABEL_RE.captures(label) {
        Some(caps) => (caps[1].to_string(), to_latin_digits(&caps[2])),
        None => (label.to_string(), String::new()),
    }
}

/// Builds the display code for a constituency.
///
/// `"<english_district>-<n>"` when a seat number resolves, otherwise the label verbatim.
/// An empty label falls back to `fallback_id` so the code is never empty.
pub fn display_code(english_district: &str, label: &str, fallback_id: &str) -> String {
    let (_, number) = resolve_code(label);
    if !number.is_empty() {
        format!("{}-{}", english_district, number)
    } else if !label.is_empty() {
        label.to_string()
    } else {
        fallback_id.to_string()
    }
}

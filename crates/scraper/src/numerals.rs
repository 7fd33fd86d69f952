// ABOUTME: Digit-script transliteration between Bengali and Latin numerals.
// ABOUTME: Uses a fixed ten-entry glyph table; every other character passes through untouched.

/// Bengali digit glyphs paired with their Latin equivalents, in value order.
pub const BENGALI_DIGITS: [(char, char); 10] = [
    ('০', '0'),
    ('১', '1'),
    ('২', '2'),
    ('৩', '3'),
    ('৪', '4'),
    ('৫', '5'),
    ('৬', '6'),
    ('৭', '7'),
    ('৮', '8'),
    ('৯', '9'),
];

/// Returns true if `c` is one of the ten Bengali digit glyphs.
pub fn is_bengali_digit(c: char) -> bool {
    BENGALI_DIGITS.iter().any(|&(bn, _)| bn == c)
}

/// Transliterates Bengali digits in `s` to Latin digits.
///
/// Characters outside the table, including Latin digits, are kept verbatim and in place.
pub fn to_latin_digits(s: &str) -> String {
    s.chars()
        .map(|c| {
            BENGALI_DIGITS
                .iter()
                .find(|&&(bn, _)| bn == c)
                .map(|&(_, en)| en)
                .unwrap_or(c)
        })
        .collect()
}

/// Transliterates Latin digits in `s` to Bengali digits.
pub fn to_bengali_digits(s: &str) -> String {
    s.chars()
        .map(|c| {
            BENGALI_DIGITS
                .iter()
                .find(|&&(_, en)| en == c)
                .map(|&(bn, _)| bn)
                .unwrap_or(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_each_glyph() {
        assert_eq!(to_latin_digits("০১২৩৪৫৬৭৮৯"), "0123456789");
    }

    #[test]
    fn table_is_a_bijection() {
        for &(bn, en) in &BENGALI_DIGITS {
            let forward = to_latin_digits(&bn.to_string());
            assert_eq!(forward, en.to_string());
            assert_eq!(to_bengali_digits(&forward), bn.to_string());
        }
        let mut latin: Vec<char> = BENGALI_DIGITS.iter().map(|&(_, en)| en).collect();
        latin.dedup();
        assert_eq!(latin.len(), 10);
    }

    #[test]
    fn preserves_non_digits_in_place() {
        assert_eq!(to_latin_digits("ঢাকা-১৫"), "ঢাকা-15");
        assert_eq!(to_latin_digits("Seat ২ of ৩"), "Seat 2 of 3");
    }

    #[test]
    fn latin_and_mixed_input_is_accepted() {
        assert_eq!(to_latin_digits("Dhaka-12"), "Dhaka-12");
        assert_eq!(to_latin_digits("1২3"), "123");
        assert_eq!(to_latin_digits(""), "");
    }

    #[test]
    fn normalizing_twice_is_idempotent() {
        let once = to_latin_digits("১-২/৩ ৯০");
        assert_eq!(to_latin_digits(&once), once);
        assert_eq!(to_bengali_digits(&once), "১-২/৩ ৯০");
    }

    #[test]
    fn recognizes_only_bengali_glyphs() {
        assert!(is_bengali_digit('৭'));
        assert!(!is_bengali_digit('7'));
        assert!(!is_bengali_digit('ক'));
    }
}

//! Identifier classification for precedent lookups.
//!
//! Two identifier forms reach the resolver: the registry's numeric sequence
//! number ("204337") and the human-readable docket case number
//! ("2018두42559" = year, hangul case-type mark, serial). Resolution only
//! ever keys off the numeric form; the case-number shape check exists for
//! diagnostics.

/// True when the entire string is ASCII decimal digits.
///
/// Anchored at both ends; a partial numeric prefix does not qualify.
pub fn is_sequence_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Rough shape check for docket case numbers: digits, then at least one
/// non-digit character (the case-type mark), then digits, nothing else.
///
/// Used for logging and diagnostics only; it never gates resolution, since
/// the registry indexes identifiers this check would reject.
pub fn looks_like_case_number(s: &str) -> bool {
    let s = s.trim();
    let mut chars = s.chars().peekable();

    let mut year_digits = 0usize;
    while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
        year_digits += 1;
    }

    let mut mark_chars = 0usize;
    while chars
        .peek()
        .is_some_and(|c| !c.is_ascii_digit() && !c.is_whitespace())
    {
        chars.next();
        mark_chars += 1;
    }

    let mut serial_digits = 0usize;
    while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
        serial_digits += 1;
    }

    year_digits > 0 && mark_chars > 0 && serial_digits > 0 && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_number_all_digits() {
        assert!(is_sequence_number("204337"));
        assert!(is_sequence_number("99999"));
        assert!(is_sequence_number("0"));
    }

    #[test]
    fn sequence_number_rejects_partial_matches() {
        assert!(!is_sequence_number("204337x"));
        assert!(!is_sequence_number("x204337"));
        assert!(!is_sequence_number("2018두42559"));
        assert!(!is_sequence_number("12 34"));
    }

    #[test]
    fn sequence_number_rejects_empty() {
        assert!(!is_sequence_number(""));
    }

    #[test]
    fn sequence_number_rejects_non_ascii_digits() {
        // Full-width digits are not registry sequence numbers.
        assert!(!is_sequence_number("１２３"));
    }

    #[test]
    fn case_number_shapes() {
        assert!(looks_like_case_number("2018두42559"));
        assert!(looks_like_case_number("2023다318857"));
        assert!(looks_like_case_number("99누1992"));
    }

    #[test]
    fn case_number_rejects_other_shapes() {
        assert!(!looks_like_case_number("zz-not-a-case"));
        assert!(!looks_like_case_number("204337"));
        assert!(!looks_like_case_number("2018두"));
        assert!(!looks_like_case_number("두42559"));
        assert!(!looks_like_case_number(""));
        assert!(!looks_like_case_number("2018두42559다9"));
    }

    #[test]
    fn case_number_trims_whitespace() {
        assert!(looks_like_case_number("  2018두42559  "));
    }
}

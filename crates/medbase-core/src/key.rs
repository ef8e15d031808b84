//! Registration-number canonicalization.
//!
//! Raw registration numbers arrive with dots, dashes, check digits and
//! source-specific padding. The canonical form is digit-only and capped at
//! ten digits, which is the shape shared by both extracts and therefore the
//! join key of the whole pipeline.

/// Canonicalizes a raw registration-number string.
///
/// - `None` or empty input stays `None`.
/// - Every non-digit character is stripped.
/// - Ten or more digits truncate to the first ten; shorter strings pass
///   through unchanged (they can still match exactly within one dataset).
///
/// An input with no digits at all canonicalizes to `Some("")` — an empty key
/// is a valid, if useless, join key and is deliberately not folded to `None`.
pub fn canonicalize_registration(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 10 {
        Some(digits[..10].to_string())
    } else {
        Some(digits)
    }
}

//! Free-text presentation parsing.
//!
//! Presentation text is human-authored and inconsistent ("500MG + 125MG
//! COMPRIMIDO REVESTIDO CT BL AL PLAS INC"). The parser is a best-effort
//! extractor with a total contract: it never fails, it only degrades to
//! `None` fields, and downstream consumers treat `None` as "unparseable"
//! rather than as an error.

use std::sync::LazyLock;

use regex::Regex;

/// Dose quantities: number with optional decimal comma, a unit from the
/// mass/volume/percentage vocabulary, an optional per-unit suffix, repeated
/// with `+` for combination drugs ("500MG + 125MG").
static DOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d+(?:,\d+)?\s*(?:MG|G|ML|%)(?:/\w+)?(?:\s*\+\s*\d+(?:,\d+)?\s*(?:MG|G|ML|%)(?:/\w+)?)*",
    )
    .expect("dose pattern")
});

/// Packaging/container markers; the first match and everything after it is
/// packaging metadata, not dosage form.
static PACKAGING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:CT|CX|FR|BG|VD|PLAS|AMB|TRANS|OPC|PEAD|DESCART\u{c1}VEL)\s*.*$")
        .expect("packaging pattern")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Known dosage forms, matched by case-insensitive containment.
pub const DOSAGE_FORMS: [&str; 10] = [
    "COMPRIMIDO",
    "C\u{c1}PSULA",
    "SOLU\u{c7}\u{c3}O",
    "INJE\u{c7}\u{c3}O",
    "SUSPENS\u{c3}O",
    "XAROPE",
    "CREME",
    "POMADA",
    "GEL",
    "EMU",
];

/// The (dose, form) pair extracted from one presentation string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPresentation {
    pub dose: Option<String>,
    pub form: Option<String>,
}

/// True when the cleaned form text contains a known dosage-form word.
///
/// The vocabulary does not change what `parse_presentation` returns — an
/// unknown remainder is still kept as a best-effort form — but the hit rate
/// is a useful quality diagnostic for the merge stage.
pub fn is_known_form(form: &str) -> bool {
    let upper = form.to_uppercase();
    DOSAGE_FORMS.iter().any(|f| upper.contains(f))
}

/// Extracts a (dose, form) pair from free presentation text. Total: never
/// fails, only degrades to `None` fields.
pub fn parse_presentation(text: Option<&str>) -> ParsedPresentation {
    let Some(text) = text else {
        return ParsedPresentation::default();
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedPresentation::default();
    }

    // First dose-shaped match wins; the match range is spliced out so the
    // remainder is pure form/packaging text.
    let (dose, remainder) = match DOSE.find(trimmed) {
        Some(m) => (
            Some(m.as_str().to_string()),
            format!("{}{}", &trimmed[..m.start()], &trimmed[m.end()..]),
        ),
        None => (None, trimmed.to_string()),
    };

    let without_packaging = PACKAGING.replace(&remainder, "");
    let cleaned = WHITESPACE
        .replace_all(without_packaging.trim(), " ")
        .into_owned();

    let form = if cleaned.is_empty() { None } else { Some(cleaned) };

    ParsedPresentation { dose, form }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedPresentation {
        parse_presentation(Some(text))
    }

    #[test]
    fn combination_dose_with_packaging_tail() {
        let parsed = parse("500MG + 125MG COMPRIMIDO REVESTIDO CT BL AL PLAS INC");
        assert_eq!(parsed.dose.as_deref(), Some("500MG + 125MG"));
        assert_eq!(parsed.form.as_deref(), Some("COMPRIMIDO REVESTIDO"));
    }

    #[test]
    fn form_without_dose() {
        let parsed = parse("SOLU\u{c7}\u{c3}O INJET\u{c1}VEL");
        assert_eq!(parsed.dose, None);
        assert_eq!(parsed.form.as_deref(), Some("SOLU\u{c7}\u{c3}O INJET\u{c1}VEL"));
    }

    #[test]
    fn simple_dose_and_form() {
        let parsed = parse("500MG COMPRIMIDO CT BL AL PLAS");
        assert_eq!(parsed.dose.as_deref(), Some("500MG"));
        assert_eq!(parsed.form.as_deref(), Some("COMPRIMIDO"));
    }

    #[test]
    fn decimal_comma_and_per_unit_suffix() {
        let parsed = parse("2,5MG/ML SUSPENS\u{c3}O ORAL FR 150ML");
        assert_eq!(parsed.dose.as_deref(), Some("2,5MG/ML"));
        assert_eq!(parsed.form.as_deref(), Some("SUSPENS\u{c3}O ORAL"));
    }

    #[test]
    fn unknown_form_is_kept_as_best_effort() {
        let parsed = parse("10MG ADESIVO TRANSDERMICO");
        assert_eq!(parsed.dose.as_deref(), Some("10MG"));
        // TRANS is a packaging marker, so the tail is cut there.
        assert_eq!(parsed.form.as_deref(), Some("ADESIVO"));
        assert!(!is_known_form("ADESIVO"));
    }

    #[test]
    fn null_and_blank_degrade_to_none() {
        assert_eq!(parse_presentation(None), ParsedPresentation::default());
        assert_eq!(parse(""), ParsedPresentation::default());
        assert_eq!(parse("   "), ParsedPresentation::default());
    }

    #[test]
    fn dose_only_text_has_no_form() {
        let parsed = parse("500MG");
        assert_eq!(parsed.dose.as_deref(), Some("500MG"));
        assert_eq!(parsed.form, None);
    }

    #[test]
    fn never_panics_on_noise() {
        for text in ["???", "+++", "MG", "123", "CT", " % ", "\u{e7}\u{e3}o"] {
            let _ = parse(text);
        }
    }

    #[test]
    fn known_form_vocabulary_is_case_insensitive() {
        assert!(is_known_form("Comprimido Revestido"));
        assert!(is_known_form("xarope"));
        assert!(!is_known_form("P\u{d3} LIOFILIZADO"));
    }
}

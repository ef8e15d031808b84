//! Status-text folding.
//!
//! Registry status values are human-entered Portuguese ("VÁLIDO", "Ativo",
//! "válido") and the extract encoding already varies, so the accepted-status
//! check runs on a folded form: lowercase, Latin accents stripped, anything
//! else non-ASCII dropped.

/// Registration statuses that keep a record in the pipeline, in folded form.
pub const ACCEPTED_STATUSES: [&str; 2] = ["valido", "ativo"];

/// Folds status text: lowercase, accents stripped to their ASCII base
/// letter, remaining non-ASCII dropped.
pub fn fold_status(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter_map(fold_char)
        .collect()
}

/// True when the folded status is in the accepted vocabulary.
pub fn is_accepted_status(text: &str) -> bool {
    let folded = fold_status(text);
    ACCEPTED_STATUSES.contains(&folded.as_str())
}

fn fold_char(c: char) -> Option<char> {
    let folded = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        c if c.is_ascii() => c,
        _ => return None,
    };
    Some(folded)
}

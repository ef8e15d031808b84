//! Pricing extract loading.

use std::path::Path;

use medbase_model::RawPricingRecord;

use crate::error::Result;
use crate::extract::{ExtractOptions, read_extract};

/// Column names carrying the registration key and the presentation text.
///
/// Pricing producers rename these between releases, so both are overridable;
/// the defaults match the CMED price-list layout.
#[derive(Debug, Clone)]
pub struct PricingColumns {
    pub registration: String,
    pub presentation: String,
}

impl Default for PricingColumns {
    fn default() -> Self {
        Self {
            registration: "REGISTRO".to_string(),
            presentation: "APRESENTA\u{c7}\u{c3}O".to_string(),
        }
    }
}

/// Loads the pricing/presentation extract into raw records.
pub fn load_pricing(
    path: &Path,
    options: &ExtractOptions,
    columns: &PricingColumns,
) -> Result<Vec<RawPricingRecord>> {
    let extract = read_extract(path, options)?;

    let registration_idx = extract.require_column(&columns.registration)?;
    let presentation_idx = extract.require_column(&columns.presentation)?;

    let records = extract
        .rows
        .iter()
        .map(|row| RawPricingRecord {
            registration: extract.value(row, registration_idx).to_string(),
            presentation: extract.value(row, presentation_idx).to_string(),
        })
        .collect::<Vec<_>>();

    tracing::info!(
        path = %extract.path.display(),
        records = records.len(),
        "pricing extract loaded"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_pricing_rows_with_default_columns() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "REGISTRO,APRESENTA\u{c7}\u{c3}O\n1234567890123,500MG COMPRIMIDO CT BL AL PLAS\n"
        )
        .unwrap();

        let records =
            load_pricing(file.path(), &ExtractOptions::default(), &PricingColumns::default())
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].registration, "1234567890123");
        assert_eq!(records[0].presentation, "500MG COMPRIMIDO CT BL AL PLAS");
    }

    #[test]
    fn column_overrides_apply() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "CODIGO,DESCRICAO\n42,10MG GEL\n").unwrap();

        let columns = PricingColumns {
            registration: "CODIGO".to_string(),
            presentation: "DESCRICAO".to_string(),
        };
        let records = load_pricing(file.path(), &ExtractOptions::default(), &columns).unwrap();
        assert_eq!(records[0].registration, "42");
    }

    #[test]
    fn missing_presentation_column_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "REGISTRO\n42\n").unwrap();

        let err = load_pricing(
            file.path(),
            &ExtractOptions::default(),
            &PricingColumns::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }
}

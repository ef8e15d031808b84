//! Registry extract loading.

use std::path::Path;

use medbase_model::RawRegistryRecord;

use crate::error::Result;
use crate::extract::{ExtractOptions, SourceEncoding, read_extract};

pub const PRODUCT_NAME: &str = "NOME_PRODUTO";
pub const INGREDIENT: &str = "PRINCIPIO_ATIVO";
pub const COMPANY: &str = "EMPRESA_DETENTORA_REGISTRO";
pub const REGISTRATION: &str = "NUMERO_REGISTRO_PRODUTO";
pub const STATUS: &str = "SITUACAO_REGISTRO";

/// Default read options for the registry extract: `;`-delimited Latin-1.
pub fn default_registry_options() -> ExtractOptions {
    ExtractOptions {
        delimiter: b';',
        encoding: SourceEncoding::Latin1,
    }
}

/// Loads the regulatory registry extract into raw records.
///
/// All five required columns must be present; anything else in the file is
/// ignored.
pub fn load_registry(path: &Path, options: &ExtractOptions) -> Result<Vec<RawRegistryRecord>> {
    let extract = read_extract(path, options)?;

    let name_idx = extract.require_column(PRODUCT_NAME)?;
    let ingredient_idx = extract.require_column(INGREDIENT)?;
    let company_idx = extract.require_column(COMPANY)?;
    let registration_idx = extract.require_column(REGISTRATION)?;
    let status_idx = extract.require_column(STATUS)?;

    let records = extract
        .rows
        .iter()
        .map(|row| RawRegistryRecord {
            product_name: extract.value(row, name_idx).to_string(),
            ingredient_text: extract.value(row, ingredient_idx).to_string(),
            company_text: extract.value(row, company_idx).to_string(),
            registration: extract.value(row, registration_idx).to_string(),
            status: extract.value(row, status_idx).to_string(),
        })
        .collect::<Vec<_>>();

    tracing::info!(
        path = %extract.path.display(),
        records = records.len(),
        "registry extract loaded"
    );
    Ok(records)
}

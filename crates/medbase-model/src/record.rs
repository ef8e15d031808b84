#![deny(unsafe_code)]

//! Flat record shapes flowing through the pipeline, upstream of normalization.

/// One row of the regulatory registry extract, as read from disk.
///
/// Fields carry the source text verbatim; canonicalization and parsing happen
/// downstream. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawRegistryRecord {
    pub product_name: String,
    /// Possibly multi-valued, `+`-delimited ingredient text.
    pub ingredient_text: String,
    /// Holder company in `"<CNPJ> - <company name>"` form.
    pub company_text: String,
    /// Raw registration-number string, shape varies by source.
    pub registration: String,
    /// Registration status text, accented and mixed-case in the wild.
    pub status: String,
}

/// One row of the pricing/presentation extract.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawPricingRecord {
    pub registration: String,
    /// Free-text presentation/description, e.g. "500MG COMPRIMIDO CT BL AL PLAS".
    pub presentation: String,
}

/// Registry attributes enriched with parsed pricing attributes, one record
/// per canonical registration key.
///
/// This is the stable contract between the merge and normalization stages;
/// neither side depends on source column ordering.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MergedProductRecord {
    /// Canonical registration key; unique within a merged set.
    pub registration: String,
    pub product_name: String,
    pub ingredient_text: String,
    pub company_text: String,
    /// Parsed dose, None when the presentation text was absent or unparseable.
    pub dose: Option<String>,
    /// Parsed dosage form, None when absent or unparseable.
    pub form: Option<String>,
}

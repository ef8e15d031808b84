//! Cross-dataset merge: status filter, dedup by canonical key, left outer
//! join of parsed pricing attributes onto registry attributes.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use medbase_model::{MergedProductRecord, RawPricingRecord, RawRegistryRecord};
use tracing::{debug, info};

use crate::key::canonicalize_registration;
use crate::presentation::{ParsedPresentation, is_known_form, parse_presentation};
use crate::text::is_accepted_status;

/// Stage counts for the merge, reported as the run's audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Registry rows read from the extract.
    pub registry_total: usize,
    /// Rows surviving the accepted-status filter.
    pub status_kept: usize,
    /// Rows remaining after keep-first dedup by canonical key.
    pub registry_unique: usize,
    /// Rows dropped because the registration canonicalized to null.
    pub missing_key_drops: usize,
    /// Pricing rows read from the extract.
    pub pricing_total: usize,
    /// Pricing rows remaining after keep-first dedup by canonical key.
    pub pricing_unique: usize,
    /// Merged records that picked up a non-null dose.
    pub dose_matches: usize,
    /// Merged records that picked up a non-null form.
    pub form_matches: usize,
}

/// Merges the registry and pricing record sets.
///
/// Every surviving registry record appears exactly once in the output,
/// pricing match or not — pricing data is enrichment, never a filter. The
/// output length always equals `report.registry_unique`.
pub fn merge(
    registry: &[RawRegistryRecord],
    pricing: &[RawPricingRecord],
) -> (Vec<MergedProductRecord>, MergeReport) {
    let mut report = MergeReport {
        registry_total: registry.len(),
        pricing_total: pricing.len(),
        ..MergeReport::default()
    };

    // Status filter: anything outside the accepted vocabulary is dropped
    // entirely and never appears downstream.
    let accepted: Vec<&RawRegistryRecord> = registry
        .iter()
        .filter(|r| is_accepted_status(&r.status))
        .collect();
    report.status_kept = accepted.len();

    // Keep-first dedup by canonical key, preserving original order. A record
    // whose registration canonicalizes to null cannot carry the merge
    // primary key and is dropped here, counted.
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut deduped: Vec<(String, &RawRegistryRecord)> = Vec::new();
    for record in accepted {
        let Some(key) = canonicalize_registration(Some(&record.registration)) else {
            report.missing_key_drops += 1;
            continue;
        };
        if seen.insert(key.clone()) {
            deduped.push((key, record));
        }
    }
    report.registry_unique = deduped.len();

    // Pricing side: canonicalize, parse each presentation, keep-first.
    let mut parsed_pricing: BTreeMap<String, ParsedPresentation> = BTreeMap::new();
    for record in pricing {
        let Some(key) = canonicalize_registration(Some(&record.registration)) else {
            continue;
        };
        parsed_pricing
            .entry(key)
            .or_insert_with(|| parse_presentation(Some(&record.presentation)));
    }
    report.pricing_unique = parsed_pricing.len();

    // Left outer join.
    let mut merged = Vec::with_capacity(deduped.len());
    let mut unrecognized_forms = 0usize;
    for (key, record) in deduped {
        let attrs = parsed_pricing.get(&key).cloned().unwrap_or_default();
        if attrs.dose.is_some() {
            report.dose_matches += 1;
        }
        if let Some(form) = &attrs.form {
            report.form_matches += 1;
            if !is_known_form(form) {
                unrecognized_forms += 1;
            }
        }
        merged.push(MergedProductRecord {
            registration: key,
            product_name: record.product_name.clone(),
            ingredient_text: record.ingredient_text.clone(),
            company_text: record.company_text.clone(),
            dose: attrs.dose,
            form: attrs.form,
        });
    }

    info!(
        registry_total = report.registry_total,
        status_kept = report.status_kept,
        registry_unique = report.registry_unique,
        missing_key_drops = report.missing_key_drops,
        pricing_unique = report.pricing_unique,
        dose_matches = report.dose_matches,
        "merge complete"
    );
    if unrecognized_forms > 0 {
        debug!(unrecognized_forms, "forms outside the known vocabulary kept as-is");
    }

    (merged, report)
}

//! Schema normalization: decomposes the merged flat record set into four
//! relational entity collections with explicit foreign keys.

use std::collections::{BTreeMap, BTreeSet};

use medbase_model::{
    ActiveIngredient, Company, MergedProductRecord, NormalizedTables, Product,
    ProductIngredientLink,
};
use tracing::{info, warn};

/// Name → surrogate-id index for active ingredients.
///
/// Seed it from the store before normalizing against an existing database,
/// so re-runs reuse the ids already on disk instead of minting conflicting
/// ones; a fresh catalog starts ids at 1.
#[derive(Debug, Clone, Default)]
pub struct IngredientCatalog {
    by_name: BTreeMap<String, i64>,
    next_id: i64,
}

impl IngredientCatalog {
    pub fn new() -> Self {
        Self {
            by_name: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Builds a catalog over ids already present in the store.
    pub fn with_existing(existing: BTreeMap<String, i64>) -> Self {
        let next_id = existing.values().max().copied().unwrap_or(0) + 1;
        Self {
            by_name: existing,
            next_id,
        }
    }

    fn resolve_or_insert(&mut self, name: &str) -> i64 {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.by_name.insert(name.to_string(), id);
        id
    }

    fn get(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }
}

/// Diagnostics for one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Link fragments that failed to resolve to an ingredient id (skipped).
    pub unresolved_fragments: usize,
    /// Records whose holder text lacked the `" - "` separator.
    pub malformed_company: usize,
}

/// Splits holder text into (company code, display name) on the first
/// `" - "`. Absent separator or empty text means no company association.
pub fn split_company(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    text.split_once(" - ")
}

/// Splits `+`-delimited ingredient text into trimmed, non-empty fragments.
pub fn split_ingredients(text: &str) -> Vec<&str> {
    text.split('+')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Decomposes merged records into the four entity collections.
///
/// Single pass, deterministic, idempotent: normalizing the same merged input
/// twice — with the same catalog seed — produces identical row sets. All
/// collections are insert-if-absent by their primary key, so duplicate input
/// never produces duplicate rows.
pub fn normalize(
    merged: &[MergedProductRecord],
    catalog: &mut IngredientCatalog,
) -> (NormalizedTables, NormalizeReport) {
    let mut report = NormalizeReport::default();

    // Companies, deduplicated by code.
    let mut companies: BTreeMap<String, Company> = BTreeMap::new();
    for record in merged {
        if let Some((cnpj, name)) = split_company(&record.company_text) {
            companies.entry(cnpj.to_string()).or_insert_with(|| Company {
                cnpj: cnpj.to_string(),
                name: name.to_string(),
            });
        } else {
            report.malformed_company += 1;
        }
    }

    // Distinct ingredient names across all records, ids assigned in sorted
    // order so a fresh catalog numbers them deterministically.
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for record in merged {
        names.extend(split_ingredients(&record.ingredient_text));
    }
    let ingredients: Vec<ActiveIngredient> = names
        .iter()
        .map(|name| ActiveIngredient {
            id: catalog.resolve_or_insert(name),
            name: (*name).to_string(),
        })
        .collect();

    // Product rows, insert-if-absent by registration.
    let mut seen_products: BTreeSet<&str> = BTreeSet::new();
    let mut products: Vec<Product> = Vec::with_capacity(merged.len());
    for record in merged {
        if !seen_products.insert(&record.registration) {
            continue;
        }
        let company_cnpj = split_company(&record.company_text).map(|(cnpj, _)| cnpj.to_string());
        products.push(Product {
            registration: record.registration.clone(),
            name: record.product_name.clone(),
            company_cnpj,
            dose: record.dose.clone(),
            form: record.form.clone(),
        });
    }

    // Link rows, insert-if-absent by composite key. A fragment missing from
    // the catalog is skipped, not fatal.
    let mut links: BTreeSet<ProductIngredientLink> = BTreeSet::new();
    for record in merged {
        for fragment in split_ingredients(&record.ingredient_text) {
            match catalog.get(fragment) {
                Some(ingredient_id) => {
                    links.insert(ProductIngredientLink {
                        registration: record.registration.clone(),
                        ingredient_id,
                    });
                }
                None => report.unresolved_fragments += 1,
            }
        }
    }

    let tables = NormalizedTables {
        companies: companies.into_values().collect(),
        ingredients,
        products,
        links: links.into_iter().collect(),
    };

    info!(
        companies = tables.companies.len(),
        ingredients = tables.ingredients.len(),
        products = tables.products.len(),
        links = tables.links.len(),
        "normalization complete"
    );
    if report.unresolved_fragments > 0 {
        warn!(
            unresolved_fragments = report.unresolved_fragments,
            "ingredient fragments skipped"
        );
    }

    (tables, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged(registration: &str, ingredient_text: &str, company_text: &str) -> MergedProductRecord {
        MergedProductRecord {
            registration: registration.to_string(),
            product_name: format!("Product {registration}"),
            ingredient_text: ingredient_text.to_string(),
            company_text: company_text.to_string(),
            dose: None,
            form: None,
        }
    }

    #[test]
    fn splits_multi_valued_ingredients() {
        assert_eq!(
            split_ingredients("AMOXICILINA + CLAVULANATO DE POT\u{c1}SSIO"),
            vec!["AMOXICILINA", "CLAVULANATO DE POT\u{c1}SSIO"]
        );
        assert_eq!(split_ingredients(" + + "), Vec::<&str>::new());
    }

    #[test]
    fn company_split_requires_separator() {
        assert_eq!(
            split_company("12345678000190 - ACME LTDA"),
            Some(("12345678000190", "ACME LTDA"))
        );
        assert_eq!(split_company("ACME LTDA"), None);
        assert_eq!(split_company(""), None);
    }

    #[test]
    fn company_name_keeps_later_separators() {
        assert_eq!(
            split_company("1 - A - B"),
            Some(("1", "A - B"))
        );
    }

    #[test]
    fn malformed_company_yields_null_reference_and_no_row() {
        let records = vec![merged("1111111111", "X", "NO SEPARATOR HERE")];
        let (tables, report) = normalize(&records, &mut IngredientCatalog::new());
        assert!(tables.companies.is_empty());
        assert_eq!(tables.products[0].company_cnpj, None);
        assert_eq!(report.malformed_company, 1);
    }

    #[test]
    fn ingredient_names_are_unique_with_stable_ids() {
        let records = vec![
            merged("1111111111", "B + A", "1 - ACME"),
            merged("2222222222", "A", "1 - ACME"),
        ];
        let (tables, _) = normalize(&records, &mut IngredientCatalog::new());
        assert_eq!(tables.ingredients.len(), 2);
        // Sorted name order: A gets 1, B gets 2.
        assert_eq!(tables.ingredients[0], ActiveIngredient { id: 1, name: "A".to_string() });
        assert_eq!(tables.ingredients[1], ActiveIngredient { id: 2, name: "B".to_string() });
    }

    #[test]
    fn links_reference_existing_products_and_ingredients() {
        let records = vec![merged("1111111111", "A + B", "1 - ACME")];
        let (tables, report) = normalize(&records, &mut IngredientCatalog::new());
        assert_eq!(tables.links.len(), 2);
        for link in &tables.links {
            assert!(tables.products.iter().any(|p| p.registration == link.registration));
            assert!(tables.ingredients.iter().any(|i| i.id == link.ingredient_id));
        }
        assert_eq!(report.unresolved_fragments, 0);
    }

    #[test]
    fn normalization_is_idempotent() {
        let records = vec![
            merged("1111111111", "A + B", "1 - ACME"),
            merged("2222222222", "B", "2 - OTHER"),
        ];
        let mut catalog = IngredientCatalog::new();
        let (first, _) = normalize(&records, &mut catalog);
        let (second, _) = normalize(&records, &mut catalog);
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_merged_input_does_not_duplicate_rows() {
        let record = merged("1111111111", "A", "1 - ACME");
        let records = vec![record.clone(), record];
        let (tables, _) = normalize(&records, &mut IngredientCatalog::new());
        assert_eq!(tables.products.len(), 1);
        assert_eq!(tables.links.len(), 1);
        assert_eq!(tables.companies.len(), 1);
    }

    #[test]
    fn seeded_catalog_reuses_existing_ids() {
        let mut existing = BTreeMap::new();
        existing.insert("PARACETAMOL".to_string(), 7);
        let mut catalog = IngredientCatalog::with_existing(existing);

        let records = vec![merged("1111111111", "PARACETAMOL + CAFE\u{cd}NA", "1 - ACME")];
        let (tables, _) = normalize(&records, &mut catalog);

        let paracetamol = tables.ingredients.iter().find(|i| i.name == "PARACETAMOL").unwrap();
        assert_eq!(paracetamol.id, 7);
        let cafeina = tables.ingredients.iter().find(|i| i.name == "CAFE\u{cd}NA").unwrap();
        assert_eq!(cafeina.id, 8);
    }

    #[test]
    fn ingredient_matching_is_case_sensitive_on_trimmed_names() {
        let records = vec![
            merged("1111111111", " Paracetamol ", "1 - ACME"),
            merged("2222222222", "PARACETAMOL", "1 - ACME"),
        ];
        let (tables, _) = normalize(&records, &mut IngredientCatalog::new());
        assert_eq!(tables.ingredients.len(), 2);
    }
}

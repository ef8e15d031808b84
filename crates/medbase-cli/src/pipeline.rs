//! The extraction-merge-normalization pipeline, with explicit stages.
//!
//! 1. **Ingest**: load both extracts with their declared delimiter/encoding
//! 2. **Merge**: status filter, canonical-key dedup, left outer join
//! 3. **Normalize**: decompose into companies/ingredients/products/links
//! 4. **Store**: insert-if-absent write inside one transaction
//!
//! The store handle is opened here and passed to the stages that need it;
//! a fatal error at any stage leaves the store untouched.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use medbase_core::{IngredientCatalog, MergeReport, NormalizeReport, merge, normalize};
use medbase_ingest::{ExtractOptions, PricingColumns, load_pricing, load_registry};
use medbase_store::{Store, TableCounts};

/// Everything one pipeline run needs, resolved from CLI arguments.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub registry_path: PathBuf,
    pub pricing_path: PathBuf,
    pub db_path: PathBuf,
    pub registry_read: ExtractOptions,
    pub pricing_read: ExtractOptions,
    pub pricing_columns: PricingColumns,
    /// Run every stage but skip the store write.
    pub dry_run: bool,
}

/// Audit trail of a completed run: counts at every stage.
#[derive(Debug)]
pub struct RunSummary {
    pub merge: MergeReport,
    pub normalize: NormalizeReport,
    /// Entity counts produced by this run's normalization.
    pub produced: TableCounts,
    /// Store totals after the write; None on a dry run.
    pub store_totals: Option<TableCounts>,
}

/// Runs the whole pipeline. Fatal errors (missing columns, empty sources,
/// store failures) abort before anything is committed.
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    // =========================================================================
    // Stage 1: Ingest
    // =========================================================================
    let ingest_start = Instant::now();
    let ingest_span = info_span!("ingest");
    let (registry, pricing) = ingest_span.in_scope(|| -> Result<_> {
        let registry = load_registry(&options.registry_path, &options.registry_read)
            .context("load registry extract")?;
        let pricing = load_pricing(
            &options.pricing_path,
            &options.pricing_read,
            &options.pricing_columns,
        )
        .context("load pricing extract")?;
        Ok((registry, pricing))
    })?;
    info!(
        registry_records = registry.len(),
        pricing_records = pricing.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    // =========================================================================
    // Stage 2: Merge
    // =========================================================================
    let merge_span = info_span!("merge");
    let (merged, merge_report) = merge_span.in_scope(|| merge(&registry, &pricing));

    // =========================================================================
    // Stage 3: Normalize (catalog seeded from the store so re-runs reuse
    // existing surrogate ids)
    // =========================================================================
    let mut store = if options.dry_run {
        None
    } else {
        Some(Store::open(&options.db_path).context("open store")?)
    };
    let mut catalog = match &store {
        Some(store) => IngredientCatalog::with_existing(
            store
                .existing_ingredients()
                .context("read existing ingredients")?,
        ),
        None => IngredientCatalog::new(),
    };
    let normalize_span = info_span!("normalize");
    let (tables, normalize_report) =
        normalize_span.in_scope(|| normalize(&merged, &mut catalog));
    let produced = TableCounts {
        companies: tables.companies.len(),
        ingredients: tables.ingredients.len(),
        products: tables.products.len(),
        links: tables.links.len(),
    };

    // =========================================================================
    // Stage 4: Store
    // =========================================================================
    let store_totals = match store.as_mut() {
        Some(store) => {
            let store_start = Instant::now();
            let store_span = info_span!("store");
            store_span
                .in_scope(|| store.apply(&tables))
                .context("apply entity tables")?;
            let totals = store.table_counts().context("count entity tables")?;
            info!(
                db = %options.db_path.display(),
                products = totals.products,
                duration_ms = store_start.elapsed().as_millis(),
                "store write complete"
            );
            Some(totals)
        }
        None => {
            info!("dry run, store write skipped");
            None
        }
    };

    Ok(RunSummary {
        merge: merge_report,
        normalize: normalize_report,
        produced,
        store_totals,
    })
}

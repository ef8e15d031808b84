#![deny(unsafe_code)]

//! SQLite-backed relational store for the normalized product schema.
//!
//! The store is exclusively owned by the pipeline during a run. All entity
//! writes are `INSERT OR IGNORE` inside a single transaction, so a run
//! either commits the full set or leaves existing contents untouched, and
//! re-running on the same input is a no-op.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{Connection, params};
use thiserror::Error;
use tracing::debug;

use medbase_model::NormalizedTables;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS companies (
    cnpj TEXT PRIMARY KEY,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS active_ingredients (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS products (
    registration TEXT PRIMARY KEY,
    name         TEXT,
    company_cnpj TEXT,
    dose         TEXT,
    form         TEXT,
    FOREIGN KEY (company_cnpj) REFERENCES companies (cnpj)
);
CREATE TABLE IF NOT EXISTS product_ingredients (
    registration  TEXT,
    ingredient_id INTEGER,
    PRIMARY KEY (registration, ingredient_id),
    FOREIGN KEY (registration)  REFERENCES products (registration),
    FOREIGN KEY (ingredient_id) REFERENCES active_ingredients (id)
);
";

/// Row counts per entity table, for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub companies: usize,
    pub ingredients: usize,
    pub products: usize,
    pub links: usize,
}

/// Handle over the relational store.
///
/// Passed explicitly into the pipeline stages that need it; there is no
/// ambient global connection.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the store at `path` and ensures the schema.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory store, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Name → id map of ingredients already in the store, used to seed the
    /// normalizer so re-runs reuse existing surrogate ids.
    pub fn existing_ingredients(&self) -> Result<BTreeMap<String, i64>> {
        let mut statement = self
            .conn
            .prepare("SELECT name, id FROM active_ingredients")?;
        let rows = statement.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut map = BTreeMap::new();
        for row in rows {
            let (name, id): (String, i64) = row?;
            map.insert(name, id);
        }
        Ok(map)
    }

    /// Writes all four entity collections with insert-if-absent semantics,
    /// atomically: any failure rolls the whole run back.
    ///
    /// Insert order follows the foreign-key graph — companies and
    /// ingredients before products, products before links.
    pub fn apply(&mut self, tables: &NormalizedTables) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO companies (cnpj, name) VALUES (?1, ?2)",
            )?;
            for company in &tables.companies {
                insert.execute(params![company.cnpj, company.name])?;
            }

            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO active_ingredients (id, name) VALUES (?1, ?2)",
            )?;
            for ingredient in &tables.ingredients {
                insert.execute(params![ingredient.id, ingredient.name])?;
            }

            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO products
                 (registration, name, company_cnpj, dose, form)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for product in &tables.products {
                insert.execute(params![
                    product.registration,
                    product.name,
                    product.company_cnpj,
                    product.dose,
                    product.form,
                ])?;
            }

            let mut insert = tx.prepare(
                "INSERT OR IGNORE INTO product_ingredients
                 (registration, ingredient_id) VALUES (?1, ?2)",
            )?;
            for link in &tables.links {
                insert.execute(params![link.registration, link.ingredient_id])?;
            }
        }
        tx.commit()?;

        debug!(
            companies = tables.companies.len(),
            ingredients = tables.ingredients.len(),
            products = tables.products.len(),
            links = tables.links.len(),
            "entity collections applied"
        );
        Ok(())
    }

    /// Current row counts across the four entity tables.
    pub fn table_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            companies: self.count("companies")?,
            ingredients: self.count("active_ingredients")?,
            products: self.count("products")?,
            links: self.count("product_ingredients")?,
        })
    }

    fn count(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Looks up a product's (name, dose, form, company) by registration.
    /// This is the predicate query the read-only lookup service builds on.
    pub fn find_product(
        &self,
        registration: &str,
    ) -> Result<Option<(String, Option<String>, Option<String>, Option<String>)>> {
        let mut statement = self.conn.prepare(
            "SELECT name, dose, form, company_cnpj FROM products WHERE registration = ?1",
        )?;
        let mut rows = statement.query(params![registration])?;
        match rows.next()? {
            Some(row) => Ok(Some((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medbase_model::{ActiveIngredient, Company, Product, ProductIngredientLink};

    fn sample_tables() -> NormalizedTables {
        NormalizedTables {
            companies: vec![Company {
                cnpj: "12345678000190".to_string(),
                name: "ACME LTDA".to_string(),
            }],
            ingredients: vec![ActiveIngredient {
                id: 1,
                name: "PARACETAMOL".to_string(),
            }],
            products: vec![Product {
                registration: "1234567890".to_string(),
                name: "Paracetamol 500mg".to_string(),
                company_cnpj: Some("12345678000190".to_string()),
                dose: Some("500MG".to_string()),
                form: Some("COMPRIMIDO".to_string()),
            }],
            links: vec![ProductIngredientLink {
                registration: "1234567890".to_string(),
                ingredient_id: 1,
            }],
        }
    }

    #[test]
    fn apply_populates_all_tables() {
        let mut store = Store::open_in_memory().unwrap();
        store.apply(&sample_tables()).unwrap();
        let counts = store.table_counts().unwrap();
        assert_eq!(
            counts,
            TableCounts {
                companies: 1,
                ingredients: 1,
                products: 1,
                links: 1,
            }
        );
    }

    #[test]
    fn apply_twice_does_not_grow_tables() {
        let mut store = Store::open_in_memory().unwrap();
        let tables = sample_tables();
        store.apply(&tables).unwrap();
        let first = store.table_counts().unwrap();
        store.apply(&tables).unwrap();
        assert_eq!(store.table_counts().unwrap(), first);
    }

    #[test]
    fn existing_ingredients_round_trip() {
        let mut store = Store::open_in_memory().unwrap();
        store.apply(&sample_tables()).unwrap();
        let existing = store.existing_ingredients().unwrap();
        assert_eq!(existing.get("PARACETAMOL"), Some(&1));
    }

    #[test]
    fn foreign_keys_reject_orphan_links() {
        let mut store = Store::open_in_memory().unwrap();
        let mut tables = sample_tables();
        tables.links.push(ProductIngredientLink {
            registration: "1234567890".to_string(),
            ingredient_id: 99,
        });
        let result = store.apply(&tables);
        assert!(matches!(result, Err(StoreError::Sqlite(_))));
        // The whole run rolled back; nothing was committed.
        assert_eq!(store.table_counts().unwrap(), TableCounts::default());
    }

    #[test]
    fn find_product_returns_row() {
        let mut store = Store::open_in_memory().unwrap();
        store.apply(&sample_tables()).unwrap();
        let (name, dose, form, company) =
            store.find_product("1234567890").unwrap().unwrap();
        assert_eq!(name, "Paracetamol 500mg");
        assert_eq!(dose.as_deref(), Some("500MG"));
        assert_eq!(form.as_deref(), Some("COMPRIMIDO"));
        assert_eq!(company.as_deref(), Some("12345678000190"));
        assert!(store.find_product("0000000000").unwrap().is_none());
    }

    #[test]
    fn insert_if_absent_keeps_first_company_name() {
        let mut store = Store::open_in_memory().unwrap();
        store.apply(&sample_tables()).unwrap();
        let mut renamed = sample_tables();
        renamed.companies[0].name = "ACME RENAMED".to_string();
        store.apply(&renamed).unwrap();
        // INSERT OR IGNORE never updates in place.
        let name: String = store
            .conn
            .query_row(
                "SELECT name FROM companies WHERE cnpj = ?1",
                params!["12345678000190"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(name, "ACME LTDA");
    }
}

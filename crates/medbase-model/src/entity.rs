#![deny(unsafe_code)]

//! Normalized entity rows, matching the relational store schema one-to-one.

/// A registration-holder company, keyed by its CNPJ-like company code.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Company {
    pub cnpj: String,
    pub name: String,
}

/// An active ingredient with a surrogate numeric id; names are unique.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ActiveIngredient {
    pub id: i64,
    pub name: String,
}

/// A product row, keyed by canonical registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Product {
    pub registration: String,
    pub name: String,
    /// FK into companies; None when the holder text lacked the separator.
    pub company_cnpj: Option<String>,
    pub dose: Option<String>,
    pub form: Option<String>,
}

/// Many-to-many link between a product and an active ingredient.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ProductIngredientLink {
    pub registration: String,
    pub ingredient_id: i64,
}

/// The four entity collections produced by schema normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NormalizedTables {
    pub companies: Vec<Company>,
    pub ingredients: Vec<ActiveIngredient>,
    pub products: Vec<Product>,
    pub links: Vec<ProductIngredientLink>,
}

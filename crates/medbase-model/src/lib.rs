pub mod entity;
pub mod record;

pub use entity::{ActiveIngredient, Company, NormalizedTables, Product, ProductIngredientLink};
pub use record::{MergedProductRecord, RawPricingRecord, RawRegistryRecord};

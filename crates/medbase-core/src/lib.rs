#![deny(unsafe_code)]

pub mod key;
pub mod merge;
pub mod normalize;
pub mod presentation;
pub mod text;

pub use key::canonicalize_registration;
pub use merge::{MergeReport, merge};
pub use normalize::{
    IngredientCatalog, NormalizeReport, normalize, split_company, split_ingredients,
};
pub use presentation::{DOSAGE_FORMS, ParsedPresentation, is_known_form, parse_presentation};
pub use text::{ACCEPTED_STATUSES, fold_status, is_accepted_status};

#![deny(unsafe_code)]

pub mod error;
pub mod extract;
pub mod pricing;
pub mod registry;

pub use error::{IngestError, Result};
pub use extract::{Extract, ExtractOptions, SourceEncoding, read_extract};
pub use pricing::{PricingColumns, load_pricing};
pub use registry::{default_registry_options, load_registry};

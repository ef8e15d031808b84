//! CLI library components for the medbase pipeline.

pub mod logging;
pub mod pipeline;

//! Domain models for the pharmacogenomic pipeline.

mod report;
mod risk;
mod variant;

pub use report::*;
pub use risk::*;
pub use variant::*;

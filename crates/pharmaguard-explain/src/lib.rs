//! Explanation generation for pharmacogenomic risk reports.
//!
//! This crate provides the natural-language summary attached to each report,
//! either from fixed templates or from an LLM backend supplied by the caller.

pub mod explanation;
pub mod prompts;

pub use explanation::*;
pub use prompts::*;

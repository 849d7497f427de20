//! Report assembly and the end-to-end analyzer.
//!
//! Pipeline: Parse → Filter by drug genes → Risk evaluation → Report

mod analyzer;
mod assembler;

pub use analyzer::*;
pub use assembler::*;

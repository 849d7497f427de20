//! Risk inference: variants → risk label, confidence and recommendation.

mod engine;
mod recommendation;

pub use engine::*;
pub use recommendation::*;

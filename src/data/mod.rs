//! Trial/dataset container, signal extraction, and synthetic sample
//! generation.

pub mod dataset;
pub mod sample;

pub use dataset::*;
pub use sample::*;

//! One-call tuning pipeline.

pub mod pipeline;

pub use pipeline::*;

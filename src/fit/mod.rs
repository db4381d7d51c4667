//! Tuning-fit orchestration.
//!
//! Responsibilities:
//!
//! - bootstrap and scramble coefficient ensembles per unit (`resample`)
//! - per-unit point fit, extraction, and parallel fan-out (`estimator`)

pub mod estimator;
pub mod resample;

pub use estimator::*;
pub use resample::*;

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration (`TuningConfig`, `SignalSelector`, `Distribution`)
//! - per-unit fit outputs (`UnitTuning`, `SignalTuning`)
//! - column semantics tags for downstream consumers (`ColumnSemantics`)

pub mod types;

pub use types::*;

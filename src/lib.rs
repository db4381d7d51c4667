//! `pd-tuning` library crate.
//!
//! Estimates, for each recorded unit in a trial-structured dataset, a
//! preferred direction (PD) of tuning to one or more 2-D kinematic
//! covariates (e.g. velocity), along with a modulation depth, bootstrap
//! confidence intervals on both (circular-aware for the PD), and a
//! label-scrambling significance flag.
//!
//! Per unit, the estimator fits a GLM of the unit's response on the paired
//! covariate columns, derives the PD (`atan2` of the coefficient pair) and
//! modulation depth (its magnitude), bootstraps the per-unit dataset for
//! confidence intervals, and refits against response-scrambled resamples to
//! build the null distribution behind the `tuned` flag.
//!
//! ```rust
//! use pd_tuning::app::run_tuning;
//! use pd_tuning::data::{SPIKE_SIGNAL, SampleConfig, TunedUnit, generate_dataset};
//! use pd_tuning::domain::{SignalSelector, TuningConfig};
//!
//! // A synthetic unit tuned to 1.0 rad.
//! let units = [TunedUnit { pd: 1.0, depth: 0.8, baseline: 1.5 }];
//! let dataset = generate_dataset(&units, &SampleConfig::default()).unwrap();
//!
//! let config = TuningConfig {
//!     out_signals: Some(SignalSelector::new(SPIKE_SIGNAL, [0])),
//!     num_boots: 50,
//!     seed: Some(7),
//!     verbose: false,
//!     ..TuningConfig::default()
//! };
//!
//! let output = run_tuning(&dataset, &config).unwrap();
//! assert_eq!(output.table.num_rows(), 1);
//! assert!(output.table.column("vel_PD").is_some());
//! ```

pub mod app;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod report;

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON alongside result tables
//! - reloaded later for downstream inspection

use serde::{Deserialize, Serialize};

/// Error distribution family assumed by the GLM fit.
///
/// The family only determines the link used during fitting; direction and
/// modulation-depth extraction downstream is family-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Poisson errors with the canonical log link (default; appropriate for
    /// spike counts).
    Poisson,
    /// Gaussian errors with the identity link (appropriate for rates or
    /// continuous responses).
    Normal,
}

impl Distribution {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Distribution::Poisson => "Poisson",
            Distribution::Normal => "Normal",
        }
    }
}

/// A (signal name, column indices) descriptor identifying which columns of a
/// named trial signal to pull.
///
/// Output selectors may list any number of columns (one per unit). Input
/// selectors must resolve to exactly two columns (the x/y components of a
/// 2-D covariate); this is enforced during run preparation, before any
/// fitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSelector {
    pub name: String,
    pub columns: Vec<usize>,
}

impl SignalSelector {
    pub fn new(name: impl Into<String>, columns: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().collect(),
        }
    }
}

/// Semantic tag carried by each result column.
///
/// Downstream consumers need to know whether a column wraps at ±π
/// (`Circular`), is an ordinary scalar (`Linear`), or is a flag (`Logical`)
/// before averaging or thresholding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSemantics {
    Circular,
    Linear,
    Logical,
}

/// A full run's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Selector for the response signal; one selected column per unit.
    /// Required; a run without it fails preparation.
    pub out_signals: Option<SignalSelector>,

    /// Optional labels for the selected units, in column order. Units beyond
    /// the provided labels fall back to `unit{i}`.
    pub out_signal_names: Vec<String>,

    /// Trial subset to fit on. `None` means all trials, in dataset order.
    pub trial_idx: Option<Vec<usize>>,

    /// Input covariate selectors, two columns each.
    pub in_signals: Vec<SignalSelector>,

    /// GLM error distribution family.
    pub distribution: Distribution,

    /// Whether to bootstrap confidence intervals and run the scramble
    /// significance test. Force-disabled when `num_boots < 2` (a silent mode
    /// downgrade, not an error).
    pub boot_for_tuning: bool,

    /// Number of bootstrap (and scramble) draws per unit.
    pub num_boots: usize,

    /// Optional prefix for result column names. A trailing `_` separator is
    /// appended if missing.
    pub prefix: String,

    /// Progress reporting to stderr. Observability only; no effect on
    /// results.
    pub verbose: bool,

    /// Resampling seed. `Some` makes the run reproducible; `None` seeds from
    /// entropy.
    pub seed: Option<u64>,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            out_signals: None,
            out_signal_names: Vec::new(),
            trial_idx: None,
            in_signals: vec![SignalSelector::new("vel", [0, 1])],
            distribution: Distribution::Poisson,
            boot_for_tuning: true,
            num_boots: 1000,
            prefix: String::new(),
            verbose: true,
            seed: None,
        }
    }
}

/// Tuning estimate for one unit against one input signal.
///
/// The CI/significance fields are `None` in point-estimate-only mode (when
/// bootstrapping is disabled or downgraded); the result-table schema omits
/// their columns in that mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTuning {
    /// Preferred direction, radians in (−π, π].
    pub pd: f64,
    /// Wrap-corrected bootstrap confidence interval on the PD.
    pub pd_ci: Option<[f64; 2]>,
    /// Modulation depth (non-negative).
    pub moddepth: f64,
    /// Bootstrap confidence interval on the modulation depth.
    pub moddepth_ci: Option<[f64; 2]>,
    /// Whether the unit's tuning exceeds the scramble-null threshold.
    pub tuned: Option<bool>,
    /// Raw bootstrap direction samples, kept for downstream inspection.
    pub boot_pds: Option<Vec<f64>>,
}

/// All per-signal estimates for one unit; one result-table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTuning {
    pub unit: String,
    pub signals: Vec<SignalTuning>,
}

//! In-memory trial container and the signal-extraction accessor.
//!
//! A `Dataset` is an ordered sequence of trials; each trial holds named
//! signals sampled at a common rate, each a samples × channels matrix.
//! `get_vars` pulls selected columns out of selected trials into one
//! row-aligned matrix: trials are stacked vertically in subset order,
//! selectors are laid out left to right. Two `get_vars` calls with the same
//! trial subset are therefore row-aligned with each other, which is what
//! lets the response and covariate matrices be extracted independently.

use std::collections::HashMap;

use nalgebra::DMatrix;

use crate::domain::SignalSelector;
use crate::error::TuningError;

/// One trial: named signals, each samples × channels, sharing a sample
/// count.
#[derive(Debug, Clone, Default)]
pub struct Trial {
    signals: HashMap<String, DMatrix<f64>>,
}

impl Trial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, name: impl Into<String>, data: DMatrix<f64>) -> Self {
        self.signals.insert(name.into(), data);
        self
    }

    pub fn insert_signal(&mut self, name: impl Into<String>, data: DMatrix<f64>) {
        self.signals.insert(name.into(), data);
    }

    pub fn signal(&self, name: &str) -> Option<&DMatrix<f64>> {
        self.signals.get(name)
    }
}

/// An ordered sequence of trials. Read-only during a tuning run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    trials: Vec<Trial>,
}

impl Dataset {
    pub fn new(trials: Vec<Trial>) -> Self {
        Self { trials }
    }

    pub fn push_trial(&mut self, trial: Trial) {
        self.trials.push(trial);
    }

    pub fn num_trials(&self) -> usize {
        self.trials.len()
    }

    pub fn trial(&self, idx: usize) -> Option<&Trial> {
        self.trials.get(idx)
    }
}

/// Extract the selected signal columns over a trial subset into one matrix.
///
/// Output shape: (total samples over the subset) × (total selected columns).
/// Fails with a configuration error if a trial index is out of range, a
/// signal name does not resolve, a column index exceeds the signal's channel
/// count, or signals within a trial disagree on sample count.
pub fn get_vars(
    dataset: &Dataset,
    trial_idx: &[usize],
    selectors: &[SignalSelector],
) -> Result<DMatrix<f64>, TuningError> {
    let total_cols: usize = selectors.iter().map(|s| s.columns.len()).sum();
    if total_cols == 0 {
        return Err(TuningError::config("No signal columns selected."));
    }

    // First pass: resolve every (trial, selector) pair and count rows, so
    // errors surface before any allocation-and-copy work.
    let mut total_rows = 0usize;
    for &t in trial_idx {
        let trial = dataset
            .trial(t)
            .ok_or_else(|| TuningError::config(format!("Trial index {t} is out of range.")))?;
        let mut trial_rows: Option<usize> = None;
        for sel in selectors {
            let signal = trial.signal(&sel.name).ok_or_else(|| {
                TuningError::config(format!("Signal '{}' not found in trial {t}.", sel.name))
            })?;
            if let Some(&c) = sel.columns.iter().find(|&&c| c >= signal.ncols()) {
                return Err(TuningError::config(format!(
                    "Signal '{}' has {} columns; column {c} requested.",
                    sel.name,
                    signal.ncols()
                )));
            }
            match trial_rows {
                None => trial_rows = Some(signal.nrows()),
                Some(rows) if rows != signal.nrows() => {
                    return Err(TuningError::config(format!(
                        "Signals disagree on sample count in trial {t} ({} vs {} rows).",
                        rows,
                        signal.nrows()
                    )));
                }
                Some(_) => {}
            }
        }
        total_rows += trial_rows.unwrap_or(0);
    }

    let mut out = DMatrix::<f64>::zeros(total_rows, total_cols);
    let mut row_offset = 0usize;
    for &t in trial_idx {
        let Some(trial) = dataset.trial(t) else {
            // Resolved above; unreachable for a well-formed subset.
            continue;
        };
        let mut col_offset = 0usize;
        let mut trial_rows = 0usize;
        for sel in selectors {
            let Some(signal) = trial.signal(&sel.name) else {
                continue;
            };
            trial_rows = signal.nrows();
            for (j, &c) in sel.columns.iter().enumerate() {
                for i in 0..signal.nrows() {
                    out[(row_offset + i, col_offset + j)] = signal[(i, c)];
                }
            }
            col_offset += sel.columns.len();
        }
        row_offset += trial_rows;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_trial_dataset() -> Dataset {
        let t0 = Trial::new()
            .with_signal("vel", DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]))
            .with_signal("spikes", DMatrix::from_row_slice(2, 1, &[5.0, 6.0]));
        let t1 = Trial::new()
            .with_signal("vel", DMatrix::from_row_slice(1, 2, &[7.0, 8.0]))
            .with_signal("spikes", DMatrix::from_row_slice(1, 1, &[9.0]));
        Dataset::new(vec![t0, t1])
    }

    #[test]
    fn get_vars_stacks_trials_and_selectors() {
        let ds = two_trial_dataset();
        let sel = [
            SignalSelector::new("spikes", [0]),
            SignalSelector::new("vel", [0, 1]),
        ];
        let m = get_vars(&ds, &[0, 1], &sel).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (3, 3));
        // Row 2 comes from trial 1: spikes=9, vel=(7, 8).
        assert_eq!(m[(2, 0)], 9.0);
        assert_eq!(m[(2, 1)], 7.0);
        assert_eq!(m[(2, 2)], 8.0);
    }

    #[test]
    fn get_vars_respects_trial_subset_order() {
        let ds = two_trial_dataset();
        let sel = [SignalSelector::new("spikes", [0])];
        let m = get_vars(&ds, &[1, 0], &sel).unwrap();
        assert_eq!(m[(0, 0)], 9.0);
        assert_eq!(m[(1, 0)], 5.0);
    }

    #[test]
    fn get_vars_rejects_unknown_signal() {
        let ds = two_trial_dataset();
        let err = get_vars(&ds, &[0], &[SignalSelector::new("emg", [0])]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn get_vars_rejects_out_of_range_column() {
        let ds = two_trial_dataset();
        let err = get_vars(&ds, &[0], &[SignalSelector::new("vel", [0, 5])]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn incremental_construction_matches_builder() {
        let mut trial = Trial::new();
        trial.insert_signal("vel", DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]));
        let mut ds = Dataset::default();
        ds.push_trial(trial);

        assert_eq!(ds.num_trials(), 1);
        let m = get_vars(&ds, &[0], &[SignalSelector::new("vel", [0, 1])]).unwrap();
        assert_eq!(m[(1, 1)], 4.0);
    }

    #[test]
    fn get_vars_rejects_bad_trial_index() {
        let ds = two_trial_dataset();
        let err = get_vars(&ds, &[3], &[SignalSelector::new("vel", [0, 1])]).unwrap_err();
        assert!(err.is_configuration());
    }
}

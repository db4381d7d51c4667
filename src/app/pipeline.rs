//! The full tuning pipeline.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate config -> extract R and X -> per-unit estimation -> result table
//!
//! Callers that need finer control (custom extraction, partial runs) can use
//! the `data`, `fit`, and `report` modules directly.

use crate::data::{Dataset, get_vars};
use crate::domain::{SignalSelector, TuningConfig, UnitTuning};
use crate::error::TuningError;
use crate::fit::estimate_units;
use crate::report::{ResultTable, build_table, format_run_summary, normalize_prefix};

/// All computed outputs of a tuning run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// The result table: one row per unit, columns grouped per input signal.
    pub table: ResultTable,
    /// The per-unit estimates the table was assembled from.
    pub rows: Vec<UnitTuning>,
    /// Whether the run actually bootstrapped (false after the silent
    /// downgrade for `num_boots < 2`).
    pub boot_enabled: bool,
}

/// Validated, normalized run parameters.
struct PreparedRun {
    out: SignalSelector,
    trial_idx: Vec<usize>,
    prefix: String,
    boot_enabled: bool,
}

fn prepare(dataset: &Dataset, config: &TuningConfig) -> Result<PreparedRun, TuningError> {
    let out = config
        .out_signals
        .clone()
        .ok_or_else(|| TuningError::config("No output signal specified."))?;
    if out.columns.is_empty() {
        return Err(TuningError::config("Output selector selects no unit columns."));
    }

    if config.in_signals.is_empty() {
        return Err(TuningError::config("At least one input signal is required."));
    }
    for sel in &config.in_signals {
        if sel.columns.len() != 2 {
            return Err(TuningError::config(format!(
                "Input signal '{}' must resolve to exactly two columns (got {}).",
                sel.name,
                sel.columns.len()
            )));
        }
    }

    let trial_idx = match &config.trial_idx {
        Some(idx) => idx.clone(),
        None => (0..dataset.num_trials()).collect(),
    };
    if trial_idx.is_empty() {
        return Err(TuningError::config("Trial subset is empty."));
    }

    // Fewer than 2 draws cannot form a distribution; the run silently
    // downgrades to point estimates instead of erroring.
    let boot_enabled = config.boot_for_tuning && config.num_boots >= 2;

    Ok(PreparedRun {
        out,
        trial_idx,
        prefix: normalize_prefix(&config.prefix),
        boot_enabled,
    })
}

/// Run the full estimation pipeline and return the computed outputs.
pub fn run_tuning(dataset: &Dataset, config: &TuningConfig) -> Result<RunOutput, TuningError> {
    // 1) Validate and normalize the configuration (before any fitting).
    let prep = prepare(dataset, config)?;

    // 2) Extract the response and covariate matrices over the trial subset.
    //    Both calls use the same subset, so the rows are aligned.
    let r = get_vars(dataset, &prep.trial_idx, std::slice::from_ref(&prep.out))?;
    let x = get_vars(dataset, &prep.trial_idx, &config.in_signals)?;
    if r.nrows() != x.nrows() {
        return Err(TuningError::config(format!(
            "Response and covariate signals disagree on sample count ({} vs {} rows).",
            r.nrows(),
            x.nrows()
        )));
    }

    let unit_names: Vec<String> = (0..r.ncols())
        .map(|i| {
            config
                .out_signal_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("unit{}", i + 1))
        })
        .collect();

    if config.verbose {
        eprintln!(
            "[pd-tuning] fitting {} units on {} samples ({} family, {})",
            r.ncols(),
            r.nrows(),
            config.distribution.display_name(),
            if prep.boot_enabled {
                format!("{} bootstraps", config.num_boots)
            } else {
                "point estimates only".to_string()
            }
        );
    }

    // 3) Per-unit estimation (parallel across units).
    let rows = estimate_units(&r, &x, &unit_names, config, prep.boot_enabled)?;

    // 4) Assemble the result table.
    let table = build_table(&rows, &config.in_signals, &prep.prefix, prep.boot_enabled);

    if config.verbose {
        eprint!(
            "{}",
            format_run_summary(
                &rows,
                &config.in_signals,
                config.distribution,
                config.num_boots,
                prep.boot_enabled
            )
        );
    }

    Ok(RunOutput {
        table,
        rows,
        boot_enabled: prep.boot_enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SPIKE_SIGNAL, SampleConfig, TunedUnit, VEL_SIGNAL, generate_dataset};
    use crate::domain::Distribution;
    use std::f64::consts::PI;

    fn three_unit_dataset(distribution: Distribution) -> Dataset {
        let units = [
            TunedUnit { pd: PI / 3.0, depth: 0.9, baseline: 1.5 },
            TunedUnit { pd: -2.5, depth: 0.7, baseline: 1.0 },
            TunedUnit { pd: 0.0, depth: 0.0, baseline: 1.2 },
        ];
        let config = SampleConfig {
            num_trials: 5,
            samples_per_trial: 100,
            distribution,
            ..SampleConfig::default()
        };
        generate_dataset(&units, &config).unwrap()
    }

    fn base_config(num_boots: usize) -> TuningConfig {
        TuningConfig {
            out_signals: Some(SignalSelector::new(SPIKE_SIGNAL, [0, 1, 2])),
            num_boots,
            seed: Some(1234),
            verbose: false,
            ..TuningConfig::default()
        }
    }

    #[test]
    fn bootstrap_run_has_expected_schema_and_pd_range() {
        // 3 units, 500 samples, Poisson family, 200 bootstrap draws.
        let dataset = three_unit_dataset(Distribution::Poisson);
        let output = run_tuning(&dataset, &base_config(200)).unwrap();

        assert!(output.boot_enabled);
        assert_eq!(output.table.num_rows(), 3);
        assert_eq!(
            output.table.column_names(),
            vec![
                "vel_PD",
                "vel_PDCI",
                "vel_Moddepth",
                "vel_ModdepthCI",
                "vel_Tuned",
                "vel_bootstraps"
            ]
        );

        let Some(col) = output.table.column("vel_PD") else {
            panic!("missing PD column")
        };
        let crate::report::ColumnValues::Scalars(pds) = &col.values else {
            panic!("PD column should hold scalars")
        };
        assert!(pds.iter().all(|pd| *pd > -PI && *pd <= PI));
    }

    #[test]
    fn recovers_known_directions_and_flags_untuned_unit() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let output = run_tuning(&dataset, &base_config(150)).unwrap();

        let tuned0 = &output.rows[0].signals[0];
        let tuned1 = &output.rows[1].signals[0];
        let flat = &output.rows[2].signals[0];

        assert!(crate::math::wrap_angle(tuned0.pd - PI / 3.0).abs() < 0.25, "pd0: {}", tuned0.pd);
        assert!(crate::math::wrap_angle(tuned1.pd + 2.5).abs() < 0.25, "pd1: {}", tuned1.pd);
        assert_eq!(tuned0.tuned, Some(true));
        assert_eq!(tuned1.tuned, Some(true));
        // The zero-depth unit has no real velocity relationship; amplifying
        // its siblings' depth is what separates them from the scramble null.
        assert_eq!(flat.tuned, Some(false));
    }

    #[test]
    fn moddepth_is_nonnegative_for_both_families() {
        for family in [Distribution::Poisson, Distribution::Normal] {
            let dataset = three_unit_dataset(family);
            let mut config = base_config(60);
            config.distribution = family;
            let output = run_tuning(&dataset, &config).unwrap();
            for row in &output.rows {
                assert!(row.signals[0].moddepth >= 0.0);
                let [lo, hi] = row.signals[0].moddepth_ci.unwrap();
                assert!(lo >= 0.0 && hi >= lo);
            }
        }
    }

    #[test]
    fn tuned_flag_flips_as_true_modulation_grows() {
        // Same sampling seed, same resampling seed; only the true coefficient
        // magnitude grows. Near-zero modulation stays below the scramble-null
        // threshold, strong modulation clears it.
        for (depth, expect) in [(0.02, false), (0.9, true)] {
            let units = [TunedUnit { pd: 1.0, depth, baseline: 1.5 }];
            let sample = SampleConfig {
                num_trials: 5,
                samples_per_trial: 100,
                ..SampleConfig::default()
            };
            let dataset = generate_dataset(&units, &sample).unwrap();
            let mut config = base_config(120);
            config.out_signals = Some(SignalSelector::new(SPIKE_SIGNAL, [0]));
            let output = run_tuning(&dataset, &config).unwrap();
            assert_eq!(output.rows[0].signals[0].tuned, Some(expect), "depth {depth}");
        }
    }

    #[test]
    fn single_boot_silently_downgrades_to_point_estimates() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let output = run_tuning(&dataset, &base_config(1)).unwrap();

        assert!(!output.boot_enabled);
        assert_eq!(output.table.column_names(), vec!["vel_PD", "vel_Moddepth"]);
    }

    #[test]
    fn missing_output_selector_is_a_configuration_error() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let mut config = base_config(50);
        config.out_signals = None;
        let err = run_tuning(&dataset, &config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn wrong_width_input_selector_is_a_configuration_error() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let mut config = base_config(50);
        config.in_signals = vec![
            SignalSelector::new(VEL_SIGNAL, [0, 1, 1]),
            SignalSelector::new(VEL_SIGNAL, [0]),
        ];
        let err = run_tuning(&dataset, &config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn fixed_seed_runs_are_idempotent() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let config = base_config(40);
        let first = run_tuning(&dataset, &config).unwrap();
        let second = run_tuning(&dataset, &config).unwrap();
        assert_eq!(first.table, second.table);
    }

    #[test]
    fn prefix_is_normalized_into_column_names() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let mut config = base_config(1);
        config.boot_for_tuning = false;
        config.prefix = "m1".to_string();
        let output = run_tuning(&dataset, &config).unwrap();
        assert_eq!(output.table.column_names(), vec!["m1_vel_PD", "m1_vel_Moddepth"]);
    }

    #[test]
    fn trial_subset_restricts_the_fit() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let mut config = base_config(1);
        config.boot_for_tuning = false;
        config.trial_idx = Some(vec![0, 2]);
        // Restricting trials still yields a full-schema point-estimate table.
        let output = run_tuning(&dataset, &config).unwrap();
        assert_eq!(output.table.num_rows(), 3);
    }

    #[test]
    fn out_signal_names_label_rows() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let mut config = base_config(1);
        config.boot_for_tuning = false;
        config.out_signal_names = vec!["m1a".to_string(), "m1b".to_string()];
        let output = run_tuning(&dataset, &config).unwrap();
        assert_eq!(output.table.units, vec!["m1a", "m1b", "unit3"]);
    }

    #[test]
    fn two_input_signals_group_columns_per_signal() {
        let dataset = three_unit_dataset(Distribution::Poisson);
        let mut config = base_config(30);
        // Reuse the velocity block twice; column grouping is what's under
        // test, not the physics.
        config.in_signals = vec![
            SignalSelector::new(VEL_SIGNAL, [0, 1]),
            SignalSelector::new(VEL_SIGNAL, [1, 0]),
        ];
        config.prefix = "m_".to_string();
        let output = run_tuning(&dataset, &config).unwrap();

        let names = output.table.column_names();
        assert_eq!(names.len(), 12);
        assert!(names.iter().filter(|n| n.starts_with("m_vel_")).count() == 12);
        for row in &output.rows {
            assert_eq!(row.signals.len(), 2);
        }
    }
}

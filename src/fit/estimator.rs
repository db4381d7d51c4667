//! Per-unit tuning estimation.
//!
//! For each unit: point-fit the GLM, optionally build bootstrap and scramble
//! ensembles, then extract a preferred direction and modulation depth per
//! input-signal coefficient pair. Units are independent given the read-only
//! response/covariate matrices, so the per-unit work fans out across rayon
//! workers; results are collected in unit order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::domain::{SignalTuning, TuningConfig, UnitTuning};
use crate::error::TuningError;
use crate::fit::resample::{bootstrap_ensemble, scramble_ensemble};
use crate::math::{circular_interval, circular_mean, fit_glm, percentile};

/// Estimate tuning for every unit (column of `r`) against every input-signal
/// coefficient pair (column block of `x`).
///
/// `r` and `x` must be row-aligned; `x` has one 2-column block per input
/// signal. `boot_enabled` reflects the prepared run mode (already downgraded
/// if the configured draw count was too small).
pub fn estimate_units(
    r: &DMatrix<f64>,
    x: &DMatrix<f64>,
    unit_names: &[String],
    config: &TuningConfig,
    boot_enabled: bool,
) -> Result<Vec<UnitTuning>, TuningError> {
    let num_units = r.ncols();
    let num_signals = x.ncols() / 2;
    let started = Instant::now();

    (0..num_units)
        .into_par_iter()
        .map(|u| {
            let row = estimate_unit(r, x, u, unit_names, config, boot_enabled, num_signals)?;
            if config.verbose {
                eprintln!(
                    "[pd-tuning] unit {}/{} done ({:.2}s elapsed)",
                    u + 1,
                    num_units,
                    started.elapsed().as_secs_f64()
                );
            }
            Ok(row)
        })
        .collect()
}

fn estimate_unit(
    r: &DMatrix<f64>,
    x: &DMatrix<f64>,
    unit: usize,
    unit_names: &[String],
    config: &TuningConfig,
    boot_enabled: bool,
    num_signals: usize,
) -> Result<UnitTuning, TuningError> {
    let y = r.column(unit).into_owned();

    let beta = fit_glm(x, &y, config.distribution)?;
    let expected = 1 + 2 * num_signals;
    if beta.len() != expected {
        // Coefficient schema mismatch means the solver and covariate layout
        // disagree; emitting rows from it would be silently wrong.
        return Err(TuningError::fit(format!(
            "Unit {}: GLM returned {} coefficients, expected {expected}.",
            unit + 1,
            beta.len()
        )));
    }

    let ensembles = if boot_enabled {
        let mut rng = unit_rng(config.seed, unit);
        let boot = bootstrap_ensemble(&y, x, config.distribution, config.num_boots, &mut rng)?;
        let scramble = scramble_ensemble(&y, x, config.distribution, config.num_boots, &mut rng)?;
        Some((boot, scramble))
    } else {
        None
    };

    let signals = (0..num_signals)
        .map(|s| extract_signal(&beta, ensembles.as_ref(), s))
        .collect();

    Ok(UnitTuning {
        unit: unit_names
            .get(unit)
            .cloned()
            .unwrap_or_else(|| format!("unit{}", unit + 1)),
        signals,
    })
}

/// Direction and modulation for one coefficient pair, over the point fit and
/// (when present) the ensembles.
fn extract_signal(
    beta: &DVector<f64>,
    ensembles: Option<&(DMatrix<f64>, DMatrix<f64>)>,
    signal: usize,
) -> SignalTuning {
    let cx = 1 + 2 * signal;
    let cy = 2 + 2 * signal;
    let point_pd = beta[cy].atan2(beta[cx]);
    let point_depth = beta[cx].hypot(beta[cy]);

    let Some((boot, scramble)) = ensembles else {
        return SignalTuning {
            pd: point_pd,
            pd_ci: None,
            moddepth: point_depth,
            moddepth_ci: None,
            tuned: None,
            boot_pds: None,
        };
    };

    let angles: Vec<f64> = (0..boot.nrows())
        .map(|b| boot[(b, cy)].atan2(boot[(b, cx)]))
        .collect();
    let depths: Vec<f64> = (0..boot.nrows())
        .map(|b| boot[(b, cx)].hypot(boot[(b, cy)]))
        .collect();
    let null_depths: Vec<f64> = (0..scramble.nrows())
        .map(|b| scramble[(b, cx)].hypot(scramble[(b, cy)]))
        .collect();

    let mean_depth = depths.iter().sum::<f64>() / depths.len().max(1) as f64;
    let moddepth_ci = percentile(&depths, 2.5)
        .zip(percentile(&depths, 97.5))
        .map(|(lo, hi)| [lo, hi]);
    // A unit is tuned when its bootstrap modulation exceeds the 95th
    // percentile of the no-association null.
    let tuned = percentile(&null_depths, 95.0).map(|threshold| mean_depth > threshold);

    SignalTuning {
        pd: circular_mean(&angles).unwrap_or(point_pd),
        pd_ci: circular_interval(&angles, 2.5, 97.5),
        moddepth: mean_depth,
        moddepth_ci,
        tuned,
        boot_pds: Some(angles),
    }
}

/// Per-unit RNG, derived from the run seed and the unit index so that
/// parallel scheduling order cannot change any unit's draws.
fn unit_rng(seed: Option<u64>, unit: usize) -> StdRng {
    match seed {
        Some(seed) => {
            let mut hasher = DefaultHasher::new();
            seed.hash(&mut hasher);
            unit.hash(&mut hasher);
            StdRng::seed_from_u64(hasher.finish())
        }
        None => StdRng::from_entropy(),
    }
}

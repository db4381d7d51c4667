//! Synthetic cosine-tuned sample generation.
//!
//! Generates a dataset of directionally tuned units driven by random 2-D
//! velocity covariates, with a known preferred direction and modulation
//! depth per unit. Used by tests and demos so the estimator can be exercised
//! without real recordings.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Normal, Poisson};

use crate::data::{Dataset, Trial};
use crate::domain::Distribution;
use crate::error::TuningError;

/// Name of the generated 2-column velocity signal.
pub const VEL_SIGNAL: &str = "vel";
/// Name of the generated response signal (one column per unit).
pub const SPIKE_SIGNAL: &str = "spikes";

/// Linear predictor clamp before exponentiation (Poisson family), to keep
/// generated rates finite for extreme depth settings.
const MAX_LOG_RATE: f64 = 20.0;

/// Ground truth for one generated unit.
///
/// `baseline` and `depth` live on the linear-predictor scale: log-rate for
/// the Poisson family, response units for the Normal family.
#[derive(Debug, Clone, Copy)]
pub struct TunedUnit {
    /// Preferred direction, radians.
    pub pd: f64,
    /// Modulation depth (0 = untuned).
    pub depth: f64,
    /// Baseline drive at zero velocity.
    pub baseline: f64,
}

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub num_trials: usize,
    pub samples_per_trial: usize,
    pub distribution: Distribution,
    /// Gaussian noise standard deviation (Normal family only).
    pub noise_sd: f64,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            num_trials: 10,
            samples_per_trial: 100,
            distribution: Distribution::Poisson,
            noise_sd: 0.5,
            seed: 0,
        }
    }
}

/// Generate a seeded dataset of cosine-tuned units.
///
/// Each trial carries a `vel` signal (samples × 2, standard-normal
/// components) and a `spikes` signal (samples × units). Per sample, unit
/// drive is `baseline + depth * (vx cos(pd) + vy sin(pd))`; the Poisson
/// family draws counts from `exp(drive)`, the Normal family adds Gaussian
/// noise to the drive.
pub fn generate_dataset(
    units: &[TunedUnit],
    config: &SampleConfig,
) -> Result<Dataset, TuningError> {
    if units.is_empty() {
        return Err(TuningError::config("At least one unit spec is required."));
    }
    if config.num_trials == 0 || config.samples_per_trial == 0 {
        return Err(TuningError::config("Trial and sample counts must be > 0."));
    }
    if units
        .iter()
        .any(|u| !(u.pd.is_finite() && u.depth.is_finite() && u.baseline.is_finite()))
    {
        return Err(TuningError::config("Unit specs must be finite."));
    }
    if !(config.noise_sd.is_finite() && config.noise_sd > 0.0) {
        return Err(TuningError::config("Noise standard deviation must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| TuningError::config(format!("Velocity distribution error: {e}")))?;
    let noise = Normal::new(0.0, config.noise_sd)
        .map_err(|e| TuningError::config(format!("Noise distribution error: {e}")))?;

    let n = config.samples_per_trial;
    let mut trials = Vec::with_capacity(config.num_trials);
    for _ in 0..config.num_trials {
        let mut vel = DMatrix::<f64>::zeros(n, 2);
        let mut spikes = DMatrix::<f64>::zeros(n, units.len());
        for i in 0..n {
            let vx = rng.sample(standard);
            let vy = rng.sample(standard);
            vel[(i, 0)] = vx;
            vel[(i, 1)] = vy;

            for (u, spec) in units.iter().enumerate() {
                let drive = spec.baseline + spec.depth * (vx * spec.pd.cos() + vy * spec.pd.sin());
                spikes[(i, u)] = match config.distribution {
                    Distribution::Poisson => {
                        let rate = drive.clamp(-MAX_LOG_RATE, MAX_LOG_RATE).exp().max(1e-12);
                        let poisson = Poisson::new(rate).map_err(|e| {
                            TuningError::config(format!("Count distribution error: {e}"))
                        })?;
                        rng.sample(poisson)
                    }
                    Distribution::Normal => drive + rng.sample(noise),
                };
            }
        }
        trials.push(
            Trial::new()
                .with_signal(VEL_SIGNAL, vel)
                .with_signal(SPIKE_SIGNAL, spikes),
        );
    }

    Ok(Dataset::new(trials))
}

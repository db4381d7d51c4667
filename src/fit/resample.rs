//! Bootstrap and scramble resampling of a per-unit dataset.
//!
//! Two ensembles are built per unit, with deliberately different row
//! handling:
//!
//! - **bootstrap**: response and covariate rows are resampled jointly (the
//!   same drawn index is used across the full row), preserving the pairing.
//!   This approximates the sampling distribution of the fitted
//!   coefficients.
//! - **scramble**: only the response rows are resampled, and each refit runs
//!   against the original, unresampled covariate matrix. Breaking the
//!   pairing destroys any true response/covariate association, so the
//!   resulting coefficients form a null distribution for the significance
//!   test. The asymmetry with the bootstrap ensemble is intentional.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand::rngs::StdRng;

use crate::domain::Distribution;
use crate::error::TuningError;
use crate::math::fit_glm;

/// Draw `num_boots` joint resamples of `(y, x)` rows with replacement,
/// refitting each. Returns a boots × (1 + x.ncols()) coefficient matrix,
/// one fitted vector per row.
pub fn bootstrap_ensemble(
    y: &DVector<f64>,
    x: &DMatrix<f64>,
    family: Distribution,
    num_boots: usize,
    rng: &mut StdRng,
) -> Result<DMatrix<f64>, TuningError> {
    let n = y.len();
    let mut coefs = DMatrix::<f64>::zeros(num_boots, x.ncols() + 1);
    let mut yb = DVector::<f64>::zeros(n);
    let mut xb = DMatrix::<f64>::zeros(n, x.ncols());

    for b in 0..num_boots {
        for i in 0..n {
            let idx = rng.gen_range(0..n);
            yb[i] = y[idx];
            xb.set_row(i, &x.row(idx));
        }
        let beta = fit_glm(&xb, &yb, family)?;
        coefs.set_row(b, &beta.transpose());
    }

    Ok(coefs)
}

/// Draw `num_boots` resamples of the response rows alone, refitting each
/// against the original `x`. Same shape as `bootstrap_ensemble`.
pub fn scramble_ensemble(
    y: &DVector<f64>,
    x: &DMatrix<f64>,
    family: Distribution,
    num_boots: usize,
    rng: &mut StdRng,
) -> Result<DMatrix<f64>, TuningError> {
    let n = y.len();
    let mut coefs = DMatrix::<f64>::zeros(num_boots, x.ncols() + 1);
    let mut yb = DVector::<f64>::zeros(n);

    for b in 0..num_boots {
        for i in 0..n {
            yb[i] = y[rng.gen_range(0..n)];
        }
        let beta = fit_glm(x, &yb, family)?;
        coefs.set_row(b, &beta.transpose());
    }

    Ok(coefs)
}

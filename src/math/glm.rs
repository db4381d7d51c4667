//! GLM fit primitive.
//!
//! Fits one numeric response column on a covariate matrix under an assumed
//! error distribution, returning `[β0, β1x, β1y, β2x, β2y, …]`: an intercept
//! followed by one coefficient per covariate column, in declared order.
//!
//! - `Normal`: identity link, a single weighted least-squares solve.
//! - `Poisson`: canonical log link, fitted by iteratively reweighted least
//!   squares (IRLS). Each iteration solves a weighted regression of the
//!   working response `z = η + (y − μ)/μ` with working weights `w = μ`.
//!
//! A finite but unconverged fit is returned as-is: bootstrap draws on sparse
//! resamples occasionally stall short of the tolerance, and aborting a whole
//! ensemble for one slow draw would be worse than accepting its last
//! iterate. Only ill-conditioned or non-finite solves are errors.

use nalgebra::{DMatrix, DVector};

use crate::domain::Distribution;
use crate::error::TuningError;
use crate::math::wls::solve_weighted_least_squares;

const MAX_IRLS_ITERS: usize = 25;
const IRLS_TOL: f64 = 1e-8;
/// Floor on the fitted mean, so working weights and responses stay finite.
const MIN_MEAN: f64 = 1e-10;
/// Clamp on the linear predictor before exponentiation.
const MAX_LINK: f64 = 30.0;

/// Fit a GLM of `y` on `covariates` (intercept added internally).
///
/// Returns a coefficient vector of length `covariates.ncols() + 1`.
pub fn fit_glm(
    covariates: &DMatrix<f64>,
    y: &DVector<f64>,
    family: Distribution,
) -> Result<DVector<f64>, TuningError> {
    let n = covariates.nrows();
    if n == 0 {
        return Err(TuningError::fit("Cannot fit a GLM on zero samples."));
    }
    if y.len() != n {
        return Err(TuningError::fit(format!(
            "Response has {} samples but covariates have {n} rows.",
            y.len()
        )));
    }

    let design = design_with_intercept(covariates);
    match family {
        Distribution::Normal => solve_weighted_least_squares(&design, y, None)
            .ok_or_else(|| TuningError::fit("Least-squares solve failed (ill-conditioned design).")),
        Distribution::Poisson => fit_poisson_irls(&design, y),
    }
}

fn design_with_intercept(x: &DMatrix<f64>) -> DMatrix<f64> {
    let mut design = DMatrix::<f64>::zeros(x.nrows(), x.ncols() + 1);
    for i in 0..x.nrows() {
        design[(i, 0)] = 1.0;
        for j in 0..x.ncols() {
            design[(i, j + 1)] = x[(i, j)];
        }
    }
    design
}

fn fit_poisson_irls(design: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, TuningError> {
    let n = design.nrows();
    let p = design.ncols();

    // Start from the intercept-only fit: β0 = log(mean(y)), rest zero.
    let mut beta = DVector::<f64>::zeros(p);
    beta[0] = y.mean().max(MIN_MEAN).ln();

    let mut w = DVector::<f64>::zeros(n);
    let mut z = DVector::<f64>::zeros(n);

    for _ in 0..MAX_IRLS_ITERS {
        let eta = design * &beta;
        for i in 0..n {
            let e = eta[i].clamp(-MAX_LINK, MAX_LINK);
            let mu = e.exp().max(MIN_MEAN);
            w[i] = mu;
            z[i] = e + (y[i] - mu) / mu;
        }

        let next = solve_weighted_least_squares(design, &z, Some(&w)).ok_or_else(|| {
            TuningError::fit("IRLS solve failed (ill-conditioned weighted design).")
        })?;

        let delta = (&next - &beta).amax();
        beta = next;
        if delta < IRLS_TOL {
            break;
        }
    }

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(TuningError::fit("IRLS produced non-finite coefficients."))
    }
}

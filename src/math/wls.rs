//! Weighted least squares solver.
//!
//! The GLM fit reduces to a sequence of small weighted linear regressions:
//!
//! ```text
//! minimize Σ w_i (z_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - Rows are scaled by `sqrt(w_i)` and an ordinary least-squares problem is
//!   solved.
//! - SVD is used so tall systems (many samples, few coefficients) solve
//!   robustly. (Nalgebra's `QR::solve` is intended for square systems and
//!   will panic for non-square matrices.)
//! - The parameter dimension is tiny (1 + 2 per covariate pair), so SVD
//!   performance is acceptable even across thousands of bootstrap refits.

use nalgebra::{DMatrix, DVector};

/// Solve a (weighted) least squares problem using SVD.
///
/// `weights`, when given, must be row-aligned with `x`; non-positive weights
/// contribute nothing. Returns `None` if the system is too ill-conditioned
/// to solve robustly.
pub fn solve_weighted_least_squares(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    weights: Option<&DVector<f64>>,
) -> Option<DVector<f64>> {
    let (xw, yw) = match weights {
        Some(w) => {
            let mut xw = x.clone();
            let mut yw = y.clone();
            for i in 0..x.nrows() {
                let sw = w[i].max(0.0).sqrt();
                for j in 0..x.ncols() {
                    xw[(i, j)] *= sw;
                }
                yw[i] *= sw;
            }
            (xw, yw)
        }
        None => (x.clone(), y.clone()),
    };

    let svd = xw.svd(true, true);

    // Try progressively looser tolerances: bootstrap resamples occasionally
    // produce nearly collinear columns, and a slightly relaxed solve beats
    // discarding the draw.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(&yw, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

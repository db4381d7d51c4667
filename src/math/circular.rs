//! Circular statistics helpers.
//!
//! Direction estimates are angles, so means and percentile intervals must
//! respect wrap-around at ±π. A plain percentile of angles straddling the
//! ±π boundary reports a spuriously wide interval (half the samples near +π,
//! half near −π); `circular_interval` avoids this by centering the samples
//! on their circular mean first.

use std::cmp::Ordering;

/// Interpolated percentile of a sample set (linear between order
/// statistics). `pct` is in [0, 100]. Returns `None` for empty input or an
/// out-of-range percentile.
pub fn percentile(samples: &[f64], pct: f64) -> Option<f64> {
    if samples.is_empty() || !(0.0..=100.0).contains(&pct) {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let frac = rank - lo as f64;
        Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
    }
}

/// Wrap an angle into (−π, π].
pub fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}

/// Circular mean of a set of angles: the direction of the mean resultant
/// vector. Returns `None` for empty input.
pub fn circular_mean(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    let (s, c) = angles
        .iter()
        .fold((0.0_f64, 0.0_f64), |(s, c), a| (s + a.sin(), c + a.cos()));
    Some(s.atan2(c))
}

/// Wrap-corrected percentile interval for angular samples.
///
/// Each sample's deviation from the circular mean is wrapped into (−π, π],
/// the requested percentiles are taken on the centered deviations, and the
/// mean is re-added. The returned endpoints can therefore lie just outside
/// (−π, π] when the interval straddles the boundary; they are offsets around
/// the circular mean, not independently wrapped angles.
pub fn circular_interval(angles: &[f64], lower_pct: f64, upper_pct: f64) -> Option<[f64; 2]> {
    let mean = circular_mean(angles)?;
    let centered: Vec<f64> = angles.iter().map(|a| wrap_angle(a - mean)).collect();
    let lo = percentile(&centered, lower_pct)?;
    let hi = percentile(&centered, upper_pct)?;
    Some([mean + lo, mean + hi])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn percentile_interpolates() {
        let samples = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&samples, 0.0), Some(1.0));
        assert_eq!(percentile(&samples, 100.0), Some(4.0));
        assert_eq!(percentile(&samples, 50.0), Some(2.5));
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&samples, 101.0), None);
    }

    #[test]
    fn wrap_angle_lands_in_half_open_range() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((wrap_angle(PI) - PI).abs() < 1e-9);
    }

    #[test]
    fn circular_mean_handles_boundary_cluster() {
        // Samples clustered around ±π: naive averaging would give ~0.
        let angles = [PI - 0.1, -PI + 0.1, PI - 0.05, -PI + 0.05];
        let mean = circular_mean(&angles).unwrap();
        assert!((mean.abs() - PI).abs() < 1e-9, "mean: {mean}");
    }

    #[test]
    fn interval_is_tight_across_the_boundary() {
        // A narrow band straddling ±π. Without wrap correction the 2.5/97.5
        // percentiles of the raw angles would span nearly 2π.
        let angles: Vec<f64> = (0..200)
            .map(|i| wrap_angle(PI - 0.2 + 0.4 * i as f64 / 199.0))
            .collect();
        let [lo, hi] = circular_interval(&angles, 2.5, 97.5).unwrap();
        assert!(hi - lo < 0.5, "interval width: {}", hi - lo);
    }

    #[test]
    fn interval_matches_plain_percentiles_away_from_boundary() {
        let angles: Vec<f64> = (0..100).map(|i| 0.5 + 0.002 * i as f64).collect();
        let [lo, hi] = circular_interval(&angles, 2.5, 97.5).unwrap();
        let plo = percentile(&angles, 2.5).unwrap();
        let phi = percentile(&angles, 97.5).unwrap();
        assert!((lo - plo).abs() < 1e-9);
        assert!((hi - phi).abs() < 1e-9);
    }
}

//! Sample estimators over return series.
//!
//! Plain moment estimators and a single percentile rule, shared by the risk
//! engine. Every function returns `None` instead of NaN when the statistic is
//! not defined for the input.
//!
//! # Percentile rule
//!
//! [`percentile`] interpolates linearly between the two nearest order
//! statistics: for a sorted sample `x[0..n]` and percentile `p`, the rank is
//! `h = (n - 1) * p / 100` and the result is
//! `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
//! This is NumPy's default ("linear", Hyndman & Fan type 7).

// ---------------------------------------------------------------------------
// Moments
// ---------------------------------------------------------------------------

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (denominator `n - 1`).
///
/// `None` for fewer than two observations. A constant series yields exactly
/// `0.0`, without the rounding residue a naive two-pass sum leaves behind.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let first = values[0];
    if values.iter().all(|&v| v == first) {
        return Some(0.0);
    }

    let m = mean(values)?;
    let variance = values.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

// ---------------------------------------------------------------------------
// Order statistics
// ---------------------------------------------------------------------------

/// `p`-th percentile (0..=100) with linear interpolation between order
/// statistics. `None` for an empty slice or `p` outside `[0, 100]`.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (sorted.len() - 1) as f64 * p / 100.0;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    if lo == hi {
        return Some(sorted[lo]);
    }
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_basic() {
        assert!((mean(&[1.0, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-12);
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn sample_std_known_value() {
        // Var = ((-1)^2 + 0 + 1^2) / 2 = 1
        let s = sample_std(&[1.0, 2.0, 3.0]).unwrap();
        assert!((s - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sample_std_needs_two_points() {
        assert!(sample_std(&[]).is_none());
        assert!(sample_std(&[0.05]).is_none());
    }

    #[test]
    fn sample_std_constant_is_exact_zero() {
        assert_eq!(sample_std(&[0.01, 0.01, 0.01, 0.01]), Some(0.0));
        assert_eq!(sample_std(&[0.1; 7]), Some(0.0));
    }

    #[test]
    fn percentile_endpoints() {
        let xs = [3.0, 1.0, 2.0];
        assert_eq!(percentile(&xs, 0.0), Some(1.0));
        assert_eq!(percentile(&xs, 100.0), Some(3.0));
        assert_eq!(percentile(&xs, 50.0), Some(2.0));
    }

    #[test]
    fn percentile_interpolates_linearly() {
        // n = 5, p = 5 → rank 0.2 → -0.02 + 0.2 * (-0.01 - -0.02) = -0.018
        let xs = [0.01, -0.02, 0.03, -0.01, 0.0];
        let v = percentile(&xs, 5.0).unwrap();
        assert!((v - (-0.018)).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn percentile_single_value() {
        assert_eq!(percentile(&[0.42], 5.0), Some(0.42));
    }

    #[test]
    fn percentile_rejects_bad_input() {
        assert!(percentile(&[], 5.0).is_none());
        assert!(percentile(&[1.0], -1.0).is_none());
        assert!(percentile(&[1.0], 101.0).is_none());
        assert!(percentile(&[1.0], f64::NAN).is_none());
    }
}

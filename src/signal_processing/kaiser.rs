//! Kaiser window and Kaiser's empirical design formulas
//!
//! The Kaiser window trades main-lobe width against side-lobe level through a
//! single shape parameter β. Kaiser's formulas pick β and the filter length
//! from a stopband attenuation and a transition width.

use std::f64::consts::PI;

use crate::constants::BESSEL_SERIES_EPSILON;

/// Modified Bessel function of the first kind, order 0
///
/// Evaluated by its power series `Σ ((x/2)^k / k!)^2`, which converges for
/// every finite argument and stays accurate for the β range used in filter
/// design.
pub fn bessel_i0(x: f64) -> f64 {
    let half_sq = (x / 2.0) * (x / 2.0);
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;

    loop {
        term *= half_sq / (k * k);
        sum += term;
        if term < sum * BESSEL_SERIES_EPSILON {
            break;
        }
        k += 1.0;
    }

    sum
}

/// Kaiser window shape parameter for a stopband attenuation in dB
///
/// Piecewise formula with three regimes. The middle and upper formulas do
/// not meet exactly at 50 dB; that step is part of the classical
/// approximation and is kept as-is.
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db > 50.0 {
        0.1102 * (attenuation_db - 8.7)
    } else if attenuation_db >= 21.0 {
        0.5842 * (attenuation_db - 21.0).powf(0.4) + 0.07886 * (attenuation_db - 21.0)
    } else {
        0.0
    }
}

/// Kaiser filter length estimate before odd-length adjustment
///
/// `transition_norm` is the transition width divided by Nyquist. The result
/// is `ceil((A - 8) / (2.285 · Δ · π))`; it may be zero or negative for
/// attenuations of 8 dB or less, which callers must treat as degenerate.
pub fn kaiser_length_estimate(attenuation_db: f64, transition_norm: f64) -> f64 {
    ((attenuation_db - 8.0) / (2.285 * transition_norm * PI)).ceil()
}

/// Symmetric Kaiser window of `length` points
pub fn kaiser_window(length: usize, beta: f64) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    if length == 1 {
        return vec![1.0];
    }

    let half = (length - 1) as f64 / 2.0;
    let i0_beta = bessel_i0(beta);

    (0..length)
        .map(|n| {
            let x = (n as f64 - half) / half;
            let arg = beta * (1.0 - x * x).max(0.0).sqrt();
            bessel_i0(arg) / i0_beta
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bessel_i0_known_values() {
        assert_relative_eq!(bessel_i0(0.0), 1.0);
        assert_relative_eq!(bessel_i0(1.0), 1.2660658777520082, max_relative = 1e-12);
        assert_relative_eq!(bessel_i0(5.0), 27.239871823604442, max_relative = 1e-12);
        assert_relative_eq!(bessel_i0(10.0), 2815.716628466254, max_relative = 1e-12);
    }

    #[test]
    fn test_bessel_i0_even() {
        assert_relative_eq!(bessel_i0(-3.2), bessel_i0(3.2));
    }

    #[test]
    fn test_kaiser_beta_regimes() {
        assert_eq!(kaiser_beta(10.0), 0.0);
        assert_eq!(kaiser_beta(20.999), 0.0);
        assert_eq!(kaiser_beta(21.0), 0.0);
        assert_relative_eq!(
            kaiser_beta(40.0),
            0.5842 * 19.0_f64.powf(0.4) + 0.07886 * 19.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(kaiser_beta(100.0), 0.1102 * 91.3, max_relative = 1e-12);
    }

    #[test]
    fn test_kaiser_beta_boundary_step_preserved() {
        // Just above 50 dB the upper formula takes over; the two formulas
        // differ slightly at the seam.
        let middle = kaiser_beta(50.0);
        let upper = 0.1102 * (50.0 - 8.7);
        assert!((middle - upper).abs() > 1e-4);
        assert_relative_eq!(kaiser_beta(50.0 + 1e-12), upper, max_relative = 1e-9);
    }

    #[test]
    fn test_kaiser_beta_monotonic_within_regimes() {
        let regimes = [(0.0, 21.0), (21.0, 50.0), (50.001, 200.0)];
        for (start, end) in regimes {
            let mut prev = kaiser_beta(start);
            let mut a = start;
            while a <= end {
                let beta = kaiser_beta(a);
                assert!(
                    beta >= prev,
                    "beta decreased at {} dB: {} < {}",
                    a,
                    beta,
                    prev
                );
                prev = beta;
                a += 0.25;
            }
        }
    }

    #[test]
    fn test_kaiser_length_estimate() {
        // 100 dB, 40 Hz transition at 44.1 kHz
        let n = kaiser_length_estimate(100.0, 40.0 / 22050.0);
        assert!(n > 1000.0);
        assert_eq!(n, n.ceil());

        assert!(kaiser_length_estimate(8.0, 0.1) <= 0.0);
        assert!(kaiser_length_estimate(5.0, 0.1) < 0.0);
    }

    #[test]
    fn test_kaiser_length_grows_with_narrower_transition() {
        let wide = kaiser_length_estimate(60.0, 0.2);
        let narrow = kaiser_length_estimate(60.0, 0.1);
        assert!(narrow > wide);
    }

    #[test]
    fn test_kaiser_window_beta_zero_is_rectangular() {
        let w = kaiser_window(8, 0.0);
        for &v in &w {
            assert_relative_eq!(v, 1.0);
        }
    }

    #[test]
    fn test_kaiser_window_symmetry_and_peak() {
        let w = kaiser_window(31, 8.6);
        for i in 0..w.len() {
            assert_relative_eq!(w[i], w[w.len() - 1 - i], max_relative = 1e-12);
        }
        assert_relative_eq!(w[15], 1.0);
        assert_relative_eq!(w[0], 1.0 / bessel_i0(8.6), max_relative = 1e-12);
    }

    #[test]
    fn test_kaiser_window_degenerate_lengths() {
        assert!(kaiser_window(0, 5.0).is_empty());
        assert_eq!(kaiser_window(1, 5.0), vec![1.0]);
    }
}

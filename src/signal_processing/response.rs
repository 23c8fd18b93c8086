use num_complex::Complex;
use rustfft::FftPlanner;

use crate::constants::MAGNITUDE_FLOOR;
use crate::signal_processing::FilterCoefficients;

/// Magnitude response of an FIR filter sampled between DC and Nyquist
#[derive(Debug, Clone)]
pub struct FrequencyResponse {
    pub frequencies_hz: Vec<f64>,
    pub magnitude: Vec<f64>,
}

impl FrequencyResponse {
    /// Magnitude in dB, floored to stay finite at exact zeros
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.magnitude
            .iter()
            .map(|&m| 20.0 * m.max(MAGNITUDE_FLOOR).log10())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frequencies_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies_hz.is_empty()
    }

    /// `(frequency, dB)` pairs, convenient for plotting
    pub fn points_db(&self) -> Vec<[f64; 2]> {
        self.frequencies_hz
            .iter()
            .zip(self.magnitude_db())
            .map(|(&f, db)| [f, db])
            .collect()
    }
}

/// Evaluate the response at `points` evenly spaced frequencies in `[0, fs/2)`
///
/// Uses one FFT of length `2·points`; taps beyond that length are folded
/// back, which is exact because the DFT kernel is periodic in the tap index.
pub fn frequency_response(
    coeffs: &FilterCoefficients,
    sample_rate_hz: f64,
    points: usize,
) -> FrequencyResponse {
    if points == 0 {
        return FrequencyResponse {
            frequencies_hz: Vec::new(),
            magnitude: Vec::new(),
        };
    }

    let n_fft = 2 * points;
    let mut buf = vec![Complex::<f64>::default(); n_fft];
    for (n, &tap) in coeffs.taps().iter().enumerate() {
        buf[n % n_fft].re += tap;
    }

    FftPlanner::<f64>::new()
        .plan_fft_forward(n_fft)
        .process(&mut buf);

    let step = sample_rate_hz / n_fft as f64;
    FrequencyResponse {
        frequencies_hz: (0..points).map(|k| k as f64 * step).collect(),
        magnitude: buf[..points].iter().map(|h| h.norm()).collect(),
    }
}

/// Magnitude of the response at a single frequency, evaluated directly
pub fn magnitude_at(coeffs: &FilterCoefficients, sample_rate_hz: f64, freq_hz: f64) -> f64 {
    let omega = 2.0 * std::f64::consts::PI * freq_hz / sample_rate_hz;
    let h: Complex<f64> = coeffs
        .taps()
        .iter()
        .enumerate()
        .map(|(n, &tap)| Complex::from_polar(tap, -omega * n as f64))
        .sum();
    h.norm()
}

/// Magnitude in dB at a single frequency
pub fn magnitude_db_at(coeffs: &FilterCoefficients, sample_rate_hz: f64, freq_hz: f64) -> f64 {
    20.0 * magnitude_at(coeffs, sample_rate_hz, freq_hz)
        .max(MAGNITUDE_FLOOR)
        .log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn three_tap() -> FilterCoefficients {
        FilterCoefficients::new(vec![0.25, 0.5, 0.25]).unwrap()
    }

    #[test]
    fn test_response_grid() {
        let resp = frequency_response(&three_tap(), 8000.0, 4);
        assert_eq!(resp.len(), 4);
        assert_eq!(resp.frequencies_hz, vec![0.0, 1000.0, 2000.0, 3000.0]);
    }

    #[test]
    fn test_response_matches_closed_form() {
        // H(ω) = e^{-jω}·(0.5 + 0.5·cos ω)
        let resp = frequency_response(&three_tap(), 8000.0, 16);
        for (f, m) in resp.frequencies_hz.iter().zip(&resp.magnitude) {
            let omega = 2.0 * std::f64::consts::PI * f / 8000.0;
            assert_relative_eq!(*m, 0.5 + 0.5 * omega.cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_folding_matches_direct_evaluation() {
        let taps: Vec<f64> = (0..21).map(|i| 1.0 / (1.0 + (i as f64 - 10.0).abs())).collect();
        let coeffs = FilterCoefficients::new(taps).unwrap();
        let resp = frequency_response(&coeffs, 1000.0, 4);
        for (f, m) in resp.frequencies_hz.iter().zip(&resp.magnitude) {
            assert_relative_eq!(*m, magnitude_at(&coeffs, 1000.0, *f), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_magnitude_db_floor() {
        let resp = FrequencyResponse {
            frequencies_hz: vec![0.0, 1.0],
            magnitude: vec![1.0, 0.0],
        };
        let db = resp.magnitude_db();
        assert_relative_eq!(db[0], 0.0);
        assert!(db[1].is_finite());
        assert_eq!(resp.points_db()[0], [0.0, 0.0]);
    }

    #[test]
    fn test_empty_response() {
        assert!(frequency_response(&three_tap(), 8000.0, 0).is_empty());
    }

    #[test]
    fn test_magnitude_db_at_nyquist_zero() {
        // Three-tap smoother has a zero at Nyquist
        assert!(magnitude_db_at(&three_tap(), 8000.0, 4000.0) < -200.0);
    }
}

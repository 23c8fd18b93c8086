use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::constants::{DIRECT_CONVOLUTION_MAX_TAPS, SYMMETRY_TOLERANCE};
use crate::error::{FilterError, Result};

/// Tap coefficients of a Type I linear-phase FIR filter
///
/// Always odd in length and symmetric about the center tap, so the group
/// delay is a whole number of samples. Instances are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    taps: Vec<f64>,
}

impl FilterCoefficients {
    /// Wrap a tap sequence, checking the linear-phase invariants
    ///
    /// # Errors
    /// Returns `FilterError::InvalidCoefficients` if the sequence is empty,
    /// has even length, contains non-finite values, or is not symmetric.
    pub fn new(taps: Vec<f64>) -> Result<Self> {
        if taps.is_empty() {
            return Err(FilterError::InvalidCoefficients(
                "tap sequence is empty".into(),
            ));
        }
        if taps.len().is_multiple_of(2) {
            return Err(FilterError::InvalidCoefficients(format!(
                "tap count must be odd, got {}",
                taps.len()
            )));
        }
        if let Some(i) = taps.iter().position(|t| !t.is_finite()) {
            return Err(FilterError::InvalidCoefficients(format!(
                "tap {} is not finite",
                i
            )));
        }

        let coeffs = Self { taps };
        if !coeffs.is_symmetric() {
            return Err(FilterError::InvalidCoefficients(
                "taps are not symmetric about the center".into(),
            ));
        }
        Ok(coeffs)
    }

    /// Get access to the tap coefficients
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Get the number of taps (filter length)
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Always false; a valid instance has at least one tap
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Get the group delay in samples (half the filter length for linear phase)
    pub fn group_delay_samples(&self) -> usize {
        (self.taps.len() - 1) / 2
    }

    /// Check `taps[i] == taps[len-1-i]` within a tolerance relative to the largest tap
    pub fn is_symmetric(&self) -> bool {
        let scale = self
            .taps
            .iter()
            .fold(0.0f64, |acc, t| acc.max(t.abs()))
            .max(f64::MIN_POSITIVE);
        let n = self.taps.len();
        (0..n / 2)
            .all(|i| (self.taps[i] - self.taps[n - 1 - i]).abs() <= SYMMETRY_TOLERANCE * scale)
    }

    /// Sum of the taps (DC gain)
    pub fn dc_gain(&self) -> f64 {
        self.taps.iter().sum()
    }
}

/// Precomputed FFT plan for overlap-add convolution
struct OverlapAddPlan {
    n_fft: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    taps_spectrum: Vec<Complex<f64>>,
}

impl OverlapAddPlan {
    fn new(taps: &[f64]) -> Self {
        let n_fft = choose_fft_len(taps.len());
        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(n_fft);
        let inverse = planner.plan_fft_inverse(n_fft);

        let mut taps_spectrum: Vec<Complex<f64>> = taps
            .iter()
            .map(|&t| Complex::new(t, 0.0))
            .chain(std::iter::repeat(Complex::default()))
            .take(n_fft)
            .collect();
        forward.process(&mut taps_spectrum);

        Self {
            n_fft,
            forward,
            inverse,
            taps_spectrum,
        }
    }

    /// Full linear convolution of `x` with the planned taps
    fn convolve_full(&self, x: &[f64], num_taps: usize) -> Vec<f64> {
        let out_len = x.len() + num_taps - 1;
        let mut out = vec![0.0f64; out_len];
        let n_seg = self.n_fft - num_taps + 1;
        let scale = 1.0 / self.n_fft as f64;
        let mut buf = vec![Complex::default(); self.n_fft];

        for start in (0..x.len()).step_by(n_seg) {
            let stop = (start + n_seg).min(x.len());

            for (slot, &v) in buf.iter_mut().zip(&x[start..stop]) {
                *slot = Complex::new(v, 0.0);
            }
            for slot in buf.iter_mut().skip(stop - start) {
                *slot = Complex::default();
            }

            self.forward.process(&mut buf);
            for (b, &h) in buf.iter_mut().zip(&self.taps_spectrum) {
                *b *= h;
            }
            self.inverse.process(&mut buf);

            let end = (start + self.n_fft).min(out_len);
            for (o, b) in out[start..end].iter_mut().zip(&buf) {
                *o += b.re * scale;
            }
        }

        out
    }
}

/// Power-of-two FFT size large enough that each block carries at least
/// three filter lengths of new input.
fn choose_fft_len(num_taps: usize) -> usize {
    (4 * num_taps).next_power_of_two()
}

/// Block FIR convolution engine
///
/// Computes `y[n] = Σ b[k]·x[n-k]` over a whole signal, where samples before
/// the start of the signal take a fixed initial value. Short filters are
/// summed directly; long ones use FFT overlap-add with a plan built once and
/// reused across calls.
pub struct FirConvolver {
    taps: Vec<f64>,
    plan: Option<OverlapAddPlan>,
}

impl FirConvolver {
    pub fn new(coeffs: &FilterCoefficients) -> Self {
        let taps = coeffs.taps().to_vec();
        let plan = (taps.len() > DIRECT_CONVOLUTION_MAX_TAPS).then(|| OverlapAddPlan::new(&taps));
        Self { taps, plan }
    }

    /// Force direct summation regardless of filter length
    pub fn direct(coeffs: &FilterCoefficients) -> Self {
        Self {
            taps: coeffs.taps().to_vec(),
            plan: None,
        }
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Filter `input`, treating every sample before index 0 as `initial`
    ///
    /// With `initial` set to the first input sample this is the steady-state
    /// start of a filter that has seen that value forever, so no start-up
    /// transient appears in the output. Output length equals input length.
    pub fn filter(&self, input: &[f64], initial: f64) -> Vec<f64> {
        if input.is_empty() {
            return Vec::new();
        }
        match &self.plan {
            Some(plan) => self.filter_fft(plan, input, initial),
            None => self.filter_direct(input, initial),
        }
    }

    fn filter_direct(&self, input: &[f64], initial: f64) -> Vec<f64> {
        let n_taps = self.taps.len();
        // Contribution of the pre-signal history to output n: initial · Σ_{k>n} b[k]
        let mut tail_sums = vec![0.0f64; n_taps];
        let mut acc = 0.0;
        for k in (0..n_taps).rev() {
            tail_sums[k] = acc;
            acc += self.taps[k];
        }

        (0..input.len())
            .map(|n| {
                let reach = n.min(n_taps - 1);
                let mut y = 0.0f64;
                for k in 0..=reach {
                    y += self.taps[k] * input[n - k];
                }
                if n < n_taps - 1 {
                    y += initial * tail_sums[n];
                }
                y
            })
            .collect()
    }

    fn filter_fft(&self, plan: &OverlapAddPlan, input: &[f64], initial: f64) -> Vec<f64> {
        let history = self.taps.len() - 1;
        let mut extended = Vec::with_capacity(history + input.len());
        extended.resize(history, initial);
        extended.extend_from_slice(input);

        let full = plan.convolve_full(&extended, self.taps.len());
        full[history..history + input.len()].to_vec()
    }
}

//! Forward-backward (zero-phase) FIR filtering
//!
//! The signal is filtered once forward and once backward with the same taps,
//! so phase shifts cancel and the magnitude response is squared. Edges are
//! handled by odd reflection of `3 × len(taps)` samples on both sides, and
//! each pass starts from the steady state of its first sample.

use crate::audio::SampleBuffer;
use crate::constants::EDGE_PAD_FACTOR;
use crate::error::{FilterError, Result};
use crate::signal_processing::{FilterCoefficients, FirConvolver};

/// Zero-phase filter over whole in-memory signals
pub struct ZeroPhaseFilter {
    convolver: FirConvolver,
}

impl ZeroPhaseFilter {
    pub fn new(coeffs: &FilterCoefficients) -> Self {
        Self {
            convolver: FirConvolver::new(coeffs),
        }
    }

    /// Number of reflected samples added at each edge
    pub fn padlen(&self) -> usize {
        EDGE_PAD_FACTOR * self.convolver.num_taps()
    }

    /// Shortest input accepted; the signal must be longer than the padding
    pub fn min_input_len(&self) -> usize {
        self.padlen() + 1
    }

    /// Filter a sample buffer, returning a new buffer at the same rate
    ///
    /// # Errors
    /// Returns `FilterError::DegenerateInput` if the buffer is not longer
    /// than the edge padding.
    pub fn apply(&self, input: &SampleBuffer) -> Result<SampleBuffer> {
        let samples: Vec<f64> = input.samples.iter().map(|&s| s as f64).collect();
        let filtered = self.filter(&samples)?;
        Ok(SampleBuffer::new(
            filtered.into_iter().map(|s| s as f32).collect(),
            input.sample_rate,
        ))
    }

    /// Filter a double-precision signal
    ///
    /// # Errors
    /// Returns `FilterError::DegenerateInput` if the signal is not longer
    /// than the edge padding.
    pub fn filter(&self, input: &[f64]) -> Result<Vec<f64>> {
        let padlen = self.padlen();
        if input.len() <= padlen {
            return Err(FilterError::DegenerateInput {
                needed: self.min_input_len(),
                available: input.len(),
            });
        }

        let extended = odd_extend(input, padlen);

        let forward = self.convolver.filter(&extended, extended[0]);

        let mut reversed = forward;
        reversed.reverse();
        let backward = self.convolver.filter(&reversed, reversed[0]);

        let mut output = backward;
        output.reverse();

        Ok(output[padlen..padlen + input.len()].to_vec())
    }
}

/// Zero-phase filter `input` with `coeffs`
///
/// Output has the same length and sample rate as the input. The input is
/// not modified and no clipping is applied.
pub fn apply(coeffs: &FilterCoefficients, input: &SampleBuffer) -> Result<SampleBuffer> {
    ZeroPhaseFilter::new(coeffs).apply(input)
}

/// Extend `x` by odd reflection about its end points
///
/// Left: `2·x[0] − x[padlen], …, 2·x[0] − x[1]`;
/// right: `2·x[n−1] − x[n−2], …, 2·x[n−1] − x[n−1−padlen]`.
/// Requires `padlen < x.len()`.
pub fn odd_extend(x: &[f64], padlen: usize) -> Vec<f64> {
    let n = x.len();
    debug_assert!(padlen < n);

    let first = x[0];
    let last = x[n - 1];
    let mut out = Vec::with_capacity(n + 2 * padlen);

    out.extend((1..=padlen).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=padlen).map(|i| 2.0 * last - x[n - 1 - i]));

    out
}

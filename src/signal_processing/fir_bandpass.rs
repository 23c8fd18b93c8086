use std::f64::consts::PI;

use crate::audio::SampleBuffer;
use crate::config::FilterSpec;
use crate::constants::MAX_FILTER_TAPS;
use crate::error::{FilterError, Result};
use crate::signal_processing::kaiser::{kaiser_beta, kaiser_length_estimate, kaiser_window};
use crate::signal_processing::{FilterCoefficients, ZeroPhaseFilter};

/// Result of a Kaiser-window bandpass design
///
/// Carries the coefficients together with the Kaiser β and filter length
/// that produced them, for display alongside the frequency response.
#[derive(Debug, Clone)]
pub struct KaiserDesign {
    pub coefficients: FilterCoefficients,
    pub beta: f64,
    pub num_taps: usize,
    pub spec: FilterSpec,
}

/// Normalized sinc, `sin(πx) / (πx)`
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Design a linear-phase FIR bandpass filter with the Kaiser window method
///
/// Cutoffs are normalized to Nyquist, β and the tap count come from Kaiser's
/// empirical formulas, and the windowed ideal bandpass response is scaled to
/// unit gain at the center of the passband. The tap count is always odd.
///
/// # Errors
/// Returns `FilterError::InvalidSpec` for non-positive, inverted or
/// super-Nyquist cutoffs, and `FilterError::DegenerateDesign` when the
/// estimated length is not positive or exceeds the tap ceiling.
pub fn design(spec: &FilterSpec) -> Result<KaiserDesign> {
    spec.validate()?;

    let nyquist = spec.nyquist_hz();
    let low = spec.low_cutoff_hz / nyquist;
    let high = spec.high_cutoff_hz / nyquist;
    if !(low > 0.0 && low < 1.0 && high > 0.0 && high < 1.0) {
        return Err(FilterError::InvalidSpec(format!(
            "normalized cutoffs must lie in (0, 1), got low={}, high={}",
            low, high
        )));
    }

    let delta = 10f64.powf(-spec.stopband_attenuation_db / 20.0);
    let attenuation = -20.0 * delta.log10();
    let beta = kaiser_beta(attenuation);

    let transition_norm = spec.transition_width_hz / nyquist;
    let estimate = kaiser_length_estimate(attenuation, transition_norm);
    if !(estimate >= 1.0) {
        return Err(FilterError::DegenerateDesign(format!(
            "estimated filter length {} is not positive (attenuation={} dB, transition={} Hz)",
            estimate, spec.stopband_attenuation_db, spec.transition_width_hz
        )));
    }
    if estimate > MAX_FILTER_TAPS as f64 {
        return Err(FilterError::DegenerateDesign(format!(
            "estimated filter length {} exceeds the limit of {} taps",
            estimate, MAX_FILTER_TAPS
        )));
    }

    let mut num_taps = estimate as usize;
    if num_taps.is_multiple_of(2) {
        num_taps += 1;
    }

    let window = kaiser_window(num_taps, beta);
    let center = (num_taps - 1) as f64 / 2.0;

    let mut taps: Vec<f64> = window
        .iter()
        .enumerate()
        .map(|(n, &w)| {
            let m = n as f64 - center;
            (high * sinc(high * m) - low * sinc(low * m)) * w
        })
        .collect();

    // Unit gain at the middle of the passband
    let scale_freq = 0.5 * (low + high);
    let gain: f64 = taps
        .iter()
        .enumerate()
        .map(|(n, &h)| h * (PI * (n as f64 - center) * scale_freq).cos())
        .sum();
    if !gain.is_finite() || gain.abs() < f64::EPSILON {
        return Err(FilterError::DegenerateDesign(format!(
            "passband gain {} cannot be normalized",
            gain
        )));
    }
    for tap in taps.iter_mut() {
        *tap /= gain;
    }

    log::debug!(
        "Kaiser bandpass {:.1}-{:.1} Hz @ {} Hz: A={:.2} dB, beta={:.4}, taps={}, gain={:.6}",
        spec.low_cutoff_hz,
        spec.high_cutoff_hz,
        spec.sample_rate_hz,
        attenuation,
        beta,
        num_taps,
        gain
    );

    let coefficients = FilterCoefficients::new(taps)
        .map_err(|e| FilterError::DegenerateDesign(format!("{}", e)))?;

    Ok(KaiserDesign {
        coefficients,
        beta,
        num_taps,
        spec: *spec,
    })
}

/// Zero-phase FIR bandpass filter with a Kaiser-window design
///
/// Binds a design to its sample rate so buffers recorded at another rate
/// are rejected instead of being filtered at the wrong cutoffs.
pub struct FirBandpass {
    design: KaiserDesign,
    filter: ZeroPhaseFilter,
}

impl FirBandpass {
    /// Create a new FIR bandpass filter
    ///
    /// # Errors
    /// Propagates the errors of [`design`].
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        let design = design(spec)?;
        let filter = ZeroPhaseFilter::new(&design.coefficients);
        Ok(Self { design, filter })
    }

    /// Filter a whole buffer forward and backward
    ///
    /// # Errors
    /// Returns `FilterError::SampleRateMismatch` if the buffer rate differs
    /// from the design rate, or `FilterError::DegenerateInput` if it is too short.
    pub fn filtfilt(&self, input: &SampleBuffer) -> Result<SampleBuffer> {
        let expected = self.design.spec.sample_rate_hz;
        if (expected - input.sample_rate as f64).abs() > f64::EPSILON * expected {
            return Err(FilterError::SampleRateMismatch {
                expected,
                actual: input.sample_rate,
            });
        }
        self.filter.apply(input)
    }

    pub fn design(&self) -> &KaiserDesign {
        &self.design
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.design.coefficients
    }

    /// Kaiser window shape parameter used for the design
    pub fn beta(&self) -> f64 {
        self.design.beta
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.design.num_taps
    }

    /// Get the group delay of a single pass in samples
    pub fn group_delay_samples(&self) -> usize {
        self.design.coefficients.group_delay_samples()
    }

    /// Shortest buffer `filtfilt` accepts
    pub fn min_input_len(&self) -> usize {
        self.filter.min_input_len()
    }
}

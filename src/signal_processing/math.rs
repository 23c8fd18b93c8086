use crate::constants::{MAGNITUDE_FLOOR, PEAK_NORMALIZE_THRESHOLD};

/// Root mean square of a signal, 0 for an empty slice
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Largest absolute sample value
pub fn peak_abs(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Convert an amplitude ratio to dB
pub fn amplitude_to_db(ratio: f64) -> f64 {
    20.0 * ratio.max(MAGNITUDE_FLOOR).log10()
}

/// Scale a signal so its peak sits at full scale, but only if it exceeds it
///
/// Signals already within [-1, 1] are returned unchanged.
pub fn peak_normalized(samples: &[f32]) -> Vec<f32> {
    let peak = peak_abs(samples);
    if peak > PEAK_NORMALIZE_THRESHOLD {
        log::debug!("Normalizing peak {:.3} to full scale", peak);
        samples.iter().map(|&s| s / peak).collect()
    } else {
        samples.to_vec()
    }
}

/// Amplitude of a single frequency component, by correlation with a complex tone
///
/// Returns the amplitude of `A·sin(2πft + φ)` present in `samples`; accurate
/// when the window holds many periods of `freq_hz`.
pub fn tone_amplitude(samples: &[f32], sample_rate: f32, freq_hz: f32) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let omega = 2.0 * std::f64::consts::PI * freq_hz as f64 / sample_rate as f64;
    let (re, im) = samples
        .iter()
        .enumerate()
        .fold((0.0f64, 0.0f64), |(re, im), (n, &s)| {
            let phase = omega * n as f64;
            (re + s as f64 * phase.cos(), im - s as f64 * phase.sin())
        });
    2.0 * (re * re + im * im).sqrt() / samples.len() as f64
}

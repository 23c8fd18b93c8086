use std::f64::consts::PI;

use serde::Deserialize;

use crate::audio::SampleBuffer;

/// One sinusoidal component of a synthetic test signal
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Tone {
    pub freq_hz: f64,
    pub amplitude: f64,
    #[serde(default)]
    pub phase_radians: f64,
}

impl Tone {
    pub fn new(freq_hz: f64, amplitude: f64) -> Self {
        Self {
            freq_hz,
            amplitude,
            phase_radians: 0.0,
        }
    }
}

/// Generate a sum of sinusoids
pub fn generate_tones(duration_secs: f64, sample_rate: u32, tones: &[Tone]) -> SampleBuffer {
    let num_samples = (duration_secs * sample_rate as f64).round() as usize;
    let fs = sample_rate as f64;

    let samples = (0..num_samples)
        .map(|i| {
            let t = i as f64 / fs;
            tones
                .iter()
                .map(|tone| {
                    tone.amplitude * (2.0 * PI * tone.freq_hz * t + tone.phase_radians).sin()
                })
                .sum::<f64>() as f32
        })
        .collect();

    SampleBuffer::new(samples, sample_rate)
}

/// Generate a single unit impulse of `amplitude` at `index` in a silent buffer
pub fn generate_impulse(
    len: usize,
    index: usize,
    amplitude: f32,
    sample_rate: u32,
) -> SampleBuffer {
    let mut samples = vec![0.0f32; len];
    if let Some(s) = samples.get_mut(index) {
        *s = amplitude;
    }
    SampleBuffer::new(samples, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::math::tone_amplitude;

    #[test]
    fn test_generate_tones_length_and_content() {
        let tones = [Tone::new(440.0, 0.25), Tone::new(1000.0, 0.5)];
        let buffer = generate_tones(0.5, 8000, &tones);
        assert_eq!(buffer.len(), 4000);
        assert_eq!(buffer.sample_rate, 8000);
        assert!((tone_amplitude(&buffer.samples, 8000.0, 440.0) - 0.25).abs() < 1e-3);
        assert!((tone_amplitude(&buffer.samples, 8000.0, 1000.0) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_generate_impulse() {
        let buffer = generate_impulse(10, 4, 1.0, 1000);
        assert_eq!(buffer.samples.iter().filter(|&&s| s != 0.0).count(), 1);
        assert_eq!(buffer.samples[4], 1.0);

        let out_of_range = generate_impulse(3, 7, 1.0, 1000);
        assert!(out_of_range.samples.iter().all(|&s| s == 0.0));
    }
}

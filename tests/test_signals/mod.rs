#![allow(dead_code)]

use kaiserband::{FilterSpec, SampleBuffer};

/// The reference voice-band design: 80-6000 Hz at 44.1 kHz, 40 Hz transition, 100 dB
pub fn reference_spec() -> FilterSpec {
    FilterSpec {
        low_cutoff_hz: 80.0,
        high_cutoff_hz: 6000.0,
        sample_rate_hz: 44100.0,
        transition_width_hz: 40.0,
        stopband_attenuation_db: 100.0,
    }
}

/// A cheaper design for tests that filter many signals
pub fn narrow_spec(sample_rate_hz: f64) -> FilterSpec {
    FilterSpec {
        low_cutoff_hz: 300.0,
        high_cutoff_hz: 3000.0,
        sample_rate_hz,
        transition_width_hz: 200.0,
        stopband_attenuation_db: 60.0,
    }
}

/// Sum of equal-amplitude sines
pub fn sum_of_sines(
    duration_secs: f32,
    sample_rate: u32,
    freqs_hz: &[f32],
    amplitude: f32,
) -> SampleBuffer {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let fs = sample_rate as f64;
    let samples = (0..num_samples)
        .map(|i| {
            let t = i as f64 / fs;
            freqs_hz
                .iter()
                .map(|&f| (2.0 * std::f64::consts::PI * f as f64 * t).sin())
                .sum::<f64>() as f32
                * amplitude
        })
        .collect();
    SampleBuffer::new(samples, sample_rate)
}

/// Drop `margin` samples from each end, where edge effects live
pub fn interior(samples: &[f32], margin: usize) -> &[f32] {
    &samples[margin..samples.len() - margin]
}

/// Unique path under the system temp directory
pub fn temp_wav(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("kaiserband_{}_{}.wav", name, std::process::id()))
}

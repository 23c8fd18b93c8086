use num_complex::Complex;
use rustfft::FftPlanner;

/// One-sided power spectrum `(frequency_hz, power)` of a whole signal
pub fn power_spectrum(samples: &[f32], sample_rate: f32) -> Vec<(f32, f64)> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buf: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();
    FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut buf);

    let bin_hz = sample_rate / n as f32;
    buf[..n / 2 + 1]
        .iter()
        .enumerate()
        .map(|(k, c)| (k as f32 * bin_hz, c.norm_sqr()))
        .collect()
}

/// Spectral energy between `low_hz` and `high_hz` inclusive
pub fn band_energy(samples: &[f32], sample_rate: f32, low_hz: f32, high_hz: f32) -> f64 {
    power_spectrum(samples, sample_rate)
        .into_iter()
        .filter(|&(f, _)| f >= low_hz && f <= high_hz)
        .map(|(_, p)| p)
        .sum()
}

/// Spectral energy outside `[low_hz, high_hz]`
pub fn out_of_band_energy(samples: &[f32], sample_rate: f32, low_hz: f32, high_hz: f32) -> f64 {
    power_spectrum(samples, sample_rate)
        .into_iter()
        .filter(|&(f, _)| f < low_hz || f > high_hz)
        .map(|(_, p)| p)
        .sum()
}

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    /// Additive white Gaussian noise at this SNR relative to the signal power
    pub snr_db: Option<f32>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_awgn(mut self, snr_db: f32) -> Self {
        self.snr_db = Some(snr_db);
        self
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f32>() / signal.len() as f32
}

/// Gaussian white noise with the given standard deviation
pub fn generate_white_noise(len: usize, std_dev: f32, seed: Option<u64>) -> Vec<f32> {
    let mut rng = create_rng(seed);
    match Normal::new(0.0, std_dev as f64) {
        Ok(normal) => (0..len).map(|_| normal.sample(&mut rng) as f32).collect(),
        Err(e) => {
            log::warn!("Invalid noise deviation {}: {}", std_dev, e);
            vec![0.0; len]
        }
    }
}

/// Add noise to `signal` in place as configured
pub fn add_noise(signal: &mut [f32], config: &NoiseConfig) {
    let Some(snr_db) = config.snr_db else {
        return;
    };

    let sig_power = signal_power(signal);
    if sig_power == 0.0 {
        return;
    }

    let snr_linear = 10.0_f32.powf(snr_db / 10.0);
    let noise_std = (sig_power / snr_linear).sqrt();
    let noise = generate_white_noise(signal.len(), noise_std, config.seed);

    for (sample, n) in signal.iter_mut().zip(noise) {
        *sample += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_noise_statistics() {
        let noise = generate_white_noise(100_000, 0.5, Some(42));
        let mean = noise.iter().sum::<f32>() / noise.len() as f32;
        let power = signal_power(&noise);
        assert!(mean.abs() < 0.01, "mean {}", mean);
        assert!((power - 0.25).abs() < 0.01, "power {}", power);
    }

    #[test]
    fn test_seeded_rng_reproducibility() {
        let a = generate_white_noise(64, 1.0, Some(12345));
        let b = generate_white_noise(64, 1.0, Some(12345));
        let c = generate_white_noise(64, 1.0, Some(54321));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_add_noise_snr() {
        let mut signal: Vec<f32> = (0..48000).map(|i| (i as f32 * 0.1).sin()).collect();
        let clean = signal.clone();
        add_noise(&mut signal, &NoiseConfig::default().with_seed(7).with_awgn(10.0));

        let noise: Vec<f32> = signal.iter().zip(&clean).map(|(a, b)| a - b).collect();
        let snr = 10.0 * (signal_power(&clean) / signal_power(&noise)).log10();
        assert!((snr - 10.0).abs() < 0.5, "snr {}", snr);
    }

    #[test]
    fn test_add_noise_disabled() {
        let mut signal = vec![0.5f32; 16];
        add_noise(&mut signal, &NoiseConfig::default().with_seed(1));
        assert_eq!(signal, vec![0.5f32; 16]);
    }
}

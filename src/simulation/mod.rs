mod measure;
mod noise;
mod signal;

pub use measure::{band_energy, out_of_band_energy, power_spectrum};
pub use noise::{NoiseConfig, add_noise, generate_white_noise, signal_power};
pub use signal::{Tone, generate_impulse, generate_tones};

pub mod fir_bandpass;
pub mod fir_core;
pub mod kaiser;
pub mod math;
pub mod response;
pub mod zero_phase;

pub use fir_bandpass::{FirBandpass, KaiserDesign, design};
pub use fir_core::{FilterCoefficients, FirConvolver};
pub use kaiser::{bessel_i0, kaiser_beta, kaiser_length_estimate, kaiser_window};
pub use response::{FrequencyResponse, frequency_response, magnitude_at, magnitude_db_at};
pub use zero_phase::{ZeroPhaseFilter, apply};

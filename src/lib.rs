pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod processing;
pub mod signal_processing;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use audio::SampleBuffer;
pub use config::{AppConfig, FilterParams, FilterSpec};
pub use error::{FilterError, Result};
pub use processing::{FilterPipeline, ProcessingResult};
pub use signal_processing::{FilterCoefficients, FirBandpass, KaiserDesign, apply, design};
pub use wav::save_wav;

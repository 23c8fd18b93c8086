use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid filter specification: {0}")]
    InvalidSpec(String),

    #[error("Degenerate filter design: {0}")]
    DegenerateDesign(String),

    #[error("Input too short for zero-phase filtering: need {needed} samples, have {available}")]
    DegenerateInput { needed: usize, available: usize },

    #[error("Invalid filter coefficients: {0}")]
    InvalidCoefficients(String),

    #[error("Sample rate mismatch: filter designed for {expected} Hz, buffer is {actual} Hz")]
    SampleRateMismatch { expected: f64, actual: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio stream error: {0}")]
    AudioStream(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;

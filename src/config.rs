//! Configuration for the kaiserband filter tool.
//!
//! ## Filter parameters
//!
//! The four user-facing parameters live in [`FilterParams`]. Once the sample
//! rate of the input is known they are bound into a [`FilterSpec`], which is
//! what the designer consumes:
//!
//! ```
//! use kaiserband::config::FilterParams;
//!
//! let spec = FilterParams::default().with_sample_rate(44100.0);
//! assert!(spec.validate().is_ok());
//! ```
//!
//! ## Config file
//!
//! All sections are optional; missing values fall back to the defaults.
//!
//! ```toml
//! [filter]
//! low_cutoff_hz = 80.0
//! high_cutoff_hz = 6000.0
//! transition_width_hz = 40.0
//! stopband_attenuation_db = 100.0
//!
//! [response]
//! points = 8000
//!
//! [output]
//! normalize_peak = true
//! ```

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FilterError, Result};

/// Slider range for the lower cutoff in Hz
pub const LOW_CUTOFF_RANGE: RangeInclusive<f64> = 20.0..=1000.0;
/// Slider range for the upper cutoff in Hz
pub const HIGH_CUTOFF_RANGE: RangeInclusive<f64> = 1000.0..=20000.0;
/// Slider range for the transition width in Hz
pub const TRANSITION_WIDTH_RANGE: RangeInclusive<f64> = 10.0..=200.0;
/// Slider range for the stopband attenuation in dB
pub const ATTENUATION_RANGE: RangeInclusive<f64> = 40.0..=120.0;

/// User-facing bandpass parameters, independent of the input sample rate
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Lower passband edge in Hz
    pub low_cutoff_hz: f64,
    /// Upper passband edge in Hz
    pub high_cutoff_hz: f64,
    /// Width of each transition band in Hz
    pub transition_width_hz: f64,
    /// Minimum stopband attenuation in dB (positive)
    pub stopband_attenuation_db: f64,
}

impl FilterParams {
    /// Bind these parameters to a sample rate
    pub fn with_sample_rate(&self, sample_rate_hz: f64) -> FilterSpec {
        FilterSpec {
            low_cutoff_hz: self.low_cutoff_hz,
            high_cutoff_hz: self.high_cutoff_hz,
            sample_rate_hz,
            transition_width_hz: self.transition_width_hz,
            stopband_attenuation_db: self.stopband_attenuation_db,
        }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            low_cutoff_hz: 80.0,
            high_cutoff_hz: 6000.0,
            transition_width_hz: 40.0,
            stopband_attenuation_db: 100.0,
        }
    }
}

/// Complete bandpass design request
///
/// Constructed fresh for each design. All fields are in Hz except the
/// attenuation, which is in dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub low_cutoff_hz: f64,
    pub high_cutoff_hz: f64,
    pub sample_rate_hz: f64,
    pub transition_width_hz: f64,
    pub stopband_attenuation_db: f64,
}

impl FilterSpec {
    /// Nyquist frequency in Hz
    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate_hz / 2.0
    }

    /// Check the specification for physically meaningful values
    ///
    /// Nothing is clamped: a cutoff at or above Nyquist is an error, not a
    /// request for "just below Nyquist".
    ///
    /// # Errors
    /// Returns `FilterError::InvalidSpec` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        let positive = |value: f64, name: &str| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(FilterError::InvalidSpec(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )))
            }
        };

        positive(self.sample_rate_hz, "sample rate")?;
        positive(self.low_cutoff_hz, "lower cutoff")?;
        positive(self.high_cutoff_hz, "upper cutoff")?;
        positive(self.transition_width_hz, "transition width")?;
        positive(self.stopband_attenuation_db, "stopband attenuation")?;

        if self.low_cutoff_hz >= self.high_cutoff_hz {
            return Err(FilterError::InvalidSpec(format!(
                "lower cutoff ({} Hz) must be below upper cutoff ({} Hz)",
                self.low_cutoff_hz, self.high_cutoff_hz
            )));
        }

        if self.high_cutoff_hz >= self.nyquist_hz() {
            return Err(FilterError::InvalidSpec(format!(
                "upper cutoff ({} Hz) must be below Nyquist ({} Hz)",
                self.high_cutoff_hz,
                self.nyquist_hz()
            )));
        }

        Ok(())
    }
}

/// Frequency response evaluation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Number of evenly spaced frequencies between DC and Nyquist
    pub points: usize,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self { points: 8000 }
    }
}

/// WAV output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WavOutputConfig {
    /// Divide by the peak magnitude before quantizing when it exceeds full scale
    pub normalize_peak: bool,
}

impl Default for WavOutputConfig {
    fn default() -> Self {
        Self {
            normalize_peak: true,
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub filter: FilterParams,
    pub response: ResponseConfig,
    pub output: WavOutputConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FilterError::Config(format!("{}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            FilterError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

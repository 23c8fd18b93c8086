use std::time::{Duration, Instant};

use crate::audio::SampleBuffer;
use crate::config::FilterParams;
use crate::constants::PEAK_NORMALIZE_THRESHOLD;
use crate::error::Result;
use crate::signal_processing::math::{amplitude_to_db, peak_abs, rms};
use crate::signal_processing::{FirBandpass, KaiserDesign};

pub struct ProcessingResult {
    pub design: KaiserDesign,
    pub filtered: SampleBuffer,
    /// RMS level of the input, linear full scale
    pub input_rms: f32,
    /// RMS level of the filtered output, linear full scale
    pub output_rms: f32,
    pub design_time: Duration,
    pub filter_time: Duration,
}

/// Design-then-filter pipeline for one set of user parameters
///
/// Each run designs a fresh filter for the input's sample rate, so the same
/// pipeline can process files recorded at different rates.
pub struct FilterPipeline {
    params: FilterParams,
}

impl FilterPipeline {
    pub fn new(params: FilterParams) -> Self {
        Self { params }
    }

    /// Design the bandpass for a given sample rate
    pub fn design_for(&self, sample_rate: u32) -> Result<FirBandpass> {
        FirBandpass::new(&self.params.with_sample_rate(sample_rate as f64))
    }

    /// Design the filter and apply it zero-phase to `input`
    pub fn run(&self, input: &SampleBuffer) -> Result<ProcessingResult> {
        let start = Instant::now();
        let filter = self.design_for(input.sample_rate)?;
        let design_time = start.elapsed();

        log::info!(
            "Designed {:.0}-{:.0} Hz bandpass: {} taps, beta={:.3} ({:.1} ms)",
            self.params.low_cutoff_hz,
            self.params.high_cutoff_hz,
            filter.num_taps(),
            filter.beta(),
            design_time.as_secs_f64() * 1000.0
        );

        let start = Instant::now();
        let filtered = filter.filtfilt(input)?;
        let filter_time = start.elapsed();

        let input_rms = rms(&input.samples);
        let output_rms = rms(&filtered.samples);
        log::info!(
            "Filtered {} samples ({:.1} ms), RMS {:.1} dBFS -> {:.1} dBFS",
            filtered.len(),
            filter_time.as_secs_f64() * 1000.0,
            amplitude_to_db(input_rms as f64),
            amplitude_to_db(output_rms as f64)
        );

        let peak = peak_abs(&filtered.samples);
        if peak > PEAK_NORMALIZE_THRESHOLD {
            log::warn!(
                "Filtered peak {:.3} exceeds full scale; output will be normalized on save/playback",
                peak
            );
        }

        Ok(ProcessingResult {
            design: filter.design().clone(),
            filtered,
            input_rms,
            output_rms,
            design_time,
            filter_time,
        })
    }
}

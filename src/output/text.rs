use super::{DesignSummary, Formatter};
use crate::signal_processing::FrequencyResponse;

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_design(&self, s: &DesignSummary) -> String {
        format!(
            "Bandpass: {:.1}-{:.1} Hz @ {} Hz\n\
             Transition: {:.1} Hz, stopband: {:.1} dB\n\
             Kaiser beta: {:.4}\n\
             Taps: {} (group delay {} samples)",
            s.low_cutoff_hz,
            s.high_cutoff_hz,
            s.sample_rate_hz,
            s.transition_width_hz,
            s.stopband_attenuation_db,
            s.beta,
            s.num_taps,
            s.group_delay_samples
        )
    }

    fn format_response(&self, response: &FrequencyResponse) -> String {
        response
            .points_db()
            .iter()
            .map(|[f, db]| format!("{:>10.2} Hz {:>9.2} dB", f, db))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

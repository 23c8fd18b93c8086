mod csv;
mod json;
mod text;

use serde::Serialize;

use crate::signal_processing::{FrequencyResponse, KaiserDesign};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Flat, serializable view of a Kaiser design
#[derive(Debug, Clone, Serialize)]
pub struct DesignSummary {
    pub low_cutoff_hz: f64,
    pub high_cutoff_hz: f64,
    pub sample_rate_hz: f64,
    pub transition_width_hz: f64,
    pub stopband_attenuation_db: f64,
    pub beta: f64,
    pub num_taps: usize,
    pub group_delay_samples: usize,
}

impl From<&KaiserDesign> for DesignSummary {
    fn from(design: &KaiserDesign) -> Self {
        Self {
            low_cutoff_hz: design.spec.low_cutoff_hz,
            high_cutoff_hz: design.spec.high_cutoff_hz,
            sample_rate_hz: design.spec.sample_rate_hz,
            transition_width_hz: design.spec.transition_width_hz,
            stopband_attenuation_db: design.spec.stopband_attenuation_db,
            beta: design.beta,
            num_taps: design.num_taps,
            group_delay_samples: design.coefficients.group_delay_samples(),
        }
    }
}

pub trait Formatter: Send {
    fn format_design(&self, summary: &DesignSummary) -> String;

    fn format_response(&self, response: &FrequencyResponse) -> String;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterParams;
    use crate::signal_processing::{design, frequency_response};

    fn sample_design() -> KaiserDesign {
        let params = FilterParams {
            low_cutoff_hz: 300.0,
            high_cutoff_hz: 3000.0,
            transition_width_hz: 400.0,
            stopband_attenuation_db: 60.0,
        };
        design(&params.with_sample_rate(16000.0)).unwrap()
    }

    #[test]
    fn test_summary_from_design() {
        let d = sample_design();
        let summary = DesignSummary::from(&d);
        assert_eq!(summary.num_taps, d.num_taps);
        assert_eq!(summary.group_delay_samples, (d.num_taps - 1) / 2);
        assert_eq!(summary.sample_rate_hz, 16000.0);
    }

    #[test]
    fn test_all_formatters_render() {
        let d = sample_design();
        let summary = DesignSummary::from(&d);
        let response = frequency_response(&d.coefficients, 16000.0, 8);
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Csv] {
            let formatter = create_formatter(format);
            assert!(formatter.format_design(&summary).contains(&d.num_taps.to_string()));
            assert!(!formatter.format_response(&response).is_empty());
        }
    }
}

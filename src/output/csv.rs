use super::{DesignSummary, Formatter};
use crate::signal_processing::FrequencyResponse;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_design(&self, s: &DesignSummary) -> String {
        format!(
            "low_cutoff_hz,high_cutoff_hz,sample_rate_hz,transition_width_hz,stopband_attenuation_db,beta,num_taps,group_delay_samples\n\
             {},{},{},{},{},{:.6},{},{}",
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
        let mut out = String::from("frequency_hz,magnitude,magnitude_db");
        for ((f, m), db) in response
            .frequencies_hz
            .iter()
            .zip(&response.magnitude)
            .zip(response.magnitude_db())
        {
            out.push_str(&format!("\n{:.4},{:.6e},{:.3}", f, m, db));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_response_has_header_and_rows() {
        let response = FrequencyResponse {
            frequencies_hz: vec![0.0, 50.0, 100.0],
            magnitude: vec![1.0, 0.5, 0.0],
        };
        let csv = CsvFormatter.format_response(&response);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "frequency_hz,magnitude,magnitude_db");
        assert!(lines[1].starts_with("0.0000,"));
        assert_eq!(lines[2].split(',').count(), 3);
    }
}

use serde::Serialize;

use super::{DesignSummary, Formatter};
use crate::signal_processing::FrequencyResponse;

pub struct JsonFormatter;

#[derive(Serialize)]
struct ResponseJson<'a> {
    frequencies_hz: &'a [f64],
    magnitude_db: Vec<f64>,
}

impl Formatter for JsonFormatter {
    fn format_design(&self, summary: &DesignSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_else(|e| {
            log::warn!("Failed to serialize design summary: {}", e);
            "{}".to_string()
        })
    }

    fn format_response(&self, response: &FrequencyResponse) -> String {
        let json = ResponseJson {
            frequencies_hz: &response.frequencies_hz,
            magnitude_db: response.magnitude_db(),
        };
        serde_json::to_string(&json).unwrap_or_else(|e| {
            log::warn!("Failed to serialize frequency response: {}", e);
            "{}".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response_parses() {
        let response = FrequencyResponse {
            frequencies_hz: vec![0.0, 10.0],
            magnitude: vec![1.0, 0.01],
        };
        let text = JsonFormatter.format_response(&response);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["frequencies_hz"][1], 10.0);
        assert_eq!(value["magnitude_db"][1].as_f64().unwrap().round(), -40.0);
    }
}

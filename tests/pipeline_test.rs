mod test_signals;

use hound::{SampleFormat, WavSpec, WavWriter};
use kaiserband::audio::read_wav_mono;
use kaiserband::output::{DesignSummary, OutputFormat, create_formatter};
use kaiserband::signal_processing::frequency_response;
use kaiserband::signal_processing::math::tone_amplitude;
use kaiserband::simulation::{NoiseConfig, Tone, add_noise, generate_tones};
use kaiserband::{AppConfig, FilterParams, FilterPipeline, save_wav};
use test_signals::{interior, temp_wav};

#[test]
fn test_wav_round_trip_through_pipeline() {
    let input_path = temp_wav("pipeline_in");
    let output_path = temp_wav("pipeline_out");

    let tones = [Tone::new(50.0, 0.4), Tone::new(1000.0, 0.4)];
    let mut signal = generate_tones(1.0, 16000, &tones);
    add_noise(&mut signal.samples, &NoiseConfig::default().with_awgn(40.0).with_seed(3));
    save_wav(&input_path, &signal, true).unwrap();

    let input = read_wav_mono(&input_path).unwrap();
    assert_eq!(input.sample_rate, 16000);
    assert_eq!(input.len(), signal.len());

    let pipeline = FilterPipeline::new(FilterParams {
        low_cutoff_hz: 300.0,
        high_cutoff_hz: 3000.0,
        transition_width_hz: 200.0,
        stopband_attenuation_db: 60.0,
    });
    let result = pipeline.run(&input).unwrap();
    save_wav(&output_path, &result.filtered, true).unwrap();

    let reloaded = read_wav_mono(&output_path).unwrap();
    let _ = std::fs::remove_file(&input_path);
    let _ = std::fs::remove_file(&output_path);

    assert_eq!(reloaded.len(), input.len());
    assert_eq!(reloaded.sample_rate, 16000);

    let y = interior(&reloaded.samples, 800);
    let hum = tone_amplitude(y, 16000.0, 50.0);
    let tone = tone_amplitude(y, 16000.0, 1000.0);
    assert!((tone - 0.4).abs() < 0.01, "1 kHz amplitude {}", tone);
    // 16-bit quantization floor limits how far the hum can be measured down
    assert!(hum < 1e-3, "50 Hz amplitude {}", hum);
}

#[test]
fn test_stereo_input_is_mixed_down() {
    let path = temp_wav("stereo");
    let spec = WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for _ in 0..100 {
        writer.write_sample(16384i16).unwrap();
        writer.write_sample(-8192i16).unwrap();
    }
    writer.finalize().unwrap();

    let buffer = read_wav_mono(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(buffer.len(), 100);
    for &s in &buffer.samples {
        assert!((s - 0.125).abs() < 1e-6);
    }
}

#[test]
fn test_config_file_drives_design() {
    let config = AppConfig::from_toml_str(
        r#"
        [filter]
        low_cutoff_hz = 500.0
        high_cutoff_hz = 2500.0
        transition_width_hz = 100.0
        stopband_attenuation_db = 70.0

        [response]
        points = 512
        "#,
    )
    .unwrap();
    assert!(config.output.normalize_peak);

    let filter = FilterPipeline::new(config.filter).design_for(16000).unwrap();
    let response = frequency_response(filter.coefficients(), 16000.0, config.response.points);
    assert_eq!(response.len(), 512);
    assert_eq!(response.frequencies_hz[0], 0.0);
    assert!(*response.frequencies_hz.last().unwrap() < 8000.0);

    let peak_db = response
        .magnitude_db()
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(peak_db.abs() < 0.1, "passband peak {} dB", peak_db);
}

#[test]
fn test_design_summary_formats() {
    let filter = FilterPipeline::new(FilterParams::default())
        .design_for(44100)
        .unwrap();
    let summary = DesignSummary::from(filter.design());

    let json = create_formatter(OutputFormat::Json).format_design(&summary);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["num_taps"].as_u64(), Some(filter.num_taps() as u64));

    let text = create_formatter(OutputFormat::Text).format_design(&summary);
    assert!(text.contains(&filter.num_taps().to_string()));

    let response = frequency_response(filter.coefficients(), 44100.0, 64);
    let csv = create_formatter(OutputFormat::Csv).format_response(&response);
    assert_eq!(csv.lines().count(), 65);
}

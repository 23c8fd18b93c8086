use std::path::Path;

use hound::{WavSpec, WavWriter};

use crate::audio::SampleBuffer;
use crate::constants::PCM16_FULL_SCALE;
use crate::error::Result;
use crate::signal_processing::math::peak_normalized;

/// Quantize float samples to 16-bit PCM
///
/// Scales by 32767 and truncates toward zero; out-of-range values saturate.
pub fn quantize_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s * PCM16_FULL_SCALE) as i16)
        .collect()
}

/// Write a mono 16-bit WAV file
///
/// With `normalize_peak` set, a buffer whose peak exceeds full scale is
/// divided by its peak first.
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    buffer: &SampleBuffer,
    normalize_peak: bool,
) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let samples = if normalize_peak {
        peak_normalized(&buffer.samples)
    } else {
        buffer.samples.clone()
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for sample in quantize_pcm16(&samples) {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    log::info!(
        "Saved {} samples @ {} Hz to {}",
        samples.len(),
        buffer.sample_rate,
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::read_wav_mono;

    #[test]
    fn test_quantize_pcm16() {
        assert_eq!(
            quantize_pcm16(&[0.0, 1.0, -1.0, 0.5, 2.0, -2.0]),
            vec![0, 32767, -32767, 16383, i16::MAX, i16::MIN]
        );
    }

    #[test]
    fn test_save_normalizes_and_reloads() {
        let path = std::env::temp_dir()
            .join(format!("kaiserband_wav_test_{}.wav", std::process::id()));
        let buffer = SampleBuffer::new(vec![0.0, 2.0, -1.0, 1.0], 16000);

        save_wav(&path, &buffer, true).unwrap();
        let loaded = read_wav_mono(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.sample_rate, 16000);
        assert_eq!(loaded.len(), 4);
        assert!((loaded.samples[1] - 32767.0 / 32768.0).abs() < 1e-6);
        assert!((loaded.samples[2] + 16383.0 / 32768.0).abs() < 1e-6);
    }
}

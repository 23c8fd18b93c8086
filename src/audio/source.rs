use std::io::Read;
use std::path::Path;

use hound::WavReader;

use super::SampleBuffer;
use crate::error::{FilterError, Result};

/// Decode a WAV file into a mono float buffer
///
/// Integer PCM is scaled by `2^(bits-1)` (so 16-bit divides by 32768 and
/// 32-bit by 2147483648); float PCM is taken as is. Multi-channel frames
/// are averaged into a single channel.
pub fn read_wav_mono<P: AsRef<Path>>(path: P) -> Result<SampleBuffer> {
    let reader = WavReader::open(path.as_ref())?;
    let buffer = decode_mono(reader)?;
    log::info!(
        "Loaded {}: {} samples @ {} Hz ({:.2}s)",
        path.as_ref().display(),
        buffer.len(),
        buffer.sample_rate,
        buffer.duration_secs()
    );
    Ok(buffer)
}

/// Decode WAV data from any reader into a mono float buffer
pub fn decode_mono<R: Read>(reader: WavReader<R>) -> Result<SampleBuffer> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(FilterError::Config("WAV file declares zero channels".into()));
    }

    let interleaved = read_samples(reader, &spec)?;
    let samples = mix_to_mono(&interleaved, spec.channels as usize);

    Ok(SampleBuffer::new(samples, spec.sample_rate))
}

fn read_samples<R: Read>(mut reader: WavReader<R>, spec: &hound::WavSpec) -> Result<Vec<f32>> {
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = 2f64.powi(spec.bits_per_sample as i32 - 1);
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f64 / max_val) as f32))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// Average interleaved frames into one channel
///
/// A trailing partial frame is dropped.
pub fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::SampleBuffer;
use crate::error::{FilterError, Result};
use crate::signal_processing::math::peak_normalized;

/// An owned playback of one sample buffer on the default output device
///
/// Playback runs until the buffer is exhausted or the session is dropped.
/// Only one session should exist at a time; callers stop (drop) the old
/// one before starting another.
pub struct PlaybackSession {
    stream: cpal::Stream,
    progress: PlaybackProgress,
}

/// Playback state shared between the audio callback and the owner
#[derive(Debug, Clone)]
pub struct PlaybackProgress {
    position: Arc<AtomicUsize>,
    failed: Arc<AtomicBool>,
    total: usize,
    sample_rate: u32,
}

impl PlaybackProgress {
    pub fn new(total: usize, sample_rate: u32) -> Self {
        Self {
            position: Arc::new(AtomicUsize::new(0)),
            failed: Arc::new(AtomicBool::new(false)),
            total,
            sample_rate,
        }
    }

    /// Record how many samples have been handed to the device
    pub fn advance_to(&self, position: usize) {
        self.position.store(position, Ordering::Relaxed);
    }

    pub fn position(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }

    /// Mark the stream as dead; waiting stops immediately
    pub fn mark_failed(&self) {
        self.failed.store(true, Ordering::Relaxed);
    }

    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.position() >= self.total
    }

    pub fn position_secs(&self) -> f64 {
        self.position().min(self.total) as f64 / self.sample_rate.max(1) as f64
    }

    /// Nominal playing time of the whole buffer
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.total as f64 / self.sample_rate.max(1) as f64)
    }

    /// Block until every sample is played, the stream fails, or `timeout` passes
    ///
    /// # Errors
    /// Returns `FilterError::AudioStream` on stream failure or timeout.
    pub fn wait(&self, timeout: Duration, poll: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.has_failed() {
                return Err(FilterError::AudioStream(
                    "output stream failed during playback".into(),
                ));
            }
            if self.is_finished() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(FilterError::AudioStream(format!(
                    "playback stalled at {:.2}s of {:.2}s",
                    self.position_secs(),
                    self.duration().as_secs_f64()
                )));
            }
            thread::sleep(poll);
        }
    }
}

impl PlaybackSession {
    /// Start playing `buffer`, peak-normalized if it exceeds full scale
    pub fn start(buffer: &SampleBuffer) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| FilterError::AudioDevice("No output device found".into()))?;

        match device.description() {
            Ok(desc) => log::info!("Output device: {:?}", desc),
            Err(_) => log::info!("Output device: Unknown"),
        }

        let default_config = device
            .default_output_config()
            .map_err(|e| FilterError::AudioDevice(format!("{}", e)))?;
        let channels = default_config.channels();

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: buffer.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let samples: Arc<[f32]> = peak_normalized(&buffer.samples).into();
        let total = samples.len();
        let progress = PlaybackProgress::new(total, buffer.sample_rate);

        let cb_samples = Arc::clone(&samples);
        let cb_progress = progress.clone();
        let err_progress = progress.clone();
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let next =
                        fill_frames(&cb_samples, cb_progress.position(), data, channels as usize);
                    cb_progress.advance_to(next);
                },
                move |err| {
                    log::warn!("Audio stream error: {}", err);
                    err_progress.mark_failed();
                },
                None,
            )
            .map_err(|e| FilterError::AudioStream(format!("{}", e)))?;

        stream
            .play()
            .map_err(|e| FilterError::AudioStream(format!("{}", e)))?;

        log::info!(
            "Playing {} samples @ {} Hz on {} channel(s)",
            total,
            buffer.sample_rate,
            channels
        );

        Ok(Self { stream, progress })
    }

    /// True once every sample has been handed to the device, or the stream died
    pub fn is_finished(&self) -> bool {
        self.progress.is_finished() || self.progress.has_failed()
    }

    /// Playback position in seconds
    pub fn position_secs(&self) -> f64 {
        self.progress.position_secs()
    }

    pub fn progress(&self) -> &PlaybackProgress {
        &self.progress
    }

    /// Stop playback and release the device
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        let _ = self.stream.pause();
    }
}

/// Copy mono samples from `position` into interleaved output frames
///
/// Every channel of a frame receives the same sample; frames past the end
/// of the signal are silence. Returns the position after the copied frames.
pub fn fill_frames(samples: &[f32], position: usize, out: &mut [f32], channels: usize) -> usize {
    let channels = channels.max(1);
    let mut pos = position;
    for frame in out.chunks_mut(channels) {
        let value = samples.get(pos).copied().unwrap_or(0.0);
        frame.fill(value);
        if pos < samples.len() {
            pos += 1;
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_frames_duplicates_channels() {
        let samples = [0.1, 0.2, 0.3];
        let mut out = [9.0f32; 4];
        let next = fill_frames(&samples, 0, &mut out, 2);
        assert_eq!(out, [0.1, 0.1, 0.2, 0.2]);
        assert_eq!(next, 2);
    }

    #[test]
    fn test_fill_frames_pads_with_silence() {
        let samples = [0.1, 0.2, 0.3];
        let mut out = [9.0f32; 6];
        let next = fill_frames(&samples, 2, &mut out, 2);
        assert_eq!(out, [0.3, 0.3, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(next, 3);
    }

    #[test]
    fn test_wait_returns_when_finished() {
        let progress = PlaybackProgress::new(100, 1000);
        progress.advance_to(100);
        assert!(progress.is_finished());
        assert!(
            progress
                .wait(Duration::from_secs(5), Duration::from_millis(1))
                .is_ok()
        );
    }

    #[test]
    fn test_wait_stops_on_stream_failure() {
        let progress = PlaybackProgress::new(100, 1000);
        progress.advance_to(40);
        let callback_side = progress.clone();
        callback_side.mark_failed();

        let start = Instant::now();
        let result = progress.wait(Duration::from_secs(60), Duration::from_millis(1));
        assert!(matches!(result, Err(FilterError::AudioStream(_))));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_wait_times_out_when_stalled() {
        let progress = PlaybackProgress::new(1000, 1000);
        progress.advance_to(10);
        let result = progress.wait(Duration::from_millis(20), Duration::from_millis(1));
        assert!(matches!(result, Err(FilterError::AudioStream(_))));
        assert!((progress.position_secs() - 0.01).abs() < 1e-9);
        assert_eq!(progress.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_fill_frames_mono() {
        let samples = [0.5, -0.5];
        let mut out = [0.0f32; 3];
        let next = fill_frames(&samples, 0, &mut out, 1);
        assert_eq!(out, [0.5, -0.5, 0.0]);
        assert_eq!(next, 2);
    }
}

/// Mono sample sequence paired with its sample rate
///
/// Samples are nominally in [-1, 1], but nothing here enforces it: filtered
/// output may overshoot and is only normalized at playback or save time.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Check buffer length
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// First `count` samples (or fewer if the buffer is shorter)
    pub fn head(&self, count: usize) -> &[f32] {
        &self.samples[..count.min(self.samples.len())]
    }

    /// Number of leading samples shown in waveform previews:
    /// 50 ms, capped at 2000 samples and at the buffer length
    pub fn preview_len(&self) -> usize {
        let fifty_ms = (0.05 * self.sample_rate as f64) as usize;
        fifty_ms.min(2000).min(self.samples.len())
    }
}

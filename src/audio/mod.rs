pub mod buffer;
pub mod playback;
pub mod source;

pub use buffer::SampleBuffer;
pub use playback::{PlaybackProgress, PlaybackSession};
pub use source::{decode_mono, mix_to_mono, read_wav_mono};

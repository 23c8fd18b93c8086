//! Numeric constants for filter design and application
//!
//! These constants bound the designer and pick between convolution
//! strategies in the applier.

/// Upper bound on the number of taps the designer will emit.
/// Orders beyond this come from pathological transition widths and are
/// reported as a degenerate design instead of allocating gigabytes.
pub const MAX_FILTER_TAPS: usize = 1 << 20;

/// Filters with at most this many taps are convolved by direct summation;
/// longer filters go through FFT overlap-add.
pub const DIRECT_CONVOLUTION_MAX_TAPS: usize = 64;

/// Edge padding for forward-backward filtering, in multiples of the filter length.
pub const EDGE_PAD_FACTOR: usize = 3;

/// Tolerance for the tap symmetry check (relative to the largest tap).
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Stop condition for the Bessel I0 power series.
pub const BESSEL_SERIES_EPSILON: f64 = 1e-17;

/// Floor applied before converting magnitudes to dB.
pub const MAGNITUDE_FLOOR: f64 = 1e-300;

/// Peaks above this magnitude trigger normalization before playback or save.
pub const PEAK_NORMALIZE_THRESHOLD: f32 = 1.0;

/// Full-scale value for 16-bit PCM output.
pub const PCM16_FULL_SCALE: f32 = 32767.0;

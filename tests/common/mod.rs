#![allow(dead_code)] // not every integration test uses every helper

use ecodetect::{AcousticEvent, SpectrogramMatrix};
use ndarray::Array2;

/// Standard test scale: 10 frames/s, 100 Hz bins.
pub const FPS: f64 = 10.0;
pub const BIN_WIDTH_HZ: f64 = 100.0;

/// Build a spectrogram from a per-cell function, on the standard test scale.
pub fn gram_from_fn<F>(n_frames: usize, n_bins: usize, f: F) -> SpectrogramMatrix
where
    F: Fn(usize, usize) -> f64,
{
    let values = Array2::from_shape_fn((n_frames, n_bins), |(t, b)| f(t, b));
    let nyquist = n_bins as f64 * BIN_WIDTH_HZ;
    SpectrogramMatrix::new(values, FPS, BIN_WIDTH_HZ, nyquist).unwrap()
}

/// An all-zero spectrogram on the standard test scale.
pub fn silent_gram(n_frames: usize, n_bins: usize) -> SpectrogramMatrix {
    gram_from_fn(n_frames, n_bins, |_, _| 0.0)
}

/// Build an event with the given bounds and score; remaining fields are
/// filled with consistent values (threshold 5 → max possible score 25).
pub fn make_event(start_seconds: f64, low_hz: f64, high_hz: f64, score: f64) -> AcousticEvent {
    AcousticEvent {
        segment_start_offset_seconds: 0.0,
        event_start_seconds: start_seconds,
        event_duration_seconds: 0.2,
        low_frequency_hz: low_hz,
        high_frequency_hz: high_hz,
        raw_score: score,
        normalized_score: (score / 25.0).min(1.0),
        max_possible_score: 25.0,
        max_score_in_event: score,
        name: Some("Click".to_string()),
    }
}

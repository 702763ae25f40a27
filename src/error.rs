//! Error types for ecodetect.
//!
//! This module defines the error types that can occur during event detection
//! and chunk classification. All errors implement `std::error::Error` via the
//! `thiserror` crate for convenient error handling and display.
//!
//! # Error Handling Philosophy
//!
//! - **Fail fast on structure**: malformed matrices and scale metadata are
//!   precondition violations and are rejected at the boundary.
//! - **Silent filtering on configuration**: unsatisfiable bandwidth or
//!   frequency ranges are not errors — they simply yield zero events.
//! - **Defined degeneracies**: numerically undefined statistics have fixed
//!   substitute values (entropy → 1.0, spike index with no peaks → 0.0)
//!   rather than propagating NaN.

use thiserror::Error;

/// Result type alias using ecodetect's Error type.
///
/// This is the standard return type for fallible operations in ecodetect.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during detection or classification.
///
/// Every variant represents a structural precondition violation; see the
/// module documentation for what is deliberately *not* an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Spectrogram matrix has zero frames or zero frequency bins.
    #[error("spectrogram matrix is empty (zero frames or zero bins)")]
    EmptySpectrogram,

    /// Scale metadata is non-positive.
    ///
    /// Both the frame rate and the frequency bin width must be strictly
    /// positive for time/frequency mapping to be meaningful.
    #[error("invalid spectrogram scale: frames_per_second = {frames_per_second}, bin_width_hz = {bin_width_hz}")]
    InvalidScale {
        frames_per_second: f64,
        bin_width_hz: f64,
    },

    /// Configured detection band extends past the matrix's Nyquist frequency.
    ///
    /// This is the "mismatched bin count vs configured frequency bounds"
    /// precondition: the requested band cannot be mapped onto the matrix.
    #[error("max frequency {max_frequency_hz} Hz exceeds Nyquist {nyquist_hz} Hz")]
    FrequencyBoundExceedsNyquist {
        max_frequency_hz: f64,
        nyquist_hz: f64,
    },

    /// Decibel threshold is NaN or infinite.
    #[error("decibel threshold is not finite: {value}")]
    NonFiniteThreshold { value: f64 },

    /// Chunk classifier was given a zero-length envelope.
    #[error("signal envelope is empty")]
    EmptyEnvelope,

    /// Chunk classifier was given a non-positive frame step.
    #[error("invalid frame step: {frame_step_seconds} seconds")]
    InvalidChunkStep { frame_step_seconds: f64 },
}

//! SpectrogramMatrix - validated time-frequency input.
//!
//! This module defines the read-only time-frequency matrix that every
//! detector and classifier in the crate consumes. The matrix itself is
//! produced by an external FFT/framing stage; this crate never computes
//! spectra, it only analyzes them.
//!
//! # Layout
//!
//! Values are stored on a 2D grid indexed `[frame, bin]`:
//! - Rows: time frames, spaced `1 / frames_per_second` apart
//! - Columns: frequency bins of width `bin_width_hz`, bin 0 at 0 Hz
//!
//! # Preconditions
//!
//! Construction fails fast on structurally malformed input (empty matrix,
//! non-positive scale metadata). Everything past construction treats the
//! matrix as immutable; components receive it by reference and return newly
//! constructed results.

use ndarray::{Array2, ArrayView1};

use crate::error::{Error, Result};

/// Time-frequency representation consumed by the detectors.
///
/// Carries the power/amplitude values together with the scale metadata
/// needed to map indices back to seconds and Hertz.
#[derive(Debug, Clone)]
pub struct SpectrogramMatrix {
    /// Intensity values (n_frames × n_bins).
    ///
    /// values[[frame, bin]] — real-valued, typically decibel or amplitude
    /// scale depending on the producing stage.
    values: Array2<f64>,

    /// Number of analysis frames per second of audio.
    frames_per_second: f64,

    /// Width of one frequency bin in Hz.
    bin_width_hz: f64,

    /// Nyquist frequency of the source audio in Hz.
    nyquist_hz: f64,
}

impl SpectrogramMatrix {
    /// Create a new SpectrogramMatrix, validating its structure.
    ///
    /// # Arguments
    ///
    /// * `values` - 2D array of intensity values (n_frames × n_bins)
    /// * `frames_per_second` - Frame rate of the analysis (must be > 0)
    /// * `bin_width_hz` - Frequency bin width in Hz (must be > 0)
    /// * `nyquist_hz` - Nyquist frequency of the source audio
    ///
    /// # Errors
    ///
    /// * [`Error::EmptySpectrogram`] if the matrix has zero frames or bins
    /// * [`Error::InvalidScale`] if either scale value is non-positive or
    ///   not finite
    pub fn new(
        values: Array2<f64>,
        frames_per_second: f64,
        bin_width_hz: f64,
        nyquist_hz: f64,
    ) -> Result<Self> {
        if values.nrows() == 0 || values.ncols() == 0 {
            return Err(Error::EmptySpectrogram);
        }
        if !(frames_per_second > 0.0 && frames_per_second.is_finite())
            || !(bin_width_hz > 0.0 && bin_width_hz.is_finite())
        {
            return Err(Error::InvalidScale {
                frames_per_second,
                bin_width_hz,
            });
        }

        Ok(Self {
            values,
            frames_per_second,
            bin_width_hz,
            nyquist_hz,
        })
    }

    /// Get the intensity values (n_frames × n_bins).
    ///
    /// Access individual values with values[[frame, bin]].
    #[inline]
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of time frames.
    #[inline]
    pub fn n_frames(&self) -> usize {
        self.values.nrows()
    }

    /// Number of frequency bins.
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.values.ncols()
    }

    /// Frame rate of the analysis in frames per second.
    #[inline]
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// Width of one frequency bin in Hz.
    #[inline]
    pub fn bin_width_hz(&self) -> f64 {
        self.bin_width_hz
    }

    /// Nyquist frequency of the source audio in Hz.
    #[inline]
    pub fn nyquist_hz(&self) -> f64 {
        self.nyquist_hz
    }

    /// Get one frame (row) as a 1-D view over its frequency bins.
    #[inline]
    pub fn frame(&self, frame: usize) -> ArrayView1<'_, f64> {
        self.values.row(frame)
    }

    /// Get time for a frame index (0-based).
    ///
    /// Time = frame / frames_per_second
    #[inline]
    pub fn time_from_frame(&self, frame: usize) -> f64 {
        frame as f64 / self.frames_per_second
    }

    /// Get frequency for a bin index (0-based).
    ///
    /// Frequency = bin × bin_width_hz
    #[inline]
    pub fn frequency_from_bin(&self, bin: usize) -> f64 {
        bin as f64 * self.bin_width_hz
    }

    /// Map a frequency in Hz to the nearest bin index.
    ///
    /// Rounds to the nearest bin; the result is not clamped to the matrix
    /// width, callers bound it against [`n_bins`](Self::n_bins).
    #[inline]
    pub fn bin_from_frequency(&self, frequency_hz: f64) -> usize {
        (frequency_hz / self.bin_width_hz).round() as usize
    }
}

//! # ecodetect
//!
//! Spectrogram-based acoustic event detection and classification for
//! automated bioacoustic monitoring pipelines.
//!
//! The crate turns a numeric time-frequency matrix into a set of typed,
//! scored, time/frequency-bounded events (sharp-onset clicks and sustained
//! tonal whistles), and screens recordings for rain and cicada background
//! conditions with a chunk-level descriptive-statistic classifier.
//!
//! Audio decoding, resampling, and the FFT/windowing stage that produces the
//! spectrogram are external collaborators: this crate consumes matrices and
//! envelopes, it never touches audio files.
//!
//! # Supported Operations
//!
//! - **Click detection**: frame-by-frame onset/decay profile scan
//! - **Whistle detection**: the same kernel with a sustained-tone profile
//! - **Event merging**: fixed-point fusion of proximal-similar events
//! - **Format conversion**: acoustic ↔ generic spectral event records
//! - **Rain/Cicada screening**: 10-second chunk index battery and rule
//!
//! # Quick Start
//!
//! ```
//! use ndarray::Array2;
//! use ecodetect::{spectrogram_to_clicks, DetectionConfig, SpectrogramMatrix};
//!
//! // A 100-frame × 256-bin matrix from an external FFT stage.
//! let values = Array2::<f64>::zeros((100, 256));
//! let gram = SpectrogramMatrix::new(values, 86.13, 43.07, 11025.0).unwrap();
//!
//! let config = DetectionConfig::click();
//! let result = spectrogram_to_clicks(&gram, &config, 0.0).unwrap();
//! assert!(result.events.is_empty()); // silence detects nothing
//! ```
//!
//! # Module Organization
//!
//! Each concern has its own module containing its value records and free
//! conversion functions:
//! - `spectrogram`: validated time-frequency input matrix
//! - `event`: event records and the format converter
//! - `score_array`: 1-D intensity slice → events
//! - `detector`: the profile-scan kernel and click/whistle entry points
//! - `merge`: proximal-similar event fusion
//! - `chunk`: chunk indices and the rain/cicada rule
//!
//! # Concurrency
//!
//! Every operation is a pure function over immutable inputs: no I/O, no
//! shared mutable state, no locking. Independent invocations (different
//! recordings, chunks, or event types) parallelize freely.

// Module declarations
pub mod chunk;
pub mod detector;
pub mod error;
pub mod event;
pub mod merge;
pub mod score_array;
pub mod spectrogram;

// Re-export main types at crate root for convenient access

/// Error types for ecodetect operations.
pub use error::{Error, Result};

/// Validated time-frequency input matrix.
pub use spectrogram::SpectrogramMatrix;

/// Event records and the acoustic ↔ spectral format converter.
///
/// - `AcousticEvent`: detected entity with segment-relative timing
/// - `SpectralEvent`: generic representation with absolute timing
/// - `spectral_to_acoustic` / `acoustic_to_spectral`: the converter pair
pub use event::{acoustic_to_spectral, spectral_to_acoustic, AcousticEvent, SpectralEvent};

/// Score-array conversion: one spectral slice → zero or more events.
pub use score_array::score_array_to_events;

/// Detection kernel and the click/whistle entry points.
///
/// - `DetectionConfig`: per-event-type configuration record
/// - `OnsetProfile`: onset/decay predicate strategy (Click, Whistle)
/// - `DetectionResult`: events plus the temporal-intensity curve
/// - `spectrogram_to_clicks` / `spectrogram_to_whistles`: labeled wrappers
pub use detector::{
    detect_events, spectrogram_to_clicks, spectrogram_to_whistles, DetectionConfig,
    DetectionResult, OnsetProfile,
};

/// Fixed-point fusion of proximal-similar events.
pub use merge::combine_similar_proximal_events;

/// Chunk-level screening types and functions.
///
/// - `ChunkIndices`: per-chunk descriptive statistics
/// - `ChunkLabel` / `ChunkClassification` / `ChunkSummary`: rule output
/// - `classify_chunks`: whole-recording entry point
pub use chunk::{
    classify_chunk, classify_chunks, compute_chunk_indices, ChunkClassification, ChunkIndices,
    ChunkLabel, ChunkSummary,
};

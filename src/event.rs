//! Acoustic and spectral event records, plus the converter between them.
//!
//! An [`AcousticEvent`] is the detected entity this crate exists to produce:
//! a time/frequency-bounded, scored rectangle with segment-relative timing.
//! A [`SpectralEvent`] is the generic representation used by collaborators
//! that deal in absolute (recording-relative) times; the two free functions
//! at the bottom of this module form the bidirectional format converter.
//!
//! Events are value-like. The detectors create them, the merger may supersede
//! groups of them with fused instances, and they are immutable thereafter.

use serde::{Deserialize, Serialize};

/// Multiplier applied to the decibel threshold to obtain the maximum
/// possible event score used for normalization.
pub const MAX_SCORE_MULTIPLIER: f64 = 5.0;

/// A detected acoustic event.
///
/// Times are split into an absolute anchor (`segment_start_offset_seconds`,
/// the start of the analyzed segment within the recording) and a
/// segment-relative start. Frequency bounds always satisfy
/// `low_frequency_hz < high_frequency_hz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcousticEvent {
    /// Absolute time anchor of the analyzed segment, in seconds.
    pub segment_start_offset_seconds: f64,

    /// Event start relative to the segment start, in seconds.
    pub event_start_seconds: f64,

    /// Event duration in seconds. Always > 0.
    pub event_duration_seconds: f64,

    /// Lower frequency bound in Hz.
    pub low_frequency_hz: f64,

    /// Upper frequency bound in Hz.
    pub high_frequency_hz: f64,

    /// Mean intensity over the event's bin range.
    pub raw_score: f64,

    /// Raw score divided by the maximum possible score, clipped to [0, 1].
    pub normalized_score: f64,

    /// Maximum possible score: 5 × the governing decibel threshold.
    pub max_possible_score: f64,

    /// Maximum intensity observed inside the event's bin range.
    pub max_score_in_event: f64,

    /// Optional label, e.g. "Click" or "Whistle".
    pub name: Option<String>,
}

impl AcousticEvent {
    /// Event end relative to the segment start, in seconds.
    #[inline]
    pub fn event_end_seconds(&self) -> f64 {
        self.event_start_seconds + self.event_duration_seconds
    }

    /// Frequency extent of the event in Hz.
    #[inline]
    pub fn bandwidth_hz(&self) -> f64 {
        self.high_frequency_hz - self.low_frequency_hz
    }
}

/// Generic spectral-event representation with absolute timing.
///
/// Used at the boundary with collaborators that do not carry a segment
/// anchor: `start_seconds`/`end_seconds` are relative to the start of the
/// whole recording (the segment offset is folded in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralEvent {
    /// Absolute start time in seconds.
    pub start_seconds: f64,

    /// Absolute end time in seconds.
    pub end_seconds: f64,

    /// Lower frequency bound in Hz.
    pub low_frequency_hz: f64,

    /// Upper frequency bound in Hz.
    pub high_frequency_hz: f64,

    /// Event score (the acoustic event's raw score).
    pub score: f64,
}

/// Convert a generic spectral event into an acoustic event anchored at the
/// given segment start offset.
///
/// The spectral event's absolute times are re-expressed relative to
/// `segment_start_offset_seconds`. Score normalization is recomputed from
/// the supplied decibel threshold (`max_possible_score` = 5 × threshold).
pub fn spectral_to_acoustic(
    event: &SpectralEvent,
    segment_start_offset_seconds: f64,
    decibel_threshold: f64,
    name: Option<&str>,
) -> AcousticEvent {
    let max_possible_score = MAX_SCORE_MULTIPLIER * decibel_threshold;
    let normalized_score = if max_possible_score > 0.0 {
        (event.score / max_possible_score).min(1.0)
    } else {
        0.0
    };

    AcousticEvent {
        segment_start_offset_seconds,
        event_start_seconds: event.start_seconds - segment_start_offset_seconds,
        event_duration_seconds: event.end_seconds - event.start_seconds,
        low_frequency_hz: event.low_frequency_hz,
        high_frequency_hz: event.high_frequency_hz,
        raw_score: event.score,
        normalized_score,
        max_possible_score,
        max_score_in_event: event.score,
        name: name.map(|n| n.to_string()),
    }
}

/// Convert an acoustic event back into the generic spectral representation.
///
/// The segment anchor is folded into the absolute times; score and frequency
/// bounds carry over unchanged.
pub fn acoustic_to_spectral(event: &AcousticEvent) -> SpectralEvent {
    SpectralEvent {
        start_seconds: event.segment_start_offset_seconds + event.event_start_seconds,
        end_seconds: event.segment_start_offset_seconds + event.event_end_seconds(),
        low_frequency_hz: event.low_frequency_hz,
        high_frequency_hz: event.high_frequency_hz,
        score: event.raw_score,
    }
}

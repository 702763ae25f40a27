//! Frame-by-frame onset/decay profile detection over a spectrogram.
//!
//! One detection kernel serves both event types. The kernel walks every
//! interior frame of the matrix, masks each frequency bin through an
//! [`OnsetProfile`] predicate (which encodes what "click-like" or
//! "whistle-like" intensity means at that bin), and feeds the surviving
//! per-frame slice into [`score_array_to_events`]. Accepted raw scores also
//! accumulate into a temporal-intensity curve aligned 1:1 with frames, kept
//! for diagnostic/plotting use.
//!
//! Per-event-type specialization is a configuration record plus a strategy
//! value — not a type hierarchy. [`spectrogram_to_clicks`] and
//! [`spectrogram_to_whistles`] are thin labeled wrappers over the kernel.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::event::AcousticEvent;
use crate::merge::combine_similar_proximal_events;
use crate::score_array::score_array_to_events;
use crate::spectrogram::SpectrogramMatrix;

/// Default tolerance on start-time difference when merging, in seconds.
pub const DEFAULT_START_TIME_TOLERANCE_SECONDS: f64 = 1.0;

/// Default tolerance on frequency-bound difference when merging, in Hz.
pub const DEFAULT_FREQUENCY_TOLERANCE_HZ: f64 = 100.0;

/// Per-event-type detection configuration.
///
/// Sourced from external configuration loading; `Deserialize` is derived so
/// that layer can map records straight onto this struct.
///
/// Unsatisfiable ranges (`min_frequency_hz ≥ max_frequency_hz`,
/// `min_bandwidth_hz > max_bandwidth_hz`) are not rejected: detection simply
/// finds zero events. Structural problems (band past Nyquist, non-finite
/// threshold) fail fast instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Lower edge of the searched frequency band, in Hz.
    pub min_frequency_hz: f64,

    /// Upper edge of the searched frequency band, in Hz.
    pub max_frequency_hz: f64,

    /// Intensity cutoff above which a bin counts as active.
    pub decibel_threshold: f64,

    /// Minimum accepted event bandwidth, in Hz.
    pub min_bandwidth_hz: f64,

    /// Maximum accepted event bandwidth, in Hz.
    pub max_bandwidth_hz: f64,

    /// Whether to run the proximal-similar merge pass after detection.
    pub combine_proximal_similar_events: bool,

    /// Merge tolerance on start-time difference, in seconds.
    pub start_time_tolerance_seconds: f64,

    /// Merge tolerance on frequency-bound difference, in Hz.
    pub frequency_tolerance_hz: f64,
}

impl DetectionConfig {
    /// Defaults tuned for sharp-onset broadband clicks.
    pub fn click() -> Self {
        Self {
            min_frequency_hz: 500.0,
            max_frequency_hz: 8000.0,
            decibel_threshold: 6.0,
            min_bandwidth_hz: 200.0,
            max_bandwidth_hz: 5000.0,
            combine_proximal_similar_events: true,
            start_time_tolerance_seconds: DEFAULT_START_TIME_TOLERANCE_SECONDS,
            frequency_tolerance_hz: DEFAULT_FREQUENCY_TOLERANCE_HZ,
        }
    }

    /// Defaults tuned for sustained narrowband whistles.
    pub fn whistle() -> Self {
        Self {
            min_frequency_hz: 500.0,
            max_frequency_hz: 6000.0,
            decibel_threshold: 6.0,
            min_bandwidth_hz: 50.0,
            max_bandwidth_hz: 1000.0,
            combine_proximal_similar_events: true,
            start_time_tolerance_seconds: DEFAULT_START_TIME_TOLERANCE_SECONDS,
            frequency_tolerance_hz: DEFAULT_FREQUENCY_TOLERANCE_HZ,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::click()
    }
}

/// Onset/decay profile a frequency bin must match to contribute intensity.
///
/// The predicate looks at the same bin in the previous, current, and next
/// frame, so the kernel only scans interior frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnsetProfile {
    /// Sudden onset followed by decay: the previous frame is below the
    /// threshold (nothing there a moment ago) and the current value is at
    /// least the next one (already decaying, not still rising).
    Click,

    /// Sustained tone: the bin is at/above threshold in both the previous
    /// and the next frame, i.e. the energy persists across neighbours.
    Whistle,
}

impl OnsetProfile {
    /// Does the bin qualify as profile intensity for this event type?
    #[inline]
    pub fn qualifies(&self, prev: f64, current: f64, next: f64, decibel_threshold: f64) -> bool {
        match self {
            OnsetProfile::Click => prev < decibel_threshold && current >= next,
            OnsetProfile::Whistle => prev >= decibel_threshold && next >= decibel_threshold,
        }
    }
}

/// Output of one detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Accepted events, ordered by the frame they were found in.
    pub events: Vec<AcousticEvent>,

    /// Per-frame sum of accepted raw scores, aligned 1:1 with the
    /// spectrogram's frames. Zero for frames without events.
    pub temporal_intensity: Vec<f64>,
}

/// Run the profile-scan detection kernel over a spectrogram.
///
/// For every frame `t` in `1..n_frames - 1`:
///
/// 1. Each bin of the configured band is masked through `profile`; a
///    qualifying bin contributes `max(0, current)`, anything else 0.
/// 2. Frames whose slice maximum stays below the threshold are skipped.
/// 3. The slice is converted to events via [`score_array_to_events`]; each
///    accepted event's raw score is added to the temporal-intensity value
///    for frame `t`.
///
/// A final merge pass runs when the configuration asks for it.
///
/// # Errors
///
/// * [`Error::NonFiniteThreshold`] for a NaN/infinite threshold
/// * [`Error::FrequencyBoundExceedsNyquist`] when the configured band does
///   not fit the matrix
pub fn detect_events(
    gram: &SpectrogramMatrix,
    config: &DetectionConfig,
    profile: OnsetProfile,
    segment_start_offset_seconds: f64,
) -> Result<DetectionResult> {
    if !config.decibel_threshold.is_finite() {
        return Err(Error::NonFiniteThreshold {
            value: config.decibel_threshold,
        });
    }
    if config.max_frequency_hz > gram.nyquist_hz() {
        return Err(Error::FrequencyBoundExceedsNyquist {
            max_frequency_hz: config.max_frequency_hz,
            nyquist_hz: gram.nyquist_hz(),
        });
    }

    let n_frames = gram.n_frames();
    let mut temporal_intensity = vec![0.0; n_frames];
    let mut events: Vec<AcousticEvent> = Vec::new();

    let min_bin = gram.bin_from_frequency(config.min_frequency_hz);
    let max_bin = gram.bin_from_frequency(config.max_frequency_hz).min(gram.n_bins());

    // An unsatisfiable band yields zero events rather than an error.
    if min_bin >= max_bin || n_frames < 3 {
        return Ok(DetectionResult {
            events,
            temporal_intensity,
        });
    }

    let values = gram.values();
    let threshold = config.decibel_threshold;
    // Frequency of bin 0 of the slice handed to the score-array scan.
    let slice_min_frequency_hz = gram.frequency_from_bin(min_bin);
    let mut slice = vec![0.0; max_bin - min_bin];

    // First and last frame excluded: the profile needs both neighbours.
    for t in 1..n_frames - 1 {
        let mut slice_max = f64::NEG_INFINITY;
        for (k, bin) in (min_bin..max_bin).enumerate() {
            let prev = values[[t - 1, bin]];
            let current = values[[t, bin]];
            let next = values[[t + 1, bin]];

            slice[k] = if profile.qualifies(prev, current, next, threshold) {
                current.max(0.0)
            } else {
                0.0
            };
            slice_max = slice_max.max(slice[k]);
        }

        if slice_max < threshold {
            continue;
        }

        let frame_events = score_array_to_events(
            &slice,
            slice_min_frequency_hz,
            gram.frames_per_second(),
            gram.bin_width_hz(),
            threshold,
            config.min_bandwidth_hz,
            config.max_bandwidth_hz,
            t,
            segment_start_offset_seconds,
        );

        for event in &frame_events {
            temporal_intensity[t] += event.raw_score;
        }
        events.extend(frame_events);
    }

    let raw_count = events.len();
    if config.combine_proximal_similar_events {
        events = combine_similar_proximal_events(
            events,
            config.start_time_tolerance_seconds,
            config.frequency_tolerance_hz,
        );
    }
    debug!(
        "profile scan ({:?}): {} frames, {} raw events, {} after merge",
        profile,
        n_frames,
        raw_count,
        events.len()
    );

    Ok(DetectionResult {
        events,
        temporal_intensity,
    })
}

/// Detect sharp-onset click events, labelling results `"Click"`.
pub fn spectrogram_to_clicks(
    gram: &SpectrogramMatrix,
    config: &DetectionConfig,
    segment_start_offset_seconds: f64,
) -> Result<DetectionResult> {
    let mut result = detect_events(gram, config, OnsetProfile::Click, segment_start_offset_seconds)?;
    for event in &mut result.events {
        event.name = Some("Click".to_string());
    }
    Ok(result)
}

/// Detect sustained tonal whistle events, labelling results `"Whistle"`.
pub fn spectrogram_to_whistles(
    gram: &SpectrogramMatrix,
    config: &DetectionConfig,
    segment_start_offset_seconds: f64,
) -> Result<DetectionResult> {
    let mut result = detect_events(
        gram,
        config,
        OnsetProfile::Whistle,
        segment_start_offset_seconds,
    )?;
    for event in &mut result.events {
        event.name = Some("Whistle".to_string());
    }
    Ok(result)
}

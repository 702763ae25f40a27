//! Conversion of a 1-D intensity slice into frequency-bounded events.
//!
//! This is the innermost routine of the detection pipeline: one spectral
//! slice (the per-frame intensity values produced by an onset/decay profile
//! pass) comes in, zero or more [`AcousticEvent`]s come out.
//!
//! # Algorithm
//!
//! A single left-to-right scan with a two-bin look-ahead:
//!
//! 1. Crossing **up** through the decibel threshold opens a run and records
//!    the start bin.
//! 2. While inside a run, a value at/below the threshold does not close it
//!    immediately: the mean of the current bin and the next two bins is
//!    taken first. If that mean is still at/above the threshold, the dip is
//!    a plateau interior to a wider event and the scan continues. This keeps
//!    one broad event from splitting into many narrow fragments.
//! 3. A genuine close computes the bandwidth from the bin span; candidates
//!    outside the configured bandwidth range are discarded, everything else
//!    is emitted as an event and the scan continues looking for further runs.
//!
//! The scan stops two bins before the end to keep the look-ahead in bounds;
//! a run still open at that point is dropped without emitting an event.

use crate::event::{AcousticEvent, MAX_SCORE_MULTIPLIER};

/// Convert one spectral slice of intensity values into acoustic events.
///
/// # Arguments
///
/// * `scores` - Non-negative intensity values, one per frequency bin;
///   `scores[0]` corresponds to `min_frequency_hz`
/// * `min_frequency_hz` - Frequency of bin 0 of the slice
/// * `frames_per_second` - Frame rate of the source spectrogram
/// * `bin_width_hz` - Frequency bin width in Hz
/// * `decibel_threshold` - Intensity cutoff opening and closing runs
/// * `min_bandwidth_hz` / `max_bandwidth_hz` - Accepted bandwidth range
/// * `frame_number` - Index of the frame being scanned (fixes event timing)
/// * `segment_start_offset_seconds` - Absolute anchor of the segment
///
/// # Returns
///
/// Ordered sequence of accepted events, possibly empty. Emitted events have
/// a fixed duration of two frame periods and start at
/// `frame_number / frames_per_second`.
#[allow(clippy::too_many_arguments)]
pub fn score_array_to_events(
    scores: &[f64],
    min_frequency_hz: f64,
    frames_per_second: f64,
    bin_width_hz: f64,
    decibel_threshold: f64,
    min_bandwidth_hz: f64,
    max_bandwidth_hz: f64,
    frame_number: usize,
    segment_start_offset_seconds: f64,
) -> Vec<AcousticEvent> {
    let mut events = Vec::new();
    if scores.len() < 3 || !decibel_threshold.is_finite() {
        return events;
    }

    let max_possible_score = MAX_SCORE_MULTIPLIER * decibel_threshold;
    let event_start_seconds = frame_number as f64 / frames_per_second;
    let event_duration_seconds = 2.0 / frames_per_second;

    let mut in_event = false;
    let mut start_bin = 0usize;

    // Stop 2 bins early: the plateau test reads scores[i + 1] and scores[i + 2].
    for i in 0..scores.len() - 2 {
        if !in_event && scores[i] >= decibel_threshold {
            // Up-crossing: open a run.
            in_event = true;
            start_bin = i;
        } else if in_event && scores[i] <= decibel_threshold {
            // Plateau check before closing: average the current bin with the
            // next two. Still at/above threshold means this dip is interior
            // to a wider event.
            let look_ahead = (scores[i] + scores[i + 1] + scores[i + 2]) / 3.0;
            if look_ahead >= decibel_threshold {
                continue;
            }

            in_event = false;

            let bandwidth_hz = (i - start_bin) as f64 * bin_width_hz;
            if bandwidth_hz <= 0.0
                || bandwidth_hz < min_bandwidth_hz
                || bandwidth_hz > max_bandwidth_hz
            {
                continue;
            }

            // Score over the bins above threshold; the closing bin is excluded.
            let run = &scores[start_bin..i];
            let raw_score = run.iter().sum::<f64>() / run.len() as f64;
            let max_score_in_event = run.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v));
            let normalized_score = if max_possible_score > 0.0 {
                (raw_score / max_possible_score).min(1.0)
            } else {
                0.0
            };

            let low_frequency_hz = min_frequency_hz + start_bin as f64 * bin_width_hz;
            events.push(AcousticEvent {
                segment_start_offset_seconds,
                event_start_seconds,
                event_duration_seconds,
                low_frequency_hz,
                high_frequency_hz: low_frequency_hz + bandwidth_hz,
                raw_score,
                normalized_score,
                max_possible_score,
                max_score_in_event,
                name: None,
            });
        }
    }

    // A run still open here never saw a proper close; it is dropped.
    events
}

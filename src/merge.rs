//! Fusion of temporally/spectrally proximal events of the same type.
//!
//! Detection emits one short event per frame a profile fires in, so a single
//! animal call commonly appears as a cluster of near-identical rectangles.
//! [`combine_similar_proximal_events`] collapses such a cluster into one
//! event spanning the union of its members' time and frequency extents.
//!
//! Merging runs to a fixed point and is idempotent: re-running the merge on
//! its own output changes nothing, because at the fixed point no remaining
//! pair qualifies.

use crate::event::AcousticEvent;

/// Two events are proximal-similar when their start times lie within the
/// time tolerance AND a corresponding frequency bound (low-low or high-high)
/// lies within the frequency tolerance.
fn proximal_similar(
    a: &AcousticEvent,
    b: &AcousticEvent,
    start_time_tolerance_seconds: f64,
    frequency_tolerance_hz: f64,
) -> bool {
    let starts_close =
        (a.event_start_seconds - b.event_start_seconds).abs() <= start_time_tolerance_seconds;
    let lows_close =
        (a.low_frequency_hz - b.low_frequency_hz).abs() <= frequency_tolerance_hz;
    let highs_close =
        (a.high_frequency_hz - b.high_frequency_hz).abs() <= frequency_tolerance_hz;

    starts_close && (lows_close || highs_close)
}

/// Fuse two events into one spanning the union of their extents.
///
/// Score fields become the max over the pair; the label of the first event
/// is kept (merged groups share a type by contract).
fn fuse(a: &AcousticEvent, b: &AcousticEvent) -> AcousticEvent {
    let start = a.event_start_seconds.min(b.event_start_seconds);
    let end = a.event_end_seconds().max(b.event_end_seconds());

    AcousticEvent {
        segment_start_offset_seconds: a.segment_start_offset_seconds,
        event_start_seconds: start,
        event_duration_seconds: end - start,
        low_frequency_hz: a.low_frequency_hz.min(b.low_frequency_hz),
        high_frequency_hz: a.high_frequency_hz.max(b.high_frequency_hz),
        raw_score: a.raw_score.max(b.raw_score),
        normalized_score: a.normalized_score.max(b.normalized_score),
        max_possible_score: a.max_possible_score.max(b.max_possible_score),
        max_score_in_event: a.max_score_in_event.max(b.max_score_in_event),
        name: a.name.clone().or_else(|| b.name.clone()),
    }
}

/// Collapse proximal-similar events until no further pair qualifies.
///
/// Pairs are scanned in index order and the lowest-index qualifying pair is
/// fused first, into the position of its first member; the scan then
/// restarts. The loop terminates because every fusion shortens the list.
///
/// # Arguments
///
/// * `events` - Event list to compact (same event type throughout)
/// * `start_time_tolerance_seconds` - Maximum start-time difference
/// * `frequency_tolerance_hz` - Maximum difference of a corresponding
///   frequency bound
///
/// # Returns
///
/// A possibly shorter list in which no two events are proximal-similar.
/// Original instances of a merged group are superseded by the fused event.
pub fn combine_similar_proximal_events(
    mut events: Vec<AcousticEvent>,
    start_time_tolerance_seconds: f64,
    frequency_tolerance_hz: f64,
) -> Vec<AcousticEvent> {
    loop {
        let mut merged = None;

        'scan: for i in 0..events.len() {
            for j in i + 1..events.len() {
                if proximal_similar(
                    &events[i],
                    &events[j],
                    start_time_tolerance_seconds,
                    frequency_tolerance_hz,
                ) {
                    merged = Some((i, j));
                    break 'scan;
                }
            }
        }

        match merged {
            Some((i, j)) => {
                let fused = fuse(&events[i], &events[j]);
                events[i] = fused;
                events.remove(j);
            }
            None => return events,
        }
    }
}

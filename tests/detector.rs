//! Click/whistle detection over synthetic spectrograms.

mod common;

use common::{gram_from_fn, silent_gram, FPS};
use ecodetect::{
    detect_events, spectrogram_to_clicks, spectrogram_to_whistles, DetectionConfig, Error,
    OnsetProfile,
};

fn band_config(threshold: f64, min_bw: f64, max_bw: f64) -> DetectionConfig {
    DetectionConfig {
        min_frequency_hz: 0.0,
        max_frequency_hz: 5000.0,
        decibel_threshold: threshold,
        min_bandwidth_hz: min_bw,
        max_bandwidth_hz: max_bw,
        combine_proximal_similar_events: false,
        start_time_tolerance_seconds: 1.0,
        frequency_tolerance_hz: 100.0,
    }
}

/// One impulsive frame at t = 5, bins 10..20, silence around it.
fn impulse_gram() -> ecodetect::SpectrogramMatrix {
    gram_from_fn(20, 50, |t, b| {
        if t == 5 && (10..20).contains(&b) {
            10.0
        } else {
            0.0
        }
    })
}

/// A tone at bins 10..13 sustained over frames 3..=9.
fn tone_gram() -> ecodetect::SpectrogramMatrix {
    gram_from_fn(20, 50, |t, b| {
        if (3..=9).contains(&t) && (10..13).contains(&b) {
            10.0
        } else {
            0.0
        }
    })
}

#[test]
fn silence_detects_nothing() {
    let gram = silent_gram(30, 64);
    let config = band_config(6.0, 0.0, 10_000.0);

    let clicks = spectrogram_to_clicks(&gram, &config, 0.0).unwrap();
    let whistles = spectrogram_to_whistles(&gram, &config, 0.0).unwrap();

    assert!(clicks.events.is_empty());
    assert!(whistles.events.is_empty());
    assert_eq!(clicks.temporal_intensity.len(), 30);
    assert!(clicks.temporal_intensity.iter().all(|&v| v == 0.0));
}

#[test]
fn click_profile_finds_impulsive_frame() {
    let gram = impulse_gram();
    let config = band_config(6.0, 200.0, 2000.0);

    let result = spectrogram_to_clicks(&gram, &config, 0.0).unwrap();
    assert_eq!(result.events.len(), 1);

    let e = &result.events[0];
    assert_eq!(e.name.as_deref(), Some("Click"));
    assert!((e.event_start_seconds - 5.0 / FPS).abs() < 1e-9);
    assert!((e.low_frequency_hz - 1000.0).abs() < 1e-9);
    assert!((e.high_frequency_hz - 2000.0).abs() < 1e-9);
    assert!((e.raw_score - 10.0).abs() < 1e-9);

    // Temporal intensity carries the accepted raw score at the firing frame.
    assert!((result.temporal_intensity[5] - 10.0).abs() < 1e-9);
    let elsewhere: f64 = result
        .temporal_intensity
        .iter()
        .enumerate()
        .filter(|(t, _)| *t != 5)
        .map(|(_, &v)| v)
        .sum();
    assert_eq!(elsewhere, 0.0);
}

#[test]
fn whistle_profile_rejects_impulsive_frame() {
    let gram = impulse_gram();
    let config = band_config(6.0, 200.0, 2000.0);

    // A one-frame impulse is not sustained; the whistle profile sees nothing.
    let result = spectrogram_to_whistles(&gram, &config, 0.0).unwrap();
    assert!(result.events.is_empty());
}

#[test]
fn whistle_profile_finds_sustained_tone() {
    let gram = tone_gram();
    let mut config = band_config(6.0, 100.0, 1000.0);
    config.combine_proximal_similar_events = true;

    let result = spectrogram_to_whistles(&gram, &config, 0.0).unwrap();
    // Interior tone frames each fire; the merge pass collapses them.
    assert_eq!(result.events.len(), 1);

    let e = &result.events[0];
    assert_eq!(e.name.as_deref(), Some("Whistle"));
    assert!((e.low_frequency_hz - 1000.0).abs() < 1e-9);
    assert!((e.high_frequency_hz - 1300.0).abs() < 1e-9);
    assert!(e.event_duration_seconds > 0.0);
}

#[test]
fn click_profile_fires_only_at_tone_onset() {
    let gram = tone_gram();
    let config = band_config(6.0, 100.0, 1000.0);

    // Interior tone frames have an above-threshold previous frame, so only
    // the onset frame (t = 3) can qualify under the click profile.
    let result = detect_events(&gram, &config, OnsetProfile::Click, 0.0).unwrap();
    for e in &result.events {
        assert!((e.event_start_seconds - 3.0 / FPS).abs() < 1e-9);
    }
}

#[test]
fn detection_respects_frequency_band() {
    let gram = impulse_gram();
    // Impulse lives at 1000-2000 Hz; search 3000-5000 Hz only.
    let mut config = band_config(6.0, 100.0, 2000.0);
    config.min_frequency_hz = 3000.0;

    let result = spectrogram_to_clicks(&gram, &config, 0.0).unwrap();
    assert!(result.events.is_empty());
}

#[test]
fn emitted_events_satisfy_bandwidth_and_score_invariants() {
    let gram = gram_from_fn(40, 50, |t, b| {
        // A few impulsive frames of varying extents.
        let firing = matches!((t, b), (5, 8..=20) | (14, 25..=30) | (29, 5..=45));
        if firing {
            7.0 + (b % 5) as f64
        } else {
            0.0
        }
    });
    let config = band_config(6.0, 200.0, 4000.0);
    let result = spectrogram_to_clicks(&gram, &config, 0.0).unwrap();
    assert!(!result.events.is_empty());

    for e in &result.events {
        assert!(e.low_frequency_hz < e.high_frequency_hz);
        assert!(e.event_duration_seconds > 0.0);
        assert!((0.0..=1.0).contains(&e.normalized_score));
        assert!(
            e.bandwidth_hz() >= config.min_bandwidth_hz
                && e.bandwidth_hz() <= config.max_bandwidth_hz
        );
    }
}

#[test]
fn segment_offset_is_carried_not_folded() {
    let gram = impulse_gram();
    let config = band_config(6.0, 200.0, 2000.0);

    let result = spectrogram_to_clicks(&gram, &config, 60.0).unwrap();
    let e = &result.events[0];
    assert_eq!(e.segment_start_offset_seconds, 60.0);
    // Start stays segment-relative.
    assert!((e.event_start_seconds - 0.5).abs() < 1e-9);
}

#[test]
fn band_past_nyquist_fails_fast() {
    let gram = silent_gram(10, 20); // Nyquist 2000 Hz on the test scale
    let mut config = band_config(6.0, 0.0, 1000.0);
    config.max_frequency_hz = 3000.0;

    let err = spectrogram_to_clicks(&gram, &config, 0.0).unwrap_err();
    assert!(matches!(err, Error::FrequencyBoundExceedsNyquist { .. }));
}

#[test]
fn non_finite_threshold_fails_fast() {
    let gram = silent_gram(10, 20);
    let mut config = band_config(f64::NAN, 0.0, 1000.0);
    config.max_frequency_hz = 1000.0;

    let err = spectrogram_to_clicks(&gram, &config, 0.0).unwrap_err();
    assert!(matches!(err, Error::NonFiniteThreshold { .. }));
}

#[test]
fn inverted_frequency_range_silently_finds_nothing() {
    let gram = impulse_gram();
    let mut config = band_config(6.0, 100.0, 2000.0);
    config.min_frequency_hz = 4000.0;
    config.max_frequency_hz = 1000.0;

    let result = spectrogram_to_clicks(&gram, &config, 0.0).unwrap();
    assert!(result.events.is_empty());
    assert_eq!(result.temporal_intensity.len(), gram.n_frames());
}

#[test]
fn inverted_bandwidth_range_silently_finds_nothing() {
    let gram = impulse_gram();
    let config = band_config(6.0, 2000.0, 100.0);

    let result = spectrogram_to_clicks(&gram, &config, 0.0).unwrap();
    assert!(result.events.is_empty());
}

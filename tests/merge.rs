//! Fixed-point merging of proximal-similar events.

mod common;

use common::make_event;
use ecodetect::combine_similar_proximal_events;

const TIME_TOL: f64 = 1.0;
const FREQ_TOL: f64 = 100.0;

#[test]
fn empty_and_singleton_lists_pass_through() {
    assert!(combine_similar_proximal_events(vec![], TIME_TOL, FREQ_TOL).is_empty());

    let one = vec![make_event(1.0, 500.0, 900.0, 8.0)];
    let merged = combine_similar_proximal_events(one.clone(), TIME_TOL, FREQ_TOL);
    assert_eq!(merged, one);
}

#[test]
fn proximal_similar_pair_fuses_to_union_extents() {
    let a = make_event(1.0, 500.0, 900.0, 8.0);
    let b = make_event(1.5, 550.0, 1100.0, 12.0);

    let merged = combine_similar_proximal_events(vec![a, b], TIME_TOL, FREQ_TOL);
    assert_eq!(merged.len(), 1);

    let e = &merged[0];
    assert!((e.event_start_seconds - 1.0).abs() < 1e-9);
    // Union end: 1.5 + 0.2 duration.
    assert!((e.event_end_seconds() - 1.7).abs() < 1e-9);
    assert!((e.low_frequency_hz - 500.0).abs() < 1e-9);
    assert!((e.high_frequency_hz - 1100.0).abs() < 1e-9);
    // Score fields are the max over the merged group.
    assert!((e.raw_score - 12.0).abs() < 1e-9);
    assert!((e.max_score_in_event - 12.0).abs() < 1e-9);
}

#[test]
fn distant_starts_do_not_merge() {
    let a = make_event(1.0, 500.0, 900.0, 8.0);
    let b = make_event(3.0, 500.0, 900.0, 8.0);

    let merged = combine_similar_proximal_events(vec![a, b], TIME_TOL, FREQ_TOL);
    assert_eq!(merged.len(), 2);
}

#[test]
fn distant_frequency_bounds_do_not_merge() {
    // Starts coincide but neither the low-low nor the high-high bound pair
    // is within tolerance.
    let a = make_event(1.0, 500.0, 900.0, 8.0);
    let b = make_event(1.2, 1500.0, 2400.0, 8.0);

    let merged = combine_similar_proximal_events(vec![a, b], TIME_TOL, FREQ_TOL);
    assert_eq!(merged.len(), 2);
}

#[test]
fn one_matching_bound_suffices() {
    // Lows differ by 800 Hz, highs by 50 Hz: the high-high bound qualifies.
    let a = make_event(1.0, 500.0, 2000.0, 8.0);
    let b = make_event(1.2, 1300.0, 2050.0, 9.0);

    let merged = combine_similar_proximal_events(vec![a, b], TIME_TOL, FREQ_TOL);
    assert_eq!(merged.len(), 1);
}

#[test]
fn chained_neighbours_collapse_via_fixed_point() {
    // a~b and b~c but a and c alone are too far apart in frequency; the
    // fused ab event then reaches c.
    let a = make_event(1.0, 500.0, 700.0, 8.0);
    let b = make_event(1.1, 590.0, 790.0, 8.0);
    let c = make_event(1.2, 680.0, 880.0, 8.0);

    let merged = combine_similar_proximal_events(vec![a, b, c], TIME_TOL, FREQ_TOL);
    assert_eq!(merged.len(), 1);
    assert!((merged[0].low_frequency_hz - 500.0).abs() < 1e-9);
    assert!((merged[0].high_frequency_hz - 880.0).abs() < 1e-9);
}

#[test]
fn merge_is_idempotent() {
    let events = vec![
        make_event(0.4, 1000.0, 1300.0, 10.0),
        make_event(0.5, 1000.0, 1300.0, 10.0),
        make_event(0.6, 1010.0, 1280.0, 11.0),
        make_event(5.0, 1000.0, 1300.0, 9.0),
        make_event(5.1, 3000.0, 3500.0, 7.0),
    ];

    let once = combine_similar_proximal_events(events, TIME_TOL, FREQ_TOL);
    let twice = combine_similar_proximal_events(once.clone(), TIME_TOL, FREQ_TOL);
    assert_eq!(once, twice);

    // At the fixed point no remaining pair is proximal-similar.
    for (i, a) in once.iter().enumerate() {
        for b in once.iter().skip(i + 1) {
            let starts_close = (a.event_start_seconds - b.event_start_seconds).abs() <= TIME_TOL;
            let lows_close = (a.low_frequency_hz - b.low_frequency_hz).abs() <= FREQ_TOL;
            let highs_close = (a.high_frequency_hz - b.high_frequency_hz).abs() <= FREQ_TOL;
            assert!(!(starts_close && (lows_close || highs_close)));
        }
    }
}

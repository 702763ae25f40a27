//! Run the detectors and the chunk classifier over synthetic material.

use ecodetect::{
    classify_chunks, spectrogram_to_clicks, spectrogram_to_whistles, DetectionConfig,
    SpectrogramMatrix,
};
use ndarray::Array2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "=".repeat(60));
    println!("ecodetect demo: synthetic spectrogram");
    println!("{}", "=".repeat(60));

    // 200 frames × 128 bins at 20 frames/s and 100 Hz bins, with an
    // impulsive click at frame 50 and a whistle over frames 100..140.
    let n_frames = 200;
    let n_bins = 128;
    let values = Array2::from_shape_fn((n_frames, n_bins), |(t, b)| {
        let click = t == 50 && (20..35).contains(&b);
        let whistle = (100..140).contains(&t) && (40..44).contains(&b);
        if click || whistle {
            12.0
        } else {
            0.0
        }
    });
    let gram = SpectrogramMatrix::new(values, 20.0, 100.0, 12_800.0)?;
    println!(
        "Spectrogram: {} frames, {} bins, {:.1} Hz bin width",
        gram.n_frames(),
        gram.n_bins(),
        gram.bin_width_hz()
    );

    // Click detection
    print!("  Clicks... ");
    let clicks = spectrogram_to_clicks(&gram, &DetectionConfig::click(), 0.0)?;
    println!("OK ({} events)", clicks.events.len());
    for e in &clicks.events {
        println!(
            "    {:>7} {:6.2}s +{:.2}s  {:6.0}-{:6.0} Hz  score {:.1}",
            e.name.as_deref().unwrap_or("?"),
            e.event_start_seconds,
            e.event_duration_seconds,
            e.low_frequency_hz,
            e.high_frequency_hz,
            e.raw_score
        );
    }

    // Whistle detection
    print!("  Whistles... ");
    let whistles = spectrogram_to_whistles(&gram, &DetectionConfig::whistle(), 0.0)?;
    println!("OK ({} events)", whistles.events.len());
    for e in &whistles.events {
        println!(
            "    {:>7} {:6.2}s +{:.2}s  {:6.0}-{:6.0} Hz  score {:.1}",
            e.name.as_deref().unwrap_or("?"),
            e.event_start_seconds,
            e.event_duration_seconds,
            e.low_frequency_hz,
            e.high_frequency_hz,
            e.raw_score
        );
    }

    // Rain/cicada screening over a spiky synthetic envelope.
    print!("  Chunk screening... ");
    let envelope: Vec<f64> = (0..1200)
        .map(|i| if i % 3 == 0 { 0.4 } else { 0.05 })
        .collect();
    let amplitude = Array2::from_elem((1200, n_bins), 0.02);
    let summary = classify_chunks(&envelope, 60.0, 0.05, &amplitude, 1000.0, 4000.0, 100.0)?;
    println!("OK ({} chunks)", summary.total_chunks());
    for (label, fraction) in summary.fractions() {
        println!("    {:<8} {:.3}", label.as_str(), fraction);
    }

    Ok(())
}

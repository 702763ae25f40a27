//! Chunk-level descriptive statistics and rain/cicada screening.
//!
//! Long environmental recordings are screened before any per-event analysis:
//! steady rain and cicada choruses swamp the detectors, so recordings are
//! partitioned into fixed 10-second chunks, a battery of descriptive
//! statistics is computed for each, and a deterministic decision rule labels
//! every chunk `Rain`, `Cicadas`, or `None`.
//!
//! The classifier consumes the same envelope/spectrogram pair the detectors
//! do, but runs independently of them. All computations are pure functions:
//! [`ChunkIndices`] is an immutable value record returned whole, never a
//! struct mutated in place.
//!
//! # Numeric degeneracies
//!
//! - Entropy of an all-zero sequence is defined as 1.0 (maximal flatness),
//!   not NaN.
//! - The spike index of an envelope with no local peaks is 0.0.
//! - The last chunk is clipped to the available envelope length; a chunk
//!   shorter than 50 samples is skipped entirely but still counted in the
//!   recording-level label-fraction denominator.

use log::debug;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of one analysis chunk in seconds.
pub const CHUNK_DURATION_SECONDS: f64 = 10.0;

/// Chunks with fewer envelope samples than this are skipped.
pub const MIN_CHUNK_SAMPLES: usize = 50;

/// Noise-reduced dB level at/above which a frame counts as active.
const ACTIVITY_THRESHOLD_DB: f64 = 3.0;

/// Peak-to-neighbour amplitude difference above which a spike is "sharp".
const SPIKE_DIFFERENCE_THRESHOLD: f64 = 0.05;

/// Spike index above which the rain branch of the rule is taken.
const RAIN_SPIKE_INDEX_THRESHOLD: f64 = 0.2;

/// High-band cover required to confirm rain once the spike index fires.
const RAIN_HIGH_COVER_THRESHOLD: f64 = 0.24;

/// Spectral entropy below which cicadas are suspected.
const CICADA_SPECTRAL_ENTROPY_THRESHOLD: f64 = 0.6;

/// Background noise (dB) above which cicadas are suspected.
const CICADA_BACKGROUND_NOISE_DB: f64 = -20.0;

/// Amplitude above which a spectrogram cell counts as spectrally active.
const SPECTRAL_ACTIVITY_THRESHOLD: f64 = 0.015;

/// Bin count of the histogram used for the modal-background estimate.
const NOISE_HISTOGRAM_BINS: usize = 100;

/// Floor used in place of log(0) when converting amplitudes to dB.
const MIN_DB: f64 = -80.0;

/// Descriptive statistics for one 10-second chunk.
///
/// Entropy and coverage values lie in [0, 1]; `snr`, `background_noise_db`,
/// and `average_signal_db` are decibel-scale and may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkIndices {
    /// Maximum noise-reduced envelope level, in dB.
    pub snr: f64,

    /// Modal envelope level, in dB.
    pub background_noise_db: f64,

    /// Fraction of frames whose noise-reduced level is at/above 3 dB.
    pub activity_fraction: f64,

    /// Sharp peak-to-neighbour differences ÷ all peak-to-neighbour
    /// differences; 0 when the envelope has no local peaks.
    pub spike_index: f64,

    /// 20·log10 of the mean envelope amplitude.
    pub average_signal_db: f64,

    /// Normalized entropy of the squared envelope.
    pub temporal_entropy: f64,

    /// Fraction of spectrally active cells below the low-frequency bound.
    pub low_freq_cover_fraction: f64,

    /// Fraction of spectrally active cells between the bounds.
    pub mid_freq_cover_fraction: f64,

    /// Fraction of spectrally active cells above the mid-frequency bound.
    pub high_freq_cover_fraction: f64,

    /// Normalized entropy of the average spectrum above the low-frequency
    /// bound; 1.0 when numerically undefined.
    pub spectral_entropy: f64,

    /// Mean per-bin acoustic complexity over the same sub-band.
    pub acoustic_complexity_index: f64,
}

/// Label assigned to a classified chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkLabel {
    /// Broadband spiky envelope with high-frequency cover: rain.
    Rain,

    /// Low spectral entropy over a loud background: cicada chorus.
    Cicadas,

    /// Neither screening condition met.
    None,
}

impl ChunkLabel {
    /// The label string used by downstream reporting.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkLabel::Rain => "Rain",
            ChunkLabel::Cicadas => "Cicadas",
            ChunkLabel::None => "none",
        }
    }
}

impl std::fmt::Display for ChunkLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indices and label for one classified chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkClassification {
    /// The chunk's descriptive statistics.
    pub indices: ChunkIndices,

    /// Label assigned by the decision rule.
    pub label: ChunkLabel,
}

/// Recording-level classification summary.
///
/// `chunks` holds one entry per scanned chunk in order; `None` marks a chunk
/// skipped for being shorter than [`MIN_CHUNK_SAMPLES`]. Skipped chunks stay
/// in the denominator of every label fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSummary {
    /// Per-chunk outcome, in scan order.
    pub chunks: Vec<Option<ChunkClassification>>,

    /// Total duration of the classified recording, in seconds.
    pub total_duration_seconds: f64,
}

impl ChunkSummary {
    /// Number of chunks the scan emitted, including skipped ones.
    #[inline]
    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Fraction of chunks carrying the given label.
    ///
    /// The denominator is the unfiltered chunk count, so the three label
    /// fractions sum to at most 1.0 (less when chunks were skipped).
    pub fn fraction(&self, label: ChunkLabel) -> f64 {
        if self.chunks.is_empty() {
            return 0.0;
        }
        let count = self
            .chunks
            .iter()
            .filter(|c| matches!(c, Some(c) if c.label == label))
            .count();
        count as f64 / self.chunks.len() as f64
    }

    /// The label→fraction mapping for all three labels.
    pub fn fractions(&self) -> [(ChunkLabel, f64); 3] {
        [
            (ChunkLabel::Rain, self.fraction(ChunkLabel::Rain)),
            (ChunkLabel::Cicadas, self.fraction(ChunkLabel::Cicadas)),
            (ChunkLabel::None, self.fraction(ChunkLabel::None)),
        ]
    }
}

/// Convert an amplitude to dB with a fixed floor in place of log(0).
#[inline]
fn amplitude_to_db(amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        (20.0 * amplitude.log10()).max(MIN_DB)
    } else {
        MIN_DB
    }
}

/// Estimate the modal (most common) value of a dB sequence.
///
/// A 100-bin histogram spans the finite value range; the centre of the
/// fullest bin is the mode. Ties resolve to the lowest bin.
fn modal_db(db: &[f64]) -> f64 {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in db {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return MIN_DB;
    }
    if hi <= lo {
        return lo;
    }

    let width = (hi - lo) / NOISE_HISTOGRAM_BINS as f64;
    let mut counts = [0usize; NOISE_HISTOGRAM_BINS];
    for &v in db {
        let idx = (((v - lo) / width) as usize).min(NOISE_HISTOGRAM_BINS - 1);
        counts[idx] += 1;
    }

    let mut mode_bin = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[mode_bin] {
            mode_bin = i;
        }
    }
    lo + (mode_bin as f64 + 0.5) * width
}

/// Normalized Shannon entropy of a non-negative weight sequence.
///
/// Defined as 1.0 (maximal flatness) when the sequence is numerically
/// degenerate: fewer than two entries or a non-positive sum.
fn normalized_entropy(weights: &[f64]) -> f64 {
    if weights.len() < 2 {
        return 1.0;
    }
    let sum: f64 = weights.iter().sum();
    if !(sum > 0.0) {
        return 1.0;
    }

    let mut entropy = 0.0;
    for &w in weights {
        let p = w / sum;
        if p > 0.0 {
            entropy -= p * p.ln();
        }
    }
    (entropy / (weights.len() as f64).ln()).min(1.0)
}

/// Ratio of sharp peak-to-neighbour differences to all peak-to-neighbour
/// differences over the envelope's interior local maxima.
///
/// Each peak contributes two differences (to its left and right neighbour).
/// Returns exactly 0.0 when no local peaks exist.
fn spike_index(envelope: &[f64]) -> f64 {
    let mut total = 0usize;
    let mut sharp = 0usize;

    for i in 1..envelope.len().saturating_sub(1) {
        if envelope[i] > envelope[i - 1] && envelope[i] > envelope[i + 1] {
            for diff in [envelope[i] - envelope[i - 1], envelope[i] - envelope[i + 1]] {
                total += 1;
                if diff > SPIKE_DIFFERENCE_THRESHOLD {
                    sharp += 1;
                }
            }
        }
    }

    if total == 0 {
        0.0
    } else {
        sharp as f64 / total as f64
    }
}

/// Fraction of cells in a bin range whose amplitude exceeds the spectral
/// activity threshold. Empty bands cover nothing.
fn band_cover_fraction(gram: &ArrayView2<'_, f64>, bin_range: std::ops::Range<usize>) -> f64 {
    let n_frames = gram.nrows();
    let n_bins = bin_range.len();
    if n_frames == 0 || n_bins == 0 {
        return 0.0;
    }

    let mut active = 0usize;
    for row in gram.rows() {
        for bin in bin_range.clone() {
            if row[bin] > SPECTRAL_ACTIVITY_THRESHOLD {
                active += 1;
            }
        }
    }
    active as f64 / (n_frames * n_bins) as f64
}

/// Compute the full index battery for one chunk.
///
/// # Arguments
///
/// * `envelope` - Signal envelope frames of the chunk
/// * `gram` - Amplitude spectrogram rows covering the same frames
/// * `low_bin` - First bin of the mid band: `ceil(low_freq_bound / bin_width)`
/// * `mid_bin` - First bin of the high band: `ceil(mid_freq_bound / bin_width)`
pub fn compute_chunk_indices(
    envelope: &[f64],
    gram: &ArrayView2<'_, f64>,
    low_bin: usize,
    mid_bin: usize,
) -> ChunkIndices {
    let n = envelope.len();

    // Envelope statistics: dB curve, modal background, noise-reduced levels.
    let db: Vec<f64> = envelope.iter().map(|&e| amplitude_to_db(e)).collect();
    let background_noise_db = modal_db(&db);
    let noise_reduced: Vec<f64> = db.iter().map(|&v| (v - background_noise_db).max(0.0)).collect();

    let snr = noise_reduced.iter().fold(0.0f64, |m, &v| m.max(v));
    let active = noise_reduced
        .iter()
        .filter(|&&v| v >= ACTIVITY_THRESHOLD_DB)
        .count();
    let activity_fraction = if n > 0 { active as f64 / n as f64 } else { 0.0 };

    let mean_amplitude = if n > 0 {
        envelope.iter().sum::<f64>() / n as f64
    } else {
        0.0
    };
    let average_signal_db = amplitude_to_db(mean_amplitude);

    let energy: Vec<f64> = envelope.iter().map(|&e| e * e).collect();
    let temporal_entropy = normalized_entropy(&energy);

    let spike_index = spike_index(envelope);

    // Spectral statistics over the sub-band above the low-frequency bound.
    let n_bins = gram.ncols();
    let n_frames = gram.nrows();
    let low_bin = low_bin.min(n_bins);
    let mid_bin = mid_bin.clamp(low_bin, n_bins);

    let sub_band = low_bin..n_bins;
    let average_spectrum: Vec<f64> = sub_band
        .clone()
        .map(|bin| {
            if n_frames == 0 {
                0.0
            } else {
                gram.column(bin).sum() / n_frames as f64
            }
        })
        .collect();
    let spectral_entropy = normalized_entropy(&average_spectrum);

    // Per-bin ACI: frame-to-frame variability relative to total bin energy.
    let mut aci_sum = 0.0;
    let mut aci_bins = 0usize;
    for bin in sub_band {
        let column = gram.column(bin);
        let mut delta = 0.0;
        let mut total = 0.0;
        for t in 0..n_frames {
            total += column[t];
            if t + 1 < n_frames {
                delta += (column[t + 1] - column[t]).abs();
            }
        }
        if total > 0.0 {
            aci_sum += delta / total;
        }
        aci_bins += 1;
    }
    let acoustic_complexity_index = if aci_bins > 0 {
        aci_sum / aci_bins as f64
    } else {
        0.0
    };

    ChunkIndices {
        snr,
        background_noise_db,
        activity_fraction,
        spike_index,
        average_signal_db,
        temporal_entropy,
        low_freq_cover_fraction: band_cover_fraction(gram, 0..low_bin),
        mid_freq_cover_fraction: band_cover_fraction(gram, low_bin..mid_bin),
        high_freq_cover_fraction: band_cover_fraction(gram, mid_bin..n_bins),
        spectral_entropy,
        acoustic_complexity_index,
    }
}

/// Apply the ordered rain/cicada decision rule to one chunk's indices.
///
/// 1. `spike_index > 0.2`: a spiky envelope. `Rain` when the high band is
///    also covered (`high_freq_cover_fraction > 0.24`), otherwise `None`.
/// 2. Otherwise, `spectral_entropy < 0.6` over a loud background
///    (`background_noise_db > −20`) means `Cicadas`.
/// 3. Otherwise `None`.
pub fn classify_chunk(indices: &ChunkIndices) -> ChunkLabel {
    if indices.spike_index > RAIN_SPIKE_INDEX_THRESHOLD {
        if indices.high_freq_cover_fraction > RAIN_HIGH_COVER_THRESHOLD {
            ChunkLabel::Rain
        } else {
            ChunkLabel::None
        }
    } else if indices.spectral_entropy < CICADA_SPECTRAL_ENTROPY_THRESHOLD
        && indices.background_noise_db > CICADA_BACKGROUND_NOISE_DB
    {
        ChunkLabel::Cicadas
    } else {
        ChunkLabel::None
    }
}

/// Partition a recording into 10-second chunks and classify each.
///
/// The envelope and the amplitude spectrogram come from the same framing
/// stage, so envelope index `i` and spectrogram row `i` describe the same
/// frame; chunk boundaries apply to both. The last chunk is clipped to the
/// available length, and chunks shorter than [`MIN_CHUNK_SAMPLES`] are
/// skipped but remain in the fraction denominator.
///
/// # Arguments
///
/// * `envelope` - Signal amplitude per frame for the whole recording
/// * `total_duration_seconds` - Recording duration (summary metadata)
/// * `frame_step_seconds` - Duration of one frame step
/// * `gram` - Amplitude spectrogram, `[frame, bin]`
/// * `low_freq_bound_hz` / `mid_freq_bound_hz` - Band split boundaries
/// * `bin_width_hz` - Spectrogram frequency bin width
///
/// # Errors
///
/// * [`Error::EmptyEnvelope`] for a zero-length envelope
/// * [`Error::InvalidChunkStep`] for a non-positive frame step
/// * [`Error::EmptySpectrogram`] for a zero-sized matrix
#[allow(clippy::too_many_arguments)]
pub fn classify_chunks(
    envelope: &[f64],
    total_duration_seconds: f64,
    frame_step_seconds: f64,
    gram: &Array2<f64>,
    low_freq_bound_hz: f64,
    mid_freq_bound_hz: f64,
    bin_width_hz: f64,
) -> Result<ChunkSummary> {
    if envelope.is_empty() {
        return Err(Error::EmptyEnvelope);
    }
    if !(frame_step_seconds > 0.0 && frame_step_seconds.is_finite()) {
        return Err(Error::InvalidChunkStep { frame_step_seconds });
    }
    if gram.nrows() == 0 || gram.ncols() == 0 {
        return Err(Error::EmptySpectrogram);
    }
    if !(bin_width_hz > 0.0 && bin_width_hz.is_finite()) {
        return Err(Error::InvalidScale {
            frames_per_second: 1.0 / frame_step_seconds,
            bin_width_hz,
        });
    }

    let chunk_frames = ((CHUNK_DURATION_SECONDS / frame_step_seconds).round() as usize).max(1);
    let low_bin = (low_freq_bound_hz / bin_width_hz).ceil() as usize;
    let mid_bin = (mid_freq_bound_hz / bin_width_hz).ceil() as usize;

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < envelope.len() {
        let end = (start + chunk_frames).min(envelope.len());
        let chunk_envelope = &envelope[start..end];

        if chunk_envelope.len() < MIN_CHUNK_SAMPLES {
            // Too short to yield meaningful statistics; counted, not classified.
            chunks.push(None);
            start = end;
            continue;
        }

        let row_end = end.min(gram.nrows());
        let row_start = start.min(row_end);
        let chunk_gram = gram.slice(ndarray::s![row_start..row_end, ..]);

        let indices = compute_chunk_indices(chunk_envelope, &chunk_gram, low_bin, mid_bin);
        let label = classify_chunk(&indices);
        chunks.push(Some(ChunkClassification { indices, label }));

        start = end;
    }

    let summary = ChunkSummary {
        chunks,
        total_duration_seconds,
    };
    debug!(
        "chunk classification: {} chunks, rain {:.3}, cicadas {:.3}, none {:.3}",
        summary.total_chunks(),
        summary.fraction(ChunkLabel::Rain),
        summary.fraction(ChunkLabel::Cicadas),
        summary.fraction(ChunkLabel::None),
    );
    Ok(summary)
}

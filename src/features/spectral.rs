//! Spectral centroid
//!
//! The centroid is the magnitude-weighted mean frequency of a frame,
//! `Σ f·|X(f)| / Σ |X(f)|`, a standard brightness proxy. Silent frames
//! contribute a centroid of 0 Hz.

use super::spectrum::fft_frequencies;

/// Minimum spectral mass treated as non-silent
const EPSILON: f32 = 1e-10;

/// Centroid of a single magnitude spectrum
///
/// # Arguments
///
/// * `spectrum` - Magnitudes for bins `0..=n_fft/2`
/// * `frequencies` - Bin center frequencies (same length as `spectrum`)
pub fn frame_centroid(spectrum: &[f32], frequencies: &[f32]) -> f32 {
    let magnitude_sum: f32 = spectrum.iter().sum();
    if magnitude_sum <= EPSILON {
        return 0.0;
    }

    let weighted_sum: f32 = spectrum
        .iter()
        .zip(frequencies)
        .map(|(&mag, &freq)| mag * freq)
        .sum();

    weighted_sum / magnitude_sum
}

/// Mean spectral centroid in Hz across all frames of a magnitude spectrogram
pub fn mean_spectral_centroid(magnitudes: &[Vec<f32>], sample_rate: u32, n_fft: usize) -> f32 {
    if magnitudes.is_empty() {
        return 0.0;
    }

    let frequencies = fft_frequencies(sample_rate, n_fft);
    let total: f32 = magnitudes
        .iter()
        .map(|frame| frame_centroid(frame, &frequencies))
        .sum();
    let centroid = total / magnitudes.len() as f32;

    log::debug!("Spectral centroid: {:.1} Hz over {} frames", centroid, magnitudes.len());
    centroid
}

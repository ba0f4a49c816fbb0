//! Frame-wise RMS energy
//!
//! Energy is computed over centered, zero-padded frames. The mean across
//! frames is the global loudness measure; the per-frame sequence feeds pause
//! detection and silence trimming.

use super::framing::{center_pad, frames, validate_framing, PadMode};
use crate::error::AnalysisError;

/// Compute RMS energy for each centered frame
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `frame_size` - Frame length in samples (typically 2048)
/// * `hop_size` - Hop between frames (typically 512)
///
/// # Returns
///
/// `samples.len() / hop_size + 1` RMS values, in frame order
pub fn rms_frames(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<f32>, AnalysisError> {
    validate_framing(frame_size, hop_size)?;

    let padded = center_pad(samples, frame_size, PadMode::Constant);
    let energies: Vec<f32> = frames(&padded, frame_size, hop_size).map(frame_rms).collect();

    log::debug!(
        "RMS: {} frames from {} samples (frame={}, hop={})",
        energies.len(),
        samples.len(),
        frame_size,
        hop_size
    );

    Ok(energies)
}

/// RMS of a single frame: `sqrt(mean(x²))`
pub fn frame_rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
    (sum_sq / frame.len() as f32).sqrt()
}

/// Arithmetic mean (0.0 for an empty slice)
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

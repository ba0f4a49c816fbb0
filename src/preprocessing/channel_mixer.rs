//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::AnalysisError;

/// Average interleaved multi-channel samples into mono
///
/// # Arguments
///
/// * `interleaved` - Samples ordered `[f0c0, f0c1, ..., f1c0, f1c1, ...]`
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// One sample per frame. A trailing partial frame is averaged over the
/// channels it contains.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a channel count of zero.
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    Ok(interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect())
}

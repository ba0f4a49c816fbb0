//! Zero-crossing rate
//!
//! Fraction of adjacent sample pairs whose sign differs, per frame, averaged
//! over frames. Frames are centered with edge padding. Samples whose
//! magnitude is at most [`ZERO_THRESHOLD`] count as zero, and zero counts as
//! positive, so low-level noise around silence does not register as
//! crossings.

use super::framing::{center_pad, frames, validate_framing, PadMode};
use crate::error::AnalysisError;

/// Magnitudes at or below this are treated as exact zero
pub const ZERO_THRESHOLD: f32 = 1e-10;

/// Mean zero-crossing rate over centered frames
///
/// # Returns
///
/// Value in `[0, 1)`; 0.0 for an empty signal
pub fn zero_crossing_rate(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<f32, AnalysisError> {
    validate_framing(frame_size, hop_size)?;

    if samples.is_empty() {
        return Ok(0.0);
    }

    let padded = center_pad(samples, frame_size, PadMode::Edge);
    let rates: Vec<f32> = frames(&padded, frame_size, hop_size).map(frame_zcr).collect();

    if rates.is_empty() {
        return Ok(0.0);
    }

    let zcr = rates.iter().sum::<f32>() / rates.len() as f32;
    log::debug!("Zero-crossing rate: {:.4} over {} frames", zcr, rates.len());
    Ok(zcr)
}

/// Zero-crossing rate of one frame: crossings divided by frame length
pub fn frame_zcr(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|pair| is_negative(pair[0]) != is_negative(pair[1]))
        .count();
    crossings as f32 / frame.len() as f32
}

fn is_negative(x: f32) -> bool {
    x.abs() > ZERO_THRESHOLD && x < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_signal() {
        let frame: Vec<f32> = (0..8).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        // 7 crossings in 8 samples
        assert!((frame_zcr(&frame) - 7.0 / 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_tiny_values_are_zero() {
        let frame = vec![1.0, -1e-12, 1.0, -1e-12];
        assert_eq!(frame_zcr(&frame), 0.0);
    }

    #[test]
    fn test_sine_rate() {
        let sr = 16000.0;
        let freq = 400.0;
        let samples: Vec<f32> = (0..16000)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr + 0.3).sin())
            .collect();
        let zcr = zero_crossing_rate(&samples, 2048, 512).unwrap();
        // Two crossings per period
        let expected = 2.0 * freq / sr;
        assert!((zcr - expected).abs() < 0.005, "zcr {} expected {}", zcr, expected);
    }

    #[test]
    fn test_empty_signal() {
        assert_eq!(zero_crossing_rate(&[], 2048, 512).unwrap(), 0.0);
    }
}

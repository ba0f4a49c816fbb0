//! Frame slicing shared by the frame-wise features
//!
//! Frames are "centered": the signal is padded by `frame_size / 2` on both
//! sides so that frame `t` is centered on sample `t * hop_size`. A signal of
//! `n` samples therefore yields `n / hop_size + 1` frames.

use crate::error::AnalysisError;

/// Padding used when centering frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Zero padding
    Constant,
    /// Repeat the first and last sample
    Edge,
}

/// Reject frame/hop combinations that cannot produce frames
pub fn validate_framing(frame_size: usize, hop_size: usize) -> Result<(), AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }
    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Pad `samples` by `frame_size / 2` on each side
pub fn center_pad(samples: &[f32], frame_size: usize, mode: PadMode) -> Vec<f32> {
    let pad = frame_size / 2;
    let (head, tail) = match mode {
        PadMode::Constant => (0.0, 0.0),
        PadMode::Edge => (
            samples.first().copied().unwrap_or(0.0),
            samples.last().copied().unwrap_or(0.0),
        ),
    };

    let mut padded = Vec::with_capacity(samples.len() + 2 * pad);
    padded.resize(pad, head);
    padded.extend_from_slice(samples);
    padded.resize(padded.len() + pad, tail);
    padded
}

/// Number of complete frames in a buffer of `len` samples
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if hop_size == 0 || frame_size == 0 || len < frame_size {
        0
    } else {
        (len - frame_size) / hop_size + 1
    }
}

/// Iterate over the complete frames of `samples` (no padding applied)
pub fn frames(samples: &[f32], frame_size: usize, hop_size: usize) -> impl Iterator<Item = &[f32]> {
    let n = frame_count(samples.len(), frame_size, hop_size);
    (0..n).map(move |i| {
        let start = i * hop_size;
        &samples[start..start + frame_size]
    })
}

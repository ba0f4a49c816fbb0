//! Silence detection and trimming utilities
//!
//! Leading and trailing near-silence is removed by comparing each frame's
//! RMS level to the loudest frame. A frame is non-silent when it lies within
//! `top_db` of the peak frame; the kept region runs from the first to the
//! last non-silent frame. Silence *inside* the kept region is left intact
//! because it carries the pause information used later.

use crate::error::AnalysisError;
use crate::features::energy::rms_frames;

/// Power floor used when converting to decibels
const AMIN_POWER: f32 = 1e-10;

/// Silence detection configuration
#[derive(Debug, Clone)]
pub struct SilenceDetector {
    /// Threshold in dB below the loudest frame (default: 60.0)
    pub top_db: f32,

    /// Frame size for analysis (default: 2048)
    pub frame_size: usize,

    /// Hop between frames (default: 512)
    pub hop_size: usize,
}

impl Default for SilenceDetector {
    fn default() -> Self {
        Self {
            top_db: 60.0,
            frame_size: 2048,
            hop_size: 512,
        }
    }
}

/// Detect and trim leading/trailing silence
///
/// # Arguments
///
/// * `samples` - Audio samples
/// * `detector` - Silence detection configuration
///
/// # Returns
///
/// Trimmed samples and the kept `[start, end)` sample range. An all-zero
/// signal has every frame at the reference level and is kept whole; an
/// empty input yields an empty output and range `(0, 0)`.
///
/// # Errors
///
/// Returns `AnalysisError` if the framing parameters are invalid.
pub fn detect_and_trim(
    samples: &[f32],
    detector: &SilenceDetector,
) -> Result<(Vec<f32>, (usize, usize)), AnalysisError> {
    log::debug!(
        "Detecting silence in {} samples (top_db={:.1})",
        samples.len(),
        detector.top_db
    );

    if samples.is_empty() {
        return Ok((Vec::new(), (0, 0)));
    }

    let rms = rms_frames(samples, detector.frame_size, detector.hop_size)?;
    let reference_db = power_to_db(rms.iter().map(|&r| r * r).fold(0.0f32, f32::max));

    let is_loud = |r: &f32| power_to_db(r * r) - reference_db > -detector.top_db;
    let first = rms.iter().position(is_loud);
    let last = rms.iter().rposition(is_loud);

    let (start, end) = match (first, last) {
        (Some(first), Some(last)) => {
            let end = ((last + 1) * detector.hop_size).min(samples.len());
            let start = (first * detector.hop_size).min(end);
            (start, end)
        }
        _ => (0, 0),
    };

    log::debug!(
        "Kept samples [{}, {}) of {} ({} frames analysed)",
        start,
        end,
        samples.len(),
        rms.len()
    );

    Ok((samples[start..end].to_vec(), (start, end)))
}

fn power_to_db(power: f32) -> f32 {
    10.0 * power.max(AMIN_POWER).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 16000.0).sin())
            .collect()
    }

    #[test]
    fn test_trims_leading_and_trailing_silence() {
        let mut samples = vec![0.0f32; 16000];
        samples.extend(tone(32000, 0.5));
        samples.extend(vec![0.0f32; 16000]);

        let (trimmed, (start, end)) =
            detect_and_trim(&samples, &SilenceDetector::default()).unwrap();

        // Frame granularity: at most one frame plus one hop of slack per side
        assert!(trimmed.len() >= 32000, "trimmed too much: {}", trimmed.len());
        assert!(trimmed.len() <= 32000 + 2 * 1536, "trimmed too little: {}", trimmed.len());
        assert!(start >= 16000 - 1536 && start <= 16000);
        assert!(end >= 48000 && end <= 48000 + 1536);
    }

    #[test]
    fn test_keeps_internal_silence() {
        let mut samples = tone(16000, 0.5);
        samples.extend(vec![0.0f32; 16000]);
        samples.extend(tone(16000, 0.5));

        let (trimmed, _) = detect_and_trim(&samples, &SilenceDetector::default()).unwrap();
        assert_eq!(trimmed.len(), samples.len());
    }

    #[test]
    fn test_all_zero_signal_is_kept() {
        let samples = vec![0.0f32; 8000];
        let (trimmed, range) = detect_and_trim(&samples, &SilenceDetector::default()).unwrap();
        assert_eq!(trimmed.len(), 8000);
        assert_eq!(range, (0, 8000));
    }

    #[test]
    fn test_empty_input() {
        let (trimmed, range) = detect_and_trim(&[], &SilenceDetector::default()).unwrap();
        assert!(trimmed.is_empty());
        assert_eq!(range, (0, 0));
    }

    #[test]
    fn test_quiet_tail_below_threshold_is_trimmed() {
        let mut samples = tone(16000, 0.5);
        // -80 dB relative tail
        samples.extend(tone(16000, 0.5e-4));

        let (trimmed, _) = detect_and_trim(&samples, &SilenceDetector::default()).unwrap();
        assert!(trimmed.len() < 16000 + 2048);
    }
}

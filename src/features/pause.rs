//! Pause detection from frame energy
//!
//! A frame counts as a pause when its RMS falls below a fraction of a low
//! percentile of all frame RMS values. The threshold therefore adapts to the
//! recording level: quiet and loud recordings of the same speech pattern
//! give the same ratio.

/// Percentile with linear interpolation between closest ranks
///
/// `p` is in `[0, 100]`. Returns 0.0 for an empty slice. NaN values are
/// ordered last.
pub fn percentile(values: &[f32], p: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f32;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f32;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Fraction of frames quieter than `percentile(rms, pct) × factor`
///
/// # Returns
///
/// `(threshold, ratio)` with `ratio` in `[0, 1]`; an empty input yields
/// `(0.0, 0.0)`
pub fn pause_ratio(rms_frames: &[f32], pct: f32, factor: f32) -> (f32, f32) {
    let threshold = percentile(rms_frames, pct) * factor;
    let quiet = rms_frames.iter().filter(|&&r| r < threshold).count();
    let ratio = quiet as f32 / rms_frames.len().max(1) as f32;

    log::debug!(
        "Pauses: {} of {} frames below {:.6} (ratio={:.3})",
        quiet,
        rms_frames.len(),
        threshold,
        ratio
    );

    (threshold, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 100.0), 4.0);
        assert!((percentile(&values, 25.0) - 1.75).abs() < 1e-6);
        assert!((percentile(&values, 50.0) - 2.5).abs() < 1e-6);
        assert_eq!(percentile(&[], 25.0), 0.0);
    }

    #[test]
    fn test_pause_ratio_counts_quiet_frames() {
        // Half the frames are near-silent
        let mut rms = vec![0.001f32; 50];
        rms.extend(vec![0.2f32; 50]);
        let (threshold, ratio) = pause_ratio(&rms, 25.0, 0.5);
        assert!((threshold - 0.0005).abs() < 1e-6);
        // Near-silent frames sit above half of the 25th percentile
        assert_eq!(ratio, 0.0);

        let mut rms = vec![0.0f32; 20];
        rms.extend(vec![0.2f32; 80]);
        let (_, ratio) = pause_ratio(&rms, 25.0, 0.5);
        assert!((ratio - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_constant_signal_has_no_pauses() {
        let (_, ratio) = pause_ratio(&[0.1; 64], 25.0, 0.5);
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pause_ratio(&[], 25.0, 0.5), (0.0, 0.0));
    }
}

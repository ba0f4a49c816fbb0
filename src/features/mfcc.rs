//! Cepstral timbre bank
//!
//! Mel-frequency cepstral coefficients are the orthonormal DCT-II of the
//! log-power mel spectrum. The timbral-variance scalar summarises how much
//! each coefficient moves over time: the population standard deviation of
//! every coefficient track, averaged across coefficients.

use crate::error::AnalysisError;

/// Orthonormal DCT-II basis (`n_coeffs × n_inputs`)
fn dct_matrix(n_inputs: usize, n_coeffs: usize) -> Vec<Vec<f32>> {
    let n = n_inputs as f32;
    (0..n_coeffs)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_inputs)
                .map(|j| scale * (std::f32::consts::PI / n * (j as f32 + 0.5) * k as f32).cos())
                .collect()
        })
        .collect()
}

/// Compute MFCCs from a log-power mel spectrogram
///
/// # Arguments
///
/// * `log_mel` - `n_frames × n_mels` spectrogram in dB
/// * `n_mfcc` - Number of coefficients to keep (typically 13)
///
/// # Returns
///
/// `n_frames × n_mfcc` coefficients
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `n_mfcc` is zero, exceeds the
/// number of mel bands, or the frames have inconsistent lengths.
pub fn mfcc(log_mel: &[Vec<f32>], n_mfcc: usize) -> Result<Vec<Vec<f32>>, AnalysisError> {
    let n_mels = match log_mel.first() {
        Some(frame) => frame.len(),
        None => return Ok(Vec::new()),
    };

    if n_mfcc == 0 || n_mfcc > n_mels {
        return Err(AnalysisError::InvalidInput(format!(
            "Cannot take {} cepstral coefficients from {} mel bands",
            n_mfcc, n_mels
        )));
    }

    if let Some((i, frame)) = log_mel.iter().enumerate().find(|(_, f)| f.len() != n_mels) {
        return Err(AnalysisError::InvalidInput(format!(
            "Inconsistent mel frame lengths: frame 0 has {} bands, frame {} has {}",
            n_mels,
            i,
            frame.len()
        )));
    }

    let basis = dct_matrix(n_mels, n_mfcc);

    Ok(log_mel
        .iter()
        .map(|frame| {
            basis
                .iter()
                .map(|row| row.iter().zip(frame).map(|(&b, &x)| b * x).sum())
                .collect()
        })
        .collect())
}

/// Mean over coefficients of each coefficient's standard deviation over time
///
/// Returns 0.0 when there are no frames.
pub fn timbral_variance(coefficients: &[Vec<f32>]) -> f32 {
    let n_frames = coefficients.len();
    let n_coeffs = match coefficients.first() {
        Some(frame) if !frame.is_empty() => frame.len(),
        _ => return 0.0,
    };

    let total_std: f32 = (0..n_coeffs)
        .map(|k| {
            let track = coefficients.iter().map(|frame| frame[k]);
            let mean = track.clone().sum::<f32>() / n_frames as f32;
            let variance = track.map(|x| (x - mean) * (x - mean)).sum::<f32>() / n_frames as f32;
            variance.sqrt()
        })
        .sum();

    total_std / n_coeffs as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dct_is_orthonormal() {
        let basis = dct_matrix(16, 16);
        for a in 0..16 {
            for b in 0..16 {
                let dot: f32 = basis[a].iter().zip(&basis[b]).map(|(x, y)| x * y).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-4, "<{},{}> = {}", a, b, dot);
            }
        }
    }

    #[test]
    fn test_flat_spectrum_has_only_dc() {
        let frames = vec![vec![-20.0f32; 40]; 3];
        let coeffs = mfcc(&frames, 13).unwrap();
        assert_eq!(coeffs.len(), 3);
        assert_eq!(coeffs[0].len(), 13);
        assert!((coeffs[0][0] - (-20.0 * 40f32.sqrt())).abs() < 1e-3);
        assert!(coeffs[0][1..].iter().all(|c| c.abs() < 1e-3));
    }

    #[test]
    fn test_timbral_variance() {
        // Coefficient 0 alternates ±1 (std 1), coefficient 1 is constant (std 0)
        let coeffs = vec![vec![1.0, 5.0], vec![-1.0, 5.0], vec![1.0, 5.0], vec![-1.0, 5.0]];
        assert!((timbral_variance(&coeffs) - 0.5).abs() < 1e-6);
        assert_eq!(timbral_variance(&[]), 0.0);
    }

    #[test]
    fn test_mfcc_rejects_too_many_coefficients() {
        let frames = vec![vec![0.0f32; 8]; 2];
        assert!(mfcc(&frames, 13).is_err());
        assert!(mfcc(&[], 13).unwrap().is_empty());
    }
}

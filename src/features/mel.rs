//! Mel filterbank and log-power mel spectrogram
//!
//! Uses the Slaney mel scale (linear below 1 kHz, logarithmic above) with
//! Slaney area normalization, so each triangular filter has unit area in Hz.
//! The log-power mel spectrogram produced here feeds both the tempo onset
//! envelope and the cepstral timbre bank.

use super::spectrum::fft_frequencies;
use crate::error::AnalysisError;

/// Power floor for the dB conversion
const AMIN: f32 = 1e-10;

/// Dynamic range kept below the spectrogram maximum, in dB
const TOP_DB: f32 = 80.0;

// Slaney mel scale constants
const F_SP: f32 = 200.0 / 3.0;
const MIN_LOG_HZ: f32 = 1000.0;
const MIN_LOG_MEL: f32 = MIN_LOG_HZ / F_SP;

fn log_step() -> f32 {
    6.4f32.ln() / 27.0
}

/// Convert frequency in Hz to the Slaney mel scale
pub fn hz_to_mel(hz: f32) -> f32 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert Slaney mel to frequency in Hz
pub fn mel_to_hz(mel: f32) -> f32 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular mel filterbank (`n_mels × (n_fft/2 + 1)`)
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    weights: Vec<Vec<f32>>,
}

impl MelFilterbank {
    /// Build a filterbank spanning 0 Hz to Nyquist
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for zero bands, FFT size or
    /// sample rate.
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize) -> Result<Self, AnalysisError> {
        if sample_rate == 0 || n_fft == 0 || n_mels == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid mel filterbank: sr={}, n_fft={}, n_mels={}",
                sample_rate, n_fft, n_mels
            )));
        }

        let fft_freqs = fft_frequencies(sample_rate, n_fft);
        let mel_max = hz_to_mel(sample_rate as f32 / 2.0);

        // n_mels + 2 edge frequencies, evenly spaced in mel
        let edges: Vec<f32> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_max * i as f32 / (n_mels + 1) as f32))
            .collect();

        let weights = (0..n_mels)
            .map(|m| {
                let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
                let lower_width = center - left;
                let upper_width = right - center;
                let area_norm = 2.0 / (right - left);

                fft_freqs
                    .iter()
                    .map(|&f| {
                        let rising = (f - left) / lower_width;
                        let falling = (right - f) / upper_width;
                        rising.min(falling).max(0.0) * area_norm
                    })
                    .collect()
            })
            .collect();

        Ok(Self { weights })
    }

    /// Number of mel bands
    pub fn n_mels(&self) -> usize {
        self.weights.len()
    }

    /// Filter weights, one row per band
    pub fn weights(&self) -> &[Vec<f32>] {
        &self.weights
    }

    /// Project one power spectrum onto the mel bands
    pub fn apply(&self, power_spectrum: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .map(|band| band.iter().zip(power_spectrum).map(|(&w, &p)| w * p).sum())
            .collect()
    }

    /// Log-power mel spectrogram from a magnitude spectrogram
    ///
    /// Magnitudes are squared, projected onto the mel bands, and converted
    /// to dB relative to 1.0 with an 80 dB floor below the global maximum.
    pub fn log_power_spectrogram(&self, magnitudes: &[Vec<f32>]) -> Vec<Vec<f32>> {
        let mut mel: Vec<Vec<f32>> = magnitudes
            .iter()
            .map(|frame| {
                let power: Vec<f32> = frame.iter().map(|&m| m * m).collect();
                self.apply(&power)
            })
            .collect();
        power_to_db_in_place(&mut mel);
        mel
    }
}

/// Convert a power spectrogram to dB in place
///
/// `10·log10(max(S, 1e-10))`, then clipped to at most 80 dB below the
/// spectrogram's maximum.
pub fn power_to_db_in_place(spectrogram: &mut [Vec<f32>]) {
    let mut max_db = f32::NEG_INFINITY;
    for value in spectrogram.iter_mut().flatten() {
        *value = 10.0 * value.max(AMIN).log10();
        max_db = max_db.max(*value);
    }

    let floor = max_db - TOP_DB;
    for value in spectrogram.iter_mut().flatten() {
        *value = value.max(floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_roundtrip_points() {
        // Linear region
        assert!((hz_to_mel(200.0) - 3.0).abs() < 1e-4);
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-4);
        for hz in [50.0f32, 440.0, 1000.0, 4000.0, 8000.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() / hz < 1e-4);
        }
    }

    #[test]
    fn test_filterbank_shape_and_nonnegative() {
        let bank = MelFilterbank::new(16000, 2048, 128).unwrap();
        assert_eq!(bank.n_mels(), 128);
        assert!(bank.weights().iter().all(|row| row.len() == 1025));
        assert!(bank.weights().iter().flatten().all(|&w| w >= 0.0));
    }

    #[test]
    fn test_filter_responds_near_its_center() {
        let bank = MelFilterbank::new(22050, 2048, 40).unwrap();
        // A single-bin power spectrum at ~1 kHz activates at least one band
        let mut spectrum = vec![0.0f32; 1025];
        spectrum[93] = 1.0; // 93 * 22050 / 2048 ≈ 1001 Hz
        let bands = bank.apply(&spectrum);
        assert!(bands.iter().any(|&b| b > 0.0));
        assert!(bands[0] == 0.0 && bands[39] == 0.0);
    }

    #[test]
    fn test_power_to_db_floor() {
        let mut spec = vec![vec![1.0f32, 1e-12], vec![100.0, 0.0]];
        power_to_db_in_place(&mut spec);
        assert!((spec[1][0] - 20.0).abs() < 1e-4);
        assert!((spec[0][0] - 0.0).abs() < 1e-4);
        // Everything is clipped to max - 80 dB
        assert!((spec[0][1] - (-60.0)).abs() < 1e-4);
        assert!((spec[1][1] - (-60.0)).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_filterbank() {
        assert!(MelFilterbank::new(0, 2048, 128).is_err());
        assert!(MelFilterbank::new(16000, 2048, 0).is_err());
    }
}

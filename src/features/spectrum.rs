//! Short-time Fourier transform
//!
//! Magnitude spectrogram over centered, zero-padded frames with a periodic
//! Hann window. Shared by the spectral centroid and the mel front end.

use super::framing::{center_pad, frames, validate_framing, PadMode};
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Planned STFT for a fixed FFT size and hop
pub struct Stft {
    n_fft: usize,
    hop_size: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl std::fmt::Debug for Stft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stft")
            .field("n_fft", &self.n_fft)
            .field("hop_size", &self.hop_size)
            .finish()
    }
}

impl Stft {
    /// Plan an STFT
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for a zero FFT size or hop.
    pub fn new(n_fft: usize, hop_size: usize) -> Result<Self, AnalysisError> {
        validate_framing(n_fft, hop_size)?;

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n_fft);

        Ok(Self {
            n_fft,
            hop_size,
            window: hann_window(n_fft),
            fft,
        })
    }

    /// FFT size
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Number of non-negative frequency bins (`n_fft / 2 + 1`)
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Compute the magnitude spectrogram
    ///
    /// # Returns
    ///
    /// `n_frames × n_bins` magnitudes, one inner `Vec` per frame
    pub fn magnitudes(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let padded = center_pad(samples, self.n_fft, PadMode::Constant);
        let n_bins = self.n_bins();

        let mut buffer = vec![Complex::new(0.0f32, 0.0f32); self.n_fft];
        let mut scratch = vec![Complex::new(0.0f32, 0.0f32); self.fft.get_inplace_scratch_len()];

        let spectrogram: Vec<Vec<f32>> = frames(&padded, self.n_fft, self.hop_size)
            .map(|frame| {
                for ((slot, &x), &w) in buffer.iter_mut().zip(frame).zip(&self.window) {
                    *slot = Complex::new(x * w, 0.0);
                }
                self.fft.process_with_scratch(&mut buffer, &mut scratch);
                buffer[..n_bins].iter().map(|c| c.norm()).collect()
            })
            .collect();

        log::debug!(
            "STFT: {} frames × {} bins (n_fft={}, hop={})",
            spectrogram.len(),
            n_bins,
            self.n_fft,
            self.hop_size
        );

        spectrogram
    }
}

/// Periodic Hann window of length `len`
pub fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * n as f32 / len as f32).cos())
        .collect()
}

/// Center frequency in Hz of each non-negative FFT bin
pub fn fft_frequencies(sample_rate: u32, n_fft: usize) -> Vec<f32> {
    (0..=n_fft / 2)
        .map(|k| k as f32 * sample_rate as f32 / n_fft as f32)
        .collect()
}

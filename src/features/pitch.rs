//! YIN fundamental-frequency tracking
//!
//! For each centered frame the squared-difference function
//!
//! ```text
//! d(τ) = Σ_{j=1..W} (x[j] - x[j+τ])²
//! ```
//!
//! is computed from an FFT autocorrelation and prefix-summed energies, then
//! normalized by its cumulative mean. The pitch period is the first local
//! minimum of the normalized curve that dips below the trough threshold,
//! refined by parabolic interpolation. Frames without such a trough are
//! unvoiced and reported as NaN.
//!
//! # Reference
//!
//! de Cheveigné, A., & Kawahara, H. (2002). YIN, a fundamental frequency
//! estimator for speech and music. *JASA*, 111(4), 1917-1930.

use super::framing::{center_pad, frames, PadMode};
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Values this close to zero are snapped to zero before normalization
const SNAP_EPSILON: f32 = 1e-6;

/// YIN parameters
#[derive(Debug, Clone)]
pub struct YinConfig {
    /// Lowest detectable pitch in Hz (default: 50.0)
    pub fmin: f32,
    /// Highest detectable pitch in Hz (default: 400.0)
    pub fmax: f32,
    /// Frame length in samples (default: 2048)
    pub frame_length: usize,
    /// Integration window in samples; must be smaller than the frame (default: 1024)
    pub win_length: usize,
    /// Hop between frames (default: 512)
    pub hop_length: usize,
    /// Absolute threshold on the normalized difference (default: 0.1)
    pub trough_threshold: f32,
}

impl Default for YinConfig {
    fn default() -> Self {
        Self {
            fmin: 50.0,
            fmax: 400.0,
            frame_length: 2048,
            win_length: 1024,
            hop_length: 512,
            trough_threshold: 0.1,
        }
    }
}

/// Summary statistics of a pitch track
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PitchStats {
    /// Mean f0 over voiced frames in Hz
    pub mean_hz: f32,
    /// Population standard deviation of f0 over voiced frames in Hz
    pub std_hz: f32,
}

/// Lag search range `[min_period, max_period]` for a configuration
fn period_range(sample_rate: u32, config: &YinConfig) -> Result<(usize, usize), AnalysisError> {
    let sr = sample_rate as f32;

    if sample_rate == 0 || config.hop_length == 0 {
        return Err(AnalysisError::PitchExtraction(format!(
            "Invalid framing: sr={}, hop={}",
            sample_rate, config.hop_length
        )));
    }
    if !(config.fmin > 0.0) || config.fmin >= config.fmax {
        return Err(AnalysisError::PitchExtraction(format!(
            "fmin ({}) must be positive and below fmax ({})",
            config.fmin, config.fmax
        )));
    }
    if config.fmax > sr / 2.0 {
        return Err(AnalysisError::PitchExtraction(format!(
            "fmax ({} Hz) exceeds Nyquist ({} Hz)",
            config.fmax,
            sr / 2.0
        )));
    }
    if config.win_length == 0 || config.win_length >= config.frame_length {
        return Err(AnalysisError::PitchExtraction(format!(
            "Window ({}) must be non-zero and shorter than the frame ({})",
            config.win_length, config.frame_length
        )));
    }

    let lag_budget = config.frame_length - config.win_length - 1;
    let min_period = (sr / config.fmax).floor() as usize;
    if lag_budget <= min_period {
        return Err(AnalysisError::PitchExtraction(format!(
            "Frame leaves {} lags, not enough for periods of {} samples",
            lag_budget, min_period
        )));
    }

    let max_period = ((sr / config.fmin).ceil() as usize).min(lag_budget);
    Ok((min_period.max(1), max_period))
}

/// Estimate the f0 track of a mono signal
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - YIN parameters
///
/// # Returns
///
/// One f0 value in Hz per frame (`samples.len() / hop + 1` frames), NaN for
/// unvoiced frames
///
/// # Errors
///
/// Returns `AnalysisError::PitchExtraction` when the parameters cannot
/// produce a valid lag range for this sample rate.
pub fn yin(samples: &[f32], sample_rate: u32, config: &YinConfig) -> Result<Vec<f32>, AnalysisError> {
    let (min_period, max_period) = period_range(sample_rate, config)?;
    let n = config.frame_length;
    let win = config.win_length;

    log::debug!(
        "YIN: {} samples @ {} Hz, periods {}..={} (fmin={}, fmax={})",
        samples.len(),
        sample_rate,
        min_period,
        max_period,
        config.fmin,
        config.fmax
    );

    let mut planner = FftPlanner::<f32>::new();
    let forward = planner.plan_fft_forward(n);
    let inverse = planner.plan_fft_inverse(n);
    let mut scratch =
        vec![Complex::new(0.0f32, 0.0); forward.get_inplace_scratch_len().max(inverse.get_inplace_scratch_len())];

    let mut spectrum = vec![Complex::new(0.0f32, 0.0); n];
    let mut kernel = vec![Complex::new(0.0f32, 0.0); n];
    let mut energy = vec![0.0f32; n + 1];
    let mut diff = vec![0.0f32; max_period + 1];

    let padded = center_pad(samples, n, PadMode::Constant);
    let track: Vec<f32> = frames(&padded, n, config.hop_length)
        .map(|frame| {
            // Cross-correlate the frame with its first window, reversed
            for (slot, &x) in spectrum.iter_mut().zip(frame) {
                *slot = Complex::new(x, 0.0);
            }
            for (k, slot) in kernel.iter_mut().enumerate() {
                *slot = if k < win {
                    Complex::new(frame[win - k], 0.0)
                } else {
                    Complex::new(0.0, 0.0)
                };
            }
            forward.process_with_scratch(&mut spectrum, &mut scratch);
            forward.process_with_scratch(&mut kernel, &mut scratch);
            for (a, b) in spectrum.iter_mut().zip(&kernel) {
                *a *= *b;
            }
            inverse.process_with_scratch(&mut spectrum, &mut scratch);

            // energy[i] = Σ_{j<i} x[j]²
            energy[0] = 0.0;
            for (i, &x) in frame.iter().enumerate() {
                energy[i + 1] = energy[i] + x * x;
            }
            let window_energy = |tau: usize| snap(energy[win + tau + 1] - energy[tau + 1]);

            let e0 = window_energy(0);
            for (tau, d) in diff.iter_mut().enumerate() {
                let acf = snap(spectrum[win + tau].re / n as f32);
                *d = e0 + window_energy(tau) - 2.0 * acf;
            }

            frame_pitch(&diff, min_period, config.trough_threshold)
                .map(|period| sample_rate as f32 / period)
                .unwrap_or(f32::NAN)
        })
        .collect();

    log::debug!(
        "YIN: {} of {} frames voiced",
        track.iter().filter(|f| !f.is_nan()).count(),
        track.len()
    );

    Ok(track)
}

fn snap(value: f32) -> f32 {
    if value.abs() < SNAP_EPSILON {
        0.0
    } else {
        value
    }
}

/// Pick the refined period (in samples) from one frame's difference function
///
/// `diff` holds `d(τ)` for `τ = 0..=max_period`.
fn frame_pitch(diff: &[f32], min_period: usize, threshold: f32) -> Option<f32> {
    let max_period = diff.len() - 1;

    // Cumulative-mean-normalized difference over [min_period, max_period]
    let mut running = 0.0f32;
    let mut cmnd = Vec::with_capacity(max_period + 1 - min_period);
    for (tau, &d) in diff.iter().enumerate().skip(1) {
        running += d;
        if tau >= min_period {
            let cumulative_mean = running / tau as f32;
            cmnd.push(d / (cumulative_mean + f32::MIN_POSITIVE));
        }
    }

    let idx = first_trough_below(&cmnd, threshold)?;
    Some(min_period as f32 + idx as f32 + parabolic_shift(&cmnd, idx))
}

/// Index of the first local minimum strictly below `threshold`
///
/// The first element is a trough when it is lower than its successor; the
/// last element is a trough when it is lower than its predecessor.
fn first_trough_below(curve: &[f32], threshold: f32) -> Option<usize> {
    let len = curve.len();
    (0..len).find(|&i| {
        let is_trough = if i == 0 {
            len > 1 && curve[0] < curve[1]
        } else if i == len - 1 {
            curve[i] < curve[i - 1]
        } else {
            curve[i] < curve[i - 1] && curve[i] <= curve[i + 1]
        };
        is_trough && curve[i] < threshold
    })
}

/// Parabolic-interpolation offset of a trough, 0 at the curve edges
fn parabolic_shift(curve: &[f32], i: usize) -> f32 {
    if i == 0 || i + 1 >= curve.len() {
        return 0.0;
    }
    let (x, y, z) = (curve[i - 1], curve[i], curve[i + 1]);
    let a = x + z - 2.0 * y;
    let b = (z - x) / 2.0;
    if b.abs() >= a.abs() {
        0.0
    } else {
        -b / a
    }
}

/// Mean and population standard deviation over voiced (non-NaN) frames
///
/// Returns zeros when no frame is voiced.
pub fn pitch_stats(track: &[f32]) -> PitchStats {
    let voiced: Vec<f32> = track.iter().copied().filter(|f| f.is_finite()).collect();
    if voiced.is_empty() {
        return PitchStats::default();
    }

    let n = voiced.len() as f32;
    let mean_hz = voiced.iter().sum::<f32>() / n;
    let variance = voiced.iter().map(|f| (f - mean_hz) * (f - mean_hz)).sum::<f32>() / n;

    PitchStats {
        mean_hz,
        std_hz: variance.sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let len = (sample_rate as f32 * seconds) as usize;
        (0..len)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_sine_150hz() {
        let samples = sine(150.0, 16000, 2.0);
        let track = yin(&samples, 16000, &YinConfig::default()).unwrap();
        assert_eq!(track.len(), samples.len() / 512 + 1);

        let stats = pitch_stats(&track);
        assert!((stats.mean_hz - 150.0).abs() < 5.0, "mean pitch {}", stats.mean_hz);
        assert!(stats.std_hz < 10.0, "pitch std {}", stats.std_hz);
    }

    #[test]
    fn test_gliding_tone_stays_in_band() {
        // f0(t) = 170 + 50·sin(2π·0.5·t) with integrated phase, one full sweep
        let sr = 16000u32;
        let samples: Vec<f32> = (0..sr as usize * 2)
            .map(|i| {
                let t = i as f32 / sr as f32;
                let cycles = 170.0 * t - 50.0 / std::f32::consts::PI * (std::f32::consts::PI * t).cos();
                0.5 * (2.0 * std::f32::consts::PI * cycles).sin()
            })
            .collect();

        let stats = pitch_stats(&yin(&samples, sr, &YinConfig::default()).unwrap());
        assert!((stats.mean_hz - 170.0).abs() < 10.0, "mean pitch {}", stats.mean_hz);
        assert!(stats.std_hz > 20.0 && stats.std_hz < 50.0, "pitch std {}", stats.std_hz);
    }

    #[test]
    fn test_sine_220hz_at_22050() {
        let samples = sine(220.0, 22050, 1.0);
        let stats = pitch_stats(&yin(&samples, 22050, &YinConfig::default()).unwrap());
        assert!((stats.mean_hz - 220.0).abs() < 5.0, "mean pitch {}", stats.mean_hz);
    }

    #[test]
    fn test_silence_is_unvoiced() {
        let track = yin(&vec![0.0; 16000], 16000, &YinConfig::default()).unwrap();
        assert!(track.iter().all(|f| f.is_nan()));
        assert_eq!(pitch_stats(&track), PitchStats::default());
    }

    #[test]
    fn test_invalid_parameters() {
        // fmax above Nyquist
        assert!(matches!(
            yin(&[0.0; 4096], 600, &YinConfig::default()),
            Err(AnalysisError::PitchExtraction(_))
        ));

        let inverted = YinConfig {
            fmin: 400.0,
            fmax: 50.0,
            ..YinConfig::default()
        };
        assert!(yin(&[0.0; 4096], 16000, &inverted).is_err());

        let wide_window = YinConfig {
            win_length: 2048,
            ..YinConfig::default()
        };
        assert!(yin(&[0.0; 4096], 16000, &wide_window).is_err());
    }

    #[test]
    fn test_pitch_stats_ignores_nan() {
        let stats = pitch_stats(&[100.0, f32::NAN, 200.0, f32::NAN]);
        assert!((stats.mean_hz - 150.0).abs() < 1e-4);
        assert!((stats.std_hz - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_trough_and_shift() {
        let curve = [0.9, 0.5, 0.05, 0.08, 0.3, 0.02];
        assert_eq!(first_trough_below(&curve, 0.1), Some(2));
        // Symmetric neighbours give no shift
        assert_eq!(parabolic_shift(&[0.5, 0.1, 0.5], 1), 0.0);
        assert!(parabolic_shift(&[0.5, 0.1, 0.3], 1) > 0.0);
        assert_eq!(first_trough_below(&[0.5, 0.5, 0.5], 0.1), None);
    }
}

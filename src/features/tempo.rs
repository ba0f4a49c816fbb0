//! Speaking-tempo estimation
//!
//! # Algorithm
//!
//! 1. Onset strength: positive first difference of the log-power mel
//!    spectrogram, median over bands, aligned to the STFT frame grid
//! 2. Tempogram: autocorrelation of the Hann-windowed onset envelope over a
//!    sliding window, each frame normalized by its peak, then averaged over
//!    time into a single lag profile
//! 3. Selection: the lag maximizing `ln(1 + 10⁶·strength)` plus a log-normal
//!    prior centered at `start_bpm` with a one-octave standard deviation;
//!    lags at or above `max_bpm` are never selected
//!
//! An onset envelope with no energy at all has no tempo and yields 0 BPM.
//!
//! # Reference
//!
//! Grosche, P., Müller, M., & Kurth, F. (2010). Cyclic tempogram: a
//! mid-level tempo representation for music signals. *ICASSP*.

use super::spectrum::hann_window;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Frames of zero padding in front of the first difference
///
/// One frame for the difference lag plus two for the `n_fft / (2·hop)`
/// offset introduced by centered STFT frames.
const ONSET_PAD_FRAMES: usize = 3;

/// Tempo estimation parameters
#[derive(Debug, Clone)]
pub struct TempoConfig {
    /// Center of the tempo prior in BPM (default: 120.0)
    pub start_bpm: f32,
    /// Tempi at or above this are excluded (default: 320.0)
    pub max_bpm: f32,
    /// Autocorrelation window in seconds (default: 8.0)
    pub window_seconds: f32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            start_bpm: 120.0,
            max_bpm: 320.0,
            window_seconds: 8.0,
        }
    }
}

/// Onset-strength envelope from a log-power mel spectrogram
///
/// # Arguments
///
/// * `log_mel` - `n_frames × n_mels` spectrogram in dB
///
/// # Returns
///
/// `n_frames` onset strengths, zero for the first frames
pub fn onset_strength(log_mel: &[Vec<f32>]) -> Vec<f32> {
    let n_frames = log_mel.len();
    let mut envelope = vec![0.0f32; ONSET_PAD_FRAMES];

    envelope.extend(log_mel.windows(2).map(|pair| {
        let (prev, curr) = (&pair[0], &pair[1]);
        if curr.is_empty() {
            return 0.0;
        }
        let mut rises: Vec<f32> = curr.iter().zip(prev).map(|(&c, &p)| (c - p).max(0.0)).collect();
        median(&mut rises)
    }));

    envelope.truncate(n_frames);
    envelope
}

/// Median of a non-empty slice; even lengths average the two middle values
fn median(values: &mut [f32]) -> f32 {
    values.sort_unstable_by(f32::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        0.5 * (values[mid - 1] + values[mid])
    } else {
        values[mid]
    }
}

/// Estimate the global tempo in BPM from an onset envelope
///
/// # Arguments
///
/// * `onset_envelope` - Output of [`onset_strength`]
/// * `sample_rate` - Sample rate in Hz
/// * `hop_size` - STFT hop in samples
/// * `config` - Prior and window parameters
///
/// # Returns
///
/// Tempo in BPM (≥ 0); 0.0 for an empty or all-zero envelope
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate or hop, or a
/// window shorter than two frames.
pub fn estimate_tempo(
    onset_envelope: &[f32],
    sample_rate: u32,
    hop_size: usize,
    config: &TempoConfig,
) -> Result<f32, AnalysisError> {
    if sample_rate == 0 || hop_size == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid tempo framing: sr={}, hop={}",
            sample_rate, hop_size
        )));
    }

    let win_length = (config.window_seconds * sample_rate as f32 / hop_size as f32).floor() as usize;
    if win_length < 2 {
        return Err(AnalysisError::InvalidInput(format!(
            "Tempo window of {} s spans only {} frames",
            config.window_seconds, win_length
        )));
    }

    if onset_envelope.iter().all(|&x| x == 0.0) {
        log::debug!("Tempo: onset envelope is silent, reporting 0 BPM");
        return Ok(0.0);
    }

    let profile = mean_tempogram(onset_envelope, win_length);
    let frame_rate = sample_rate as f32 / hop_size as f32;
    let log2_start = config.start_bpm.log2();

    let best = profile
        .iter()
        .enumerate()
        .skip(1)
        .map(|(lag, &strength)| (60.0 * frame_rate / lag as f32, strength))
        .filter(|&(bpm, _)| bpm < config.max_bpm)
        .map(|(bpm, strength)| {
            let prior = -0.5 * (bpm.log2() - log2_start).powi(2);
            (bpm, (1e6 * strength).ln_1p() + prior)
        })
        .fold(None, |best: Option<(f32, f32)>, candidate| match best {
            Some(b) if b.1 >= candidate.1 => Some(b),
            _ => Some(candidate),
        });

    let tempo = best.map(|(bpm, _)| bpm).unwrap_or(0.0);
    log::debug!(
        "Tempo: {:.1} BPM ({} onset frames, window={} frames)",
        tempo,
        onset_envelope.len(),
        win_length
    );

    Ok(tempo)
}

/// Time-averaged, peak-normalized local autocorrelation (`win_length` lags)
fn mean_tempogram(onset_envelope: &[f32], win_length: usize) -> Vec<f32> {
    let padded = ramp_pad(onset_envelope, win_length / 2);
    let window = hann_window(win_length);

    let fft_len = (2 * win_length - 1).next_power_of_two();
    let mut planner = FftPlanner::<f32>::new();
    let forward = planner.plan_fft_forward(fft_len);
    let inverse = planner.plan_fft_inverse(fft_len);
    let mut scratch = vec![
        Complex::new(0.0f32, 0.0);
        forward.get_inplace_scratch_len().max(inverse.get_inplace_scratch_len())
    ];
    let mut buffer = vec![Complex::new(0.0f32, 0.0); fft_len];

    let mut profile = vec![0.0f32; win_length];
    let mut n_frames = 0usize;

    for frame in padded.windows(win_length) {
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = if i < win_length {
                Complex::new(frame[i] * window[i], 0.0)
            } else {
                Complex::new(0.0, 0.0)
            };
        }
        forward.process_with_scratch(&mut buffer, &mut scratch);
        for c in buffer.iter_mut() {
            *c = Complex::new(c.norm_sqr(), 0.0);
        }
        inverse.process_with_scratch(&mut buffer, &mut scratch);

        let acf: Vec<f32> = buffer[..win_length].iter().map(|c| c.re / fft_len as f32).collect();
        let peak = acf.iter().fold(0.0f32, |m, &x| m.max(x.abs()));
        let scale = if peak < f32::MIN_POSITIVE { 1.0 } else { 1.0 / peak };

        for (acc, &x) in profile.iter_mut().zip(&acf) {
            *acc += x * scale;
        }
        n_frames += 1;
    }

    if n_frames > 0 {
        for value in profile.iter_mut() {
            *value /= n_frames as f32;
        }
    }
    profile
}

/// Pad both ends with a linear ramp from 0 toward the edge value
fn ramp_pad(values: &[f32], pad: usize) -> Vec<f32> {
    let first = values.first().copied().unwrap_or(0.0);
    let last = values.last().copied().unwrap_or(0.0);

    let mut padded = Vec::with_capacity(values.len() + 2 * pad);
    padded.extend((0..pad).map(|i| first * i as f32 / pad as f32));
    padded.extend_from_slice(values);
    padded.extend((0..pad).map(|i| last * (pad - 1 - i) as f32 / pad as f32));
    padded
}

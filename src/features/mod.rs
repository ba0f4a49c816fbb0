//! Feature extraction modules
//!
//! This module contains the acoustic measurements the trait scores are built
//! from:
//! - Frame energy (RMS) and pauses
//! - Pitch tracking (YIN)
//! - Tempo (onset envelope + tempogram)
//! - Zero-crossing rate
//! - Spectral centroid and cepstral timbre variance
//!
//! [`extract_features`] runs all of them over one trimmed signal. A single
//! STFT feeds both the centroid and the mel front end, and the log-power mel
//! spectrogram feeds both tempo and the cepstral bank.

pub mod energy;
pub mod framing;
pub mod mel;
pub mod mfcc;
pub mod pause;
pub mod pitch;
pub mod spectral;
pub mod spectrum;
pub mod tempo;
pub mod zcr;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::AudioSignal;
use pitch::{PitchStats, YinConfig};
use tempo::TempoConfig;

/// Shortest duration reported, in seconds
const MIN_DURATION_SECONDS: f32 = 0.001;

/// Acoustic features of one trimmed recording
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    /// Trimmed length in seconds (≥ 0.001)
    pub duration_seconds: f32,

    /// Mean frame RMS
    pub rms_global: f32,

    /// Per-frame RMS
    pub rms_frames: Vec<f32>,

    /// Estimated tempo in BPM (0.0 when no onsets)
    pub tempo_bpm: f32,

    /// Mean zero-crossing rate
    pub zero_crossing_rate: f32,

    /// Per-frame f0 in Hz, NaN where unvoiced; empty when pitch tracking failed
    pub pitch_track: Vec<f32>,

    /// Mean f0 over voiced frames (0.0 when none)
    pub avg_pitch_hz: f32,

    /// Standard deviation of f0 over voiced frames (0.0 when none)
    pub pitch_std_hz: f32,

    /// Mean spectral centroid in Hz
    pub spectral_centroid: f32,

    /// Mean per-coefficient standard deviation of the cepstral bank
    pub timbral_variance: f32,

    /// Fraction of frames below the pause threshold, in [0, 1]
    pub pause_ratio: f32,
}

/// Extract every feature from a trimmed, non-empty signal
///
/// # Arguments
///
/// * `signal` - Trimmed mono signal
/// * `config` - Framing and front-end parameters
///
/// # Returns
///
/// `FeatureSet` whose scalar fields are all finite
///
/// # Errors
///
/// Returns `AnalysisError` for invalid framing or a non-finite feature.
/// Pitch tracking failures are logged and replaced by zero pitch statistics.
pub fn extract_features(
    signal: &AudioSignal,
    config: &AnalysisConfig,
) -> Result<FeatureSet, AnalysisError> {
    let samples = &signal.samples;
    let sr = signal.sample_rate;
    let frame = config.frame_size;
    let hop = config.hop_size;

    if sr == 0 {
        return Err(AnalysisError::InvalidInput(
            "Sample rate must be > 0".to_string(),
        ));
    }

    log::debug!("Extracting features: {} samples at {} Hz", samples.len(), sr);

    let duration_seconds = signal.duration_seconds().max(MIN_DURATION_SECONDS);

    // Energy and pauses
    let rms_frames = energy::rms_frames(samples, frame, hop)?;
    let rms_global = energy::mean(&rms_frames);
    let (_, pause_ratio) =
        pause::pause_ratio(&rms_frames, config.pause_percentile, config.pause_factor);

    let zero_crossing_rate = zcr::zero_crossing_rate(samples, frame, hop)?;

    // Shared spectral front end
    let stft = spectrum::Stft::new(frame, hop)?;
    let magnitudes = stft.magnitudes(samples);
    let spectral_centroid = spectral::mean_spectral_centroid(&magnitudes, sr, stft.n_fft());

    let filterbank = mel::MelFilterbank::new(sr, frame, config.n_mels)?;
    let log_mel = filterbank.log_power_spectrogram(&magnitudes);

    let onset_envelope = tempo::onset_strength(&log_mel);
    let tempo_config = TempoConfig {
        start_bpm: config.tempo_start_bpm,
        max_bpm: config.tempo_max_bpm,
        window_seconds: config.tempo_window_seconds,
    };
    let tempo_bpm = tempo::estimate_tempo(&onset_envelope, sr, hop, &tempo_config)?;

    let cepstrum = mfcc::mfcc(&log_mel, config.n_mfcc)?;
    let timbral_variance = mfcc::timbral_variance(&cepstrum);

    // Pitch degrades to zeros instead of failing the analysis
    let yin_config = YinConfig {
        fmin: config.pitch_fmin,
        fmax: config.pitch_fmax,
        frame_length: frame,
        win_length: frame / 2,
        hop_length: hop,
        trough_threshold: config.pitch_trough_threshold,
    };
    let (pitch_track, pitch_stats) = match pitch::yin(samples, sr, &yin_config) {
        Ok(track) => {
            let stats = pitch::pitch_stats(&track);
            (track, stats)
        }
        Err(err) => {
            log::warn!("Pitch extraction failed, using zero pitch statistics: {}", err);
            (Vec::new(), PitchStats::default())
        }
    };

    let features = FeatureSet {
        duration_seconds,
        rms_global,
        rms_frames,
        tempo_bpm,
        zero_crossing_rate,
        pitch_track,
        avg_pitch_hz: pitch_stats.mean_hz,
        pitch_std_hz: pitch_stats.std_hz,
        spectral_centroid,
        timbral_variance,
        pause_ratio,
    };

    features.check_finite()?;

    log::debug!(
        "Features: duration={:.2}s rms={:.4} tempo={:.1} zcr={:.4} pitch={:.1}±{:.1}Hz centroid={:.1}Hz timbre={:.2} pauses={:.3}",
        features.duration_seconds,
        features.rms_global,
        features.tempo_bpm,
        features.zero_crossing_rate,
        features.avg_pitch_hz,
        features.pitch_std_hz,
        features.spectral_centroid,
        features.timbral_variance,
        features.pause_ratio
    );

    Ok(features)
}

impl FeatureSet {
    fn check_finite(&self) -> Result<(), AnalysisError> {
        let scalars = [
            ("duration_seconds", self.duration_seconds),
            ("rms_global", self.rms_global),
            ("tempo_bpm", self.tempo_bpm),
            ("zero_crossing_rate", self.zero_crossing_rate),
            ("avg_pitch_hz", self.avg_pitch_hz),
            ("pitch_std_hz", self.pitch_std_hz),
            ("spectral_centroid", self.spectral_centroid),
            ("timbral_variance", self.timbral_variance),
            ("pause_ratio", self.pause_ratio),
        ];

        match scalars.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(AnalysisError::NumericalError(format!(
                "Feature {} is not finite ({})",
                name, value
            ))),
            None => Ok(()),
        }
    }
}

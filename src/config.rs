//! Configuration parameters for voice analysis
//!
//! The defaults reproduce the framing conventions the scoring heuristics were
//! tuned against. The scoring weights themselves are fixed and live in
//! [`crate::analysis::scoring`]; only the signal-processing front end is
//! configurable.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Framing
    /// Analysis frame length and FFT size (default: 2048)
    pub frame_size: usize,

    /// Hop between frames (default: 512)
    pub hop_size: usize,

    // Preprocessing
    /// Frames quieter than this many dB below the loudest frame are trimmed
    /// from the edges (default: 60.0)
    pub trim_top_db: f32,

    // Pitch
    /// Lowest plausible voice pitch in Hz (default: 50.0)
    pub pitch_fmin: f32,

    /// Highest plausible voice pitch in Hz (default: 400.0)
    pub pitch_fmax: f32,

    /// YIN absolute threshold on the normalized difference (default: 0.1)
    pub pitch_trough_threshold: f32,

    // Spectral
    /// Number of mel bands for the onset envelope and cepstrum (default: 128)
    pub n_mels: usize,

    /// Number of cepstral coefficients in the timbre bank (default: 13)
    pub n_mfcc: usize,

    // Tempo
    /// Center of the log-normal tempo prior in BPM (default: 120.0)
    pub tempo_start_bpm: f32,

    /// Tempi at or above this are never selected (default: 320.0)
    pub tempo_max_bpm: f32,

    /// Autocorrelation window in seconds (default: 8.0)
    pub tempo_window_seconds: f32,

    // Pauses
    /// Percentile of frame RMS used as the silence reference (default: 25.0)
    pub pause_percentile: f32,

    /// Multiplier applied to the percentile to get the silence threshold (default: 0.5)
    pub pause_factor: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            trim_top_db: 60.0,
            pitch_fmin: 50.0,
            pitch_fmax: 400.0,
            pitch_trough_threshold: 0.1,
            n_mels: 128,
            n_mfcc: 13,
            tempo_start_bpm: 120.0,
            tempo_max_bpm: 320.0,
            tempo_window_seconds: 8.0,
            pause_percentile: 25.0,
            pause_factor: 0.5,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file
    ///
    /// Missing fields take their default values. If the file cannot be read
    /// or parsed, a warning is logged and the default configuration is
    /// returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded analysis configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "Failed to parse configuration {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "Failed to read configuration {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Check parameters that would make the pipeline meaningless
    ///
    /// Pitch parameters are deliberately not checked here: an unusable pitch
    /// range only disables the pitch features, it does not abort analysis.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame size must be >= 2, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }
        if self.n_mels == 0 || self.n_mfcc == 0 || self.n_mfcc > self.n_mels {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid cepstral bank: {} coefficients from {} mel bands",
                self.n_mfcc, self.n_mels
            )));
        }
        if !(0.0..=100.0).contains(&self.pause_percentile) {
            return Err(AnalysisError::InvalidInput(format!(
                "Pause percentile must be within [0, 100], got {}",
                self.pause_percentile
            )));
        }
        if !(self.tempo_window_seconds > 0.0) || !(self.tempo_start_bpm > 0.0) {
            return Err(AnalysisError::InvalidInput(
                "Tempo window and prior must be positive".to_string(),
            ));
        }
        if !(self.trim_top_db > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Trim threshold must be positive, got {} dB",
                self.trim_top_db
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.hop_size, 512);
        assert_eq!(config.n_mfcc, 13);
        assert_eq!(config.pitch_fmin, 50.0);
        assert_eq!(config.pitch_fmax, 400.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AnalysisConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: AnalysisConfig = serde_json::from_str(r#"{"hop_size": 256}"#).unwrap();
        assert_eq!(parsed.hop_size, 256);
        assert_eq!(parsed.frame_size, 2048);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AnalysisConfig::load_from_file("/nonexistent/vocal-traits.json");
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_framing() {
        let config = AnalysisConfig {
            hop_size: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            n_mfcc: 200,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

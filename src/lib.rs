//! # Vocal Traits
//!
//! An acoustic voice analysis engine that scores a short speech recording on
//! seven interpretable traits (confidence, energy, calmness, warmth,
//! speaking speed, pitch variability and charm), each on a 0-100 scale with
//! a human-readable label.
//!
//! ## Features
//!
//! - **Decoding**: Any format in Symphonia's default registry, downmixed to mono
//! - **Preprocessing**: Leading/trailing silence trimming
//! - **Acoustic Features**: RMS energy, YIN pitch, tempo, zero-crossing rate,
//!   spectral centroid, cepstral timbre variance, pause ratio
//! - **Scoring**: Fixed, bounded heuristics with threshold interpretations
//!
//! ## Quick Start
//!
//! ```no_run
//! use vocal_traits::{analyze_file, AnalysisConfig};
//!
//! let report = analyze_file("voice.wav", &AnalysisConfig::default())?;
//!
//! println!("Confidence: {} ({})", report.scores.confidence, report.interpretations.confidence);
//! println!("Pitch: {:.1} Hz ± {:.1}", report.avg_pitch_hz, report.pitch_std_hz);
//! # Ok::<(), vocal_traits::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! Audio Input → Decoding → Silence Trim → Feature Extraction → Scoring → Interpretation → Output
//! ```
//!
//! Every stage is synchronous and holds no shared state, so independent
//! recordings can be analyzed concurrently.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod upload;

#[cfg(feature = "server")]
pub mod server;

// Re-export main types
pub use analysis::interpretation::VoiceTrait;
pub use analysis::result::{AnalysisOutcome, Interpretations, ScoreSet, VoiceAnalysis};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::FeatureSet;
pub use io::AudioSignal;

use analysis::interpretation::interpret;
use analysis::scoring::{score, ScoringInputs};
use preprocessing::silence::{detect_and_trim, SilenceDetector};
use std::path::Path;
use std::time::Instant;

/// Main analysis function
///
/// Trims the signal, extracts features, scores and interprets them.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, nominally in [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `VoiceAnalysis` with rounded measurements, scores and labels
///
/// # Errors
///
/// Returns `AnalysisError::EmptyAudio` for an empty input, and other
/// variants for invalid parameters or processing failures. Pitch tracking
/// failures are not errors; they zero the pitch statistics.
///
/// # Example
///
/// ```no_run
/// use vocal_traits::{analyze_samples, AnalysisConfig};
///
/// let samples = vec![0.0f32; 16000 * 3]; // 3 seconds of silence
/// let report = analyze_samples(&samples, 16000, &AnalysisConfig::default())?;
/// # Ok::<(), vocal_traits::AnalysisError>(())
/// ```
pub fn analyze_samples(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<VoiceAnalysis, AnalysisError> {
    let start_time = Instant::now();

    log::debug!("Starting voice analysis: {} samples at {} Hz", samples.len(), sample_rate);

    if samples.is_empty() {
        return Err(AnalysisError::EmptyAudio);
    }

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    config.validate()?;

    // Silence trimming
    let detector = SilenceDetector {
        top_db: config.trim_top_db,
        frame_size: config.frame_size,
        hop_size: config.hop_size,
    };
    let (trimmed, (start, end)) = detect_and_trim(samples, &detector)?;

    if trimmed.is_empty() {
        return Err(AnalysisError::ProcessingError(
            "Audio is empty after trimming".to_string(),
        ));
    }
    log::debug!("Trimmed to samples [{}, {}) of {}", start, end, samples.len());

    // Feature extraction, scoring, interpretation
    let signal = AudioSignal::new(trimmed, sample_rate);
    let features = features::extract_features(&signal, config)?;
    let scores = score(&ScoringInputs::from(&features));
    let interpretations = interpret(&scores);

    log::debug!(
        "Voice analysis finished in {:.1} ms",
        start_time.elapsed().as_secs_f32() * 1000.0
    );

    Ok(VoiceAnalysis::new(&features, scores, interpretations))
}

/// Analyze a decoded signal
pub fn analyze_signal(
    signal: &AudioSignal,
    config: &AnalysisConfig,
) -> Result<VoiceAnalysis, AnalysisError> {
    analyze_samples(&signal.samples, signal.sample_rate, config)
}

/// Decode and analyze an audio file
///
/// The file is only read; it is never moved or deleted.
pub fn analyze_file<P: AsRef<Path>>(
    path: P,
    config: &AnalysisConfig,
) -> Result<VoiceAnalysis, AnalysisError> {
    let signal = io::decoder::decode_file(path)?;
    analyze_signal(&signal, config)
}

/// Decode and analyze an in-memory audio file
///
/// `extension` is an optional format hint such as `"wav"`.
pub fn analyze_bytes(
    bytes: Vec<u8>,
    extension: Option<&str>,
    config: &AnalysisConfig,
) -> Result<VoiceAnalysis, AnalysisError> {
    let signal = io::decoder::decode_bytes(bytes, extension)?;
    analyze_signal(&signal, config)
}

/// Analyze a file and fold any failure into an error record
///
/// This never fails: errors are logged (with the path) and reported as
/// `{"error": "<message>"}`, where the message does not include the path.
pub fn analyze_voice<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> AnalysisOutcome {
    let path = path.as_ref();
    let result = analyze_file(path, config);
    if let Err(err) = &result {
        log::error!("Voice analysis failed for {}: {}", path.display(), err);
    }
    AnalysisOutcome::from(result)
}

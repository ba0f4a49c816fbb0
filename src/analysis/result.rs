//! Analysis result types

use super::interpretation::VoiceTrait;
use crate::error::AnalysisError;
use crate::features::FeatureSet;
use serde::{Deserialize, Serialize};

/// Seven trait scores, each an integer in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    /// Loudness, steady delivery and few pauses
    pub confidence: u8,
    /// Loudness alone
    pub energy: u8,
    /// Quiet, steady pitch and unhurried tempo
    pub calmness: u8,
    /// Dark spectrum and stable timbre
    pub warmth: u8,
    /// Tempo mapped from 60-180 BPM
    pub speaking_speed: u8,
    /// Pitch spread up to 60 Hz
    pub pitch_variability: u8,
    /// Confidence, expressiveness and energy combined
    pub charm: u8,
}

impl ScoreSet {
    /// Score for one trait
    pub fn get(&self, trait_: VoiceTrait) -> u8 {
        match trait_ {
            VoiceTrait::Confidence => self.confidence,
            VoiceTrait::Energy => self.energy,
            VoiceTrait::Calmness => self.calmness,
            VoiceTrait::Warmth => self.warmth,
            VoiceTrait::SpeakingSpeed => self.speaking_speed,
            VoiceTrait::PitchVariability => self.pitch_variability,
            VoiceTrait::Charm => self.charm,
        }
    }
}

/// Human-readable label per trait (energy has none)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretations {
    /// Confidence label
    pub confidence: String,
    /// Calmness label
    pub calmness: String,
    /// Warmth label
    pub warmth: String,
    /// Speaking-speed label
    pub speaking_speed: String,
    /// Pitch-variability label
    pub pitch_variability: String,
    /// Charm label
    pub charm: String,
}

/// Successful analysis of one recording
///
/// Reported measurements are rounded for presentation; the scores were
/// computed from the unrounded features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceAnalysis {
    /// Trimmed duration in seconds (2 decimals)
    pub duration_seconds: f64,
    /// Mean voiced pitch in Hz (1 decimal)
    pub avg_pitch_hz: f64,
    /// Pitch standard deviation in Hz (1 decimal)
    pub pitch_std_hz: f64,
    /// Mean frame RMS (unrounded)
    pub rms: f64,
    /// Tempo in BPM (1 decimal)
    pub tempo_bpm: f64,
    /// Fraction of pause frames (3 decimals)
    pub pause_ratio: f64,
    /// Trait scores
    pub scores: ScoreSet,
    /// Trait labels
    pub interpretations: Interpretations,
}

impl VoiceAnalysis {
    /// Assemble the report from features, scores and labels
    pub fn new(features: &FeatureSet, scores: ScoreSet, interpretations: Interpretations) -> Self {
        Self {
            duration_seconds: round_to(features.duration_seconds, 2),
            avg_pitch_hz: round_to(features.avg_pitch_hz, 1),
            pitch_std_hz: round_to(features.pitch_std_hz, 1),
            rms: features.rms_global as f64,
            tempo_bpm: round_to(features.tempo_bpm, 1),
            pause_ratio: round_to(features.pause_ratio, 3),
            scores,
            interpretations,
        }
    }
}

fn round_to(value: f32, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value as f64 * scale).round_ties_even() / scale
}

/// Success record or `{"error": ...}` failure record
///
/// Serializes without a tag, so the JSON is either the [`VoiceAnalysis`]
/// object or an object holding only `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    /// Analysis completed
    Success(VoiceAnalysis),
    /// Analysis failed
    Failure {
        /// Error description
        error: String,
    },
}

impl AnalysisOutcome {
    /// True for a success record
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    /// Compact JSON text of the record
    pub fn to_json(&self) -> String {
        // Plain data with string keys always serializes
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!("{{\"error\":\"Serialization failed: {}\"}}", err)
        })
    }
}

impl From<Result<VoiceAnalysis, AnalysisError>> for AnalysisOutcome {
    fn from(result: Result<VoiceAnalysis, AnalysisError>) -> Self {
        match result {
            Ok(analysis) => AnalysisOutcome::Success(analysis),
            Err(err) => AnalysisOutcome::Failure {
                error: err.to_string(),
            },
        }
    }
}

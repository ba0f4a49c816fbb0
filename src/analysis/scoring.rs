//! Trait scoring
//!
//! Converts raw acoustic features into bounded trait scores with fixed
//! affine maps and weights. Every intermediate quantity is clamped to
//! [0, 1] before being scaled to an integer score, so any input, including
//! NaN and infinities, produces scores in [0, 100].
//!
//! # Scoring Model
//!
//! ```text
//! energy_norm    = clamp01((rms - 0.001) / 0.08)
//! confidence     = 0.6·energy_norm + 0.3·(1 - pause_ratio) + 0.1·(1 - clamp01(5·zcr))
//! calmness       = 0.5·(1 - energy_norm) + 0.3·(1 - clamp01(pitch_std / 50))
//!                + 0.2·(1 - clamp01(tempo / 140))
//! warmth         = 0.5·(1 - clamp01(centroid / 3000)) + 0.5·(1 - clamp01(timbre / 20))
//! speaking_speed = clamp01((tempo - 60) / 120)
//! pitch_var      = clamp01(pitch_std / 60)
//! charm          = 0.45·confidence + 0.35·pitch_var + 0.2·energy_norm
//! ```
//!
//! The weights are fixed heuristics, not learned from data.

use super::result::ScoreSet;
use crate::features::FeatureSet;

/// Features the scores depend on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringInputs {
    /// Mean frame RMS
    pub rms_global: f32,
    /// Fraction of pause frames
    pub pause_ratio: f32,
    /// Mean zero-crossing rate
    pub zero_crossing_rate: f32,
    /// Pitch standard deviation in Hz
    pub pitch_std_hz: f32,
    /// Tempo in BPM
    pub tempo_bpm: f32,
    /// Mean spectral centroid in Hz
    pub spectral_centroid: f32,
    /// Cepstral timbre variance
    pub timbral_variance: f32,
}

impl From<&FeatureSet> for ScoringInputs {
    fn from(features: &FeatureSet) -> Self {
        Self {
            rms_global: features.rms_global,
            pause_ratio: features.pause_ratio,
            zero_crossing_rate: features.zero_crossing_rate,
            pitch_std_hz: features.pitch_std_hz,
            tempo_bpm: features.tempo_bpm,
            spectral_centroid: features.spectral_centroid,
            timbral_variance: features.timbral_variance,
        }
    }
}

/// Clamp to [0, 1]; NaN maps to 0
pub fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Clamp, scale to 0-100 and round half to even
pub fn scale_to_score(x: f32) -> u8 {
    (clamp01(x) * 100.0).round_ties_even() as u8
}

/// Loudness normalized to [0, 1]
pub fn energy_norm(rms_global: f32) -> f32 {
    clamp01((rms_global - 0.001) / 0.08)
}

fn confidence_raw(inputs: &ScoringInputs, energy: f32) -> f32 {
    let pause_term = 1.0 - inputs.pause_ratio;
    let zcr_term = 1.0 - clamp01(inputs.zero_crossing_rate * 5.0);
    0.6 * energy + 0.3 * pause_term + 0.1 * zcr_term
}

fn calmness_raw(inputs: &ScoringInputs, energy: f32) -> f32 {
    let pitch_term = 0.3 * (1.0 - clamp01(inputs.pitch_std_hz / 50.0));
    let tempo_term = 0.2 * (1.0 - clamp01(inputs.tempo_bpm / 140.0));
    0.5 * (1.0 - energy) + pitch_term + tempo_term
}

fn warmth_raw(inputs: &ScoringInputs) -> f32 {
    0.5 * (1.0 - clamp01(inputs.spectral_centroid / 3000.0))
        + 0.5 * (1.0 - clamp01(inputs.timbral_variance / 20.0))
}

fn speed_norm(inputs: &ScoringInputs) -> f32 {
    clamp01((inputs.tempo_bpm - 60.0) / 120.0)
}

fn pitch_variability_norm(inputs: &ScoringInputs) -> f32 {
    clamp01(inputs.pitch_std_hz / 60.0)
}

/// Compute all seven trait scores
pub fn score(inputs: &ScoringInputs) -> ScoreSet {
    let energy = energy_norm(inputs.rms_global);
    let confidence = confidence_raw(inputs, energy);
    let pitch_variability = pitch_variability_norm(inputs);
    let charm = 0.45 * confidence + 0.35 * pitch_variability + 0.2 * energy;

    let scores = ScoreSet {
        confidence: scale_to_score(confidence),
        energy: scale_to_score(energy),
        calmness: scale_to_score(calmness_raw(inputs, energy)),
        warmth: scale_to_score(warmth_raw(inputs)),
        speaking_speed: scale_to_score(speed_norm(inputs)),
        pitch_variability: scale_to_score(pitch_variability),
        charm: scale_to_score(charm),
    };

    log::debug!("Scores: {:?}", scores);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::interpretation::VoiceTrait;

    fn inputs() -> ScoringInputs {
        ScoringInputs {
            rms_global: 0.05,
            pause_ratio: 0.1,
            zero_crossing_rate: 0.05,
            pitch_std_hz: 20.0,
            tempo_bpm: 110.0,
            spectral_centroid: 1500.0,
            timbral_variance: 10.0,
        }
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(7.0), 1.0);
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(f32::INFINITY), 1.0);
        assert_eq!(clamp01(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_scale_rounds_half_to_even() {
        assert_eq!(scale_to_score(0.125), 12);
        assert_eq!(scale_to_score(0.135), 14);
        assert_eq!(scale_to_score(1.5), 100);
    }

    #[test]
    fn test_energy_norm_monotonic() {
        let mut prev = energy_norm(0.0);
        for i in 1..=100 {
            let e = energy_norm(i as f32 * 0.001);
            assert!(e >= prev);
            prev = e;
        }
        assert_eq!(energy_norm(0.0), 0.0);
        assert_eq!(energy_norm(0.1), 1.0);
        assert!(energy_norm(0.041) > energy_norm(0.021));
    }

    #[test]
    fn test_calmness_term_boundary() {
        // Maximal energy removes the energy term, leaving only the pitch term
        let calm = ScoringInputs {
            rms_global: 1.0,
            pitch_std_hz: 0.0,
            tempo_bpm: 140.0,
            ..inputs()
        };
        let raw = calmness_raw(&calm, energy_norm(calm.rms_global));
        assert!((raw - 0.3).abs() < 1e-6);
        assert_eq!(score(&calm).calmness, 30);
    }

    #[test]
    fn test_reference_scores() {
        let s = score(&inputs());
        // energy_norm = 0.049 / 0.08 = 0.6125
        assert_eq!(s.energy, 61);
        // 0.6·0.6125 + 0.3·0.9 + 0.1·0.75 = 0.7125
        assert_eq!(s.confidence, 71);
        // (110 - 60) / 120 = 0.4167
        assert_eq!(s.speaking_speed, 42);
        // 20 / 60 = 0.3333
        assert_eq!(s.pitch_variability, 33);
        // 0.5·0.5 + 0.5·0.5
        assert_eq!(s.warmth, 50);
    }

    #[test]
    fn test_extreme_inputs_stay_in_range() {
        let extremes = [
            f32::NAN,
            f32::INFINITY,
            f32::NEG_INFINITY,
            -1e30,
            1e30,
            0.0,
        ];
        for &x in &extremes {
            let s = score(&ScoringInputs {
                rms_global: x,
                pause_ratio: x,
                zero_crossing_rate: x,
                pitch_std_hz: x,
                tempo_bpm: x,
                spectral_centroid: x,
                timbral_variance: x,
            });
            for t in VoiceTrait::ALL {
                assert!(s.get(t) <= 100, "{:?} = {} for input {}", t, s.get(t), x);
            }
        }
    }
}

//! Score interpretation
//!
//! Each trait except energy maps its score to one of three fixed labels.
//! A score strictly above the trait's high threshold is `High`, strictly
//! below its low threshold is `Low`, and anything in between (including the
//! thresholds themselves) is `Mid`.

use super::result::{Interpretations, ScoreSet};
use serde::{Deserialize, Serialize};

/// The scored voice traits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceTrait {
    /// Confidence
    Confidence,
    /// Energy (scored, never interpreted)
    Energy,
    /// Calmness
    Calmness,
    /// Warmth
    Warmth,
    /// Speaking speed
    SpeakingSpeed,
    /// Pitch variability
    PitchVariability,
    /// Charm
    Charm,
}

impl VoiceTrait {
    /// All traits in report order
    pub const ALL: [VoiceTrait; 7] = [
        VoiceTrait::Confidence,
        VoiceTrait::Energy,
        VoiceTrait::Calmness,
        VoiceTrait::Warmth,
        VoiceTrait::SpeakingSpeed,
        VoiceTrait::PitchVariability,
        VoiceTrait::Charm,
    ];

    /// Field name used in the JSON report
    pub fn name(&self) -> &'static str {
        match self {
            VoiceTrait::Confidence => "confidence",
            VoiceTrait::Energy => "energy",
            VoiceTrait::Calmness => "calmness",
            VoiceTrait::Warmth => "warmth",
            VoiceTrait::SpeakingSpeed => "speaking_speed",
            VoiceTrait::PitchVariability => "pitch_variability",
            VoiceTrait::Charm => "charm",
        }
    }

    /// `(high, low)` thresholds, or `None` for traits without labels
    fn thresholds(&self) -> Option<(u8, u8)> {
        match self {
            VoiceTrait::Confidence => Some((65, 40)),
            VoiceTrait::Energy => None,
            VoiceTrait::Calmness => Some((65, 40)),
            VoiceTrait::Warmth => Some((60, 40)),
            VoiceTrait::SpeakingSpeed => Some((70, 30)),
            VoiceTrait::PitchVariability => Some((65, 30)),
            VoiceTrait::Charm => Some((65, 35)),
        }
    }

    /// `(high, mid, low)` label texts
    fn labels(&self) -> Option<(&'static str, &'static str, &'static str)> {
        match self {
            VoiceTrait::Confidence => Some((
                "Speaks with conviction and presence.",
                "Moderately confident.",
                "Somewhat hesitant or soft-spoken.",
            )),
            VoiceTrait::Energy => None,
            VoiceTrait::Calmness => Some((
                "Very calm and steady.",
                "Relatively balanced.",
                "A bit tense or energetic.",
            )),
            VoiceTrait::Warmth => Some((
                "Warm, soothing timbre.",
                "Pleasant tone.",
                "Neutral or bright tone.",
            )),
            VoiceTrait::SpeakingSpeed => Some(("Fast speaker", "Moderate pace", "Slow speaker")),
            VoiceTrait::PitchVariability => {
                Some(("Expressive voice", "Some variation", "Monotone"))
            }
            VoiceTrait::Charm => Some(("Outgoing & lively", "Friendly", "Reserved")),
        }
    }
}

/// Score band relative to a trait's thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Above the high threshold
    High,
    /// Between the thresholds, inclusive
    Mid,
    /// Below the low threshold
    Low,
}

/// Band of a score for a trait, `None` for energy
pub fn band(trait_: VoiceTrait, score: u8) -> Option<Band> {
    let (high, low) = trait_.thresholds()?;
    Some(if score > high {
        Band::High
    } else if score < low {
        Band::Low
    } else {
        Band::Mid
    })
}

/// Label text of a score for a trait, `None` for energy
pub fn describe(trait_: VoiceTrait, score: u8) -> Option<&'static str> {
    let (high, mid, low) = trait_.labels()?;
    band(trait_, score).map(|b| match b {
        Band::High => high,
        Band::Mid => mid,
        Band::Low => low,
    })
}

/// Label every interpreted trait of a score set
pub fn interpret(scores: &ScoreSet) -> Interpretations {
    let label = |t: VoiceTrait| describe(t, scores.get(t)).unwrap_or_default().to_string();

    Interpretations {
        confidence: label(VoiceTrait::Confidence),
        calmness: label(VoiceTrait::Calmness),
        warmth: label(VoiceTrait::Warmth),
        speaking_speed: label(VoiceTrait::SpeakingSpeed),
        pitch_variability: label(VoiceTrait::PitchVariability),
        charm: label(VoiceTrait::Charm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_boundaries() {
        assert_eq!(describe(VoiceTrait::Confidence, 66), Some("Speaks with conviction and presence."));
        assert_eq!(describe(VoiceTrait::Confidence, 65), Some("Moderately confident."));
        assert_eq!(describe(VoiceTrait::Confidence, 40), Some("Moderately confident."));
        assert_eq!(describe(VoiceTrait::Confidence, 39), Some("Somewhat hesitant or soft-spoken."));
    }

    #[test]
    fn test_per_trait_thresholds() {
        assert_eq!(band(VoiceTrait::Warmth, 61), Some(Band::High));
        assert_eq!(band(VoiceTrait::Warmth, 60), Some(Band::Mid));
        assert_eq!(band(VoiceTrait::SpeakingSpeed, 70), Some(Band::Mid));
        assert_eq!(band(VoiceTrait::SpeakingSpeed, 29), Some(Band::Low));
        assert_eq!(band(VoiceTrait::Charm, 35), Some(Band::Mid));
        assert_eq!(band(VoiceTrait::Charm, 34), Some(Band::Low));
        assert_eq!(band(VoiceTrait::Energy, 100), None);
    }

    #[test]
    fn test_interpret_all() {
        let scores = ScoreSet {
            confidence: 100,
            energy: 0,
            calmness: 0,
            warmth: 50,
            speaking_speed: 71,
            pitch_variability: 0,
            charm: 66,
        };
        let labels = interpret(&scores);
        assert_eq!(labels.confidence, "Speaks with conviction and presence.");
        assert_eq!(labels.calmness, "A bit tense or energetic.");
        assert_eq!(labels.warmth, "Pleasant tone.");
        assert_eq!(labels.speaking_speed, "Fast speaker");
        assert_eq!(labels.pitch_variability, "Monotone");
        assert_eq!(labels.charm, "Outgoing & lively");
    }

    #[test]
    fn test_trait_names_match_serde() {
        for t in VoiceTrait::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.name()));
        }
    }
}

//! Error types for the voice analysis pipeline

use std::fmt;

/// Errors that can occur during voice analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Decoding produced no samples
    EmptyAudio,

    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Pitch tracking failed; recovered inside feature extraction
    PitchExtraction(String),

    /// Processing error during analysis
    ProcessingError(String),

    /// Numerical error (non-finite feature, overflow, etc.)
    NumericalError(String),

    /// Filesystem error while reading audio or handling uploads
    Io(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::EmptyAudio => write!(f, "Empty audio"),
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::PitchExtraction(msg) => write!(f, "Pitch extraction error: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            AnalysisError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for AnalysisError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AnalysisError::DecodingError(err.to_string())
    }
}

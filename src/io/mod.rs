//! Audio I/O modules
//!
//! Audio decoding using Symphonia and the decoded signal type.

pub mod decoder;

/// Decoded mono audio at its native sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    /// Mono samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioSignal {
    /// Wrap samples and their sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the signal holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signal length in seconds (0.0 for a zero sample rate)
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

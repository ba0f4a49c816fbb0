//! Audio preprocessing modules
//!
//! This module contains utilities for preparing a decoded signal for analysis:
//! - Channel mixing (interleaved multi-channel to mono)
//! - Leading/trailing silence trimming

pub mod channel_mixer;
pub mod silence;

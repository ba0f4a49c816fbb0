//! Analysis and result aggregation modules
//!
//! Turns a [`FeatureSet`](crate::features::FeatureSet) into the final report:
//! - Trait scoring
//! - Score interpretation
//! - Result types

pub mod interpretation;
pub mod result;
pub mod scoring;

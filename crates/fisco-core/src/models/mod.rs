//! Data models for extraction results and scoring configuration.

pub mod config;
pub mod extraction;

pub use config::{AmountWeights, ConfidenceWeights, DateWeights, ScoreProfile, TextProfile};
pub use extraction::ExtractionResult;

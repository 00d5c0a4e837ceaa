//! Error types for the analysis pipeline.
//!
//! Per-source failures (`SourceError`) are isolated by the controller; audio
//! failures (`AudioAnalysisError`) are fatal for the audio step only.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid frame rate ({fps}) for source {source_id}")]
    InvalidFrameRate { source_id: String, fps: f64 },

    #[error("source {0} has no readable frames")]
    Empty(String),

    #[error("failed to read frame {index} of source {source_id}: {reason}")]
    FrameRead {
        source_id: String,
        index: u64,
        reason: String,
    },

    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}

#[derive(Debug, Error)]
pub enum AudioAnalysisError {
    #[error("could not estimate a valid tempo")]
    NoTempo,

    #[error("could not determine audio duration")]
    InvalidDuration,

    #[error("invalid start offset ({0})")]
    InvalidOffset(f64),

    #[error("audio analysis failed for {path}: {reason}")]
    Analyzer { path: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum StyleError {
    #[error("style must define at least one multiplier")]
    NoMultipliers,

    #[error("multipliers must be positive")]
    ZeroMultiplier,

    #[error("expected {expected} weights, got {actual}")]
    WeightLength { expected: usize, actual: usize },

    #[error("weights must be finite and non-negative")]
    InvalidWeight,
}

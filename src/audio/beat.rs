use serde::{Deserialize, Serialize};

use crate::error::AudioAnalysisError;

/// Beat parameters of the soundtrack, all in seconds except `tempo` (BPM).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatInfo {
    pub tempo: f64,
    pub beat_duration: f64,
    pub start_offset: f64,
    pub total_duration: f64,
}

impl BeatInfo {
    pub fn from_tempo(
        tempo: f64,
        start_offset: f64,
        total_duration: f64,
    ) -> Result<Self, AudioAnalysisError> {
        if !tempo.is_finite() || tempo <= 0.0 {
            return Err(AudioAnalysisError::NoTempo);
        }
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(AudioAnalysisError::InvalidDuration);
        }
        if !start_offset.is_finite() || start_offset < 0.0 {
            return Err(AudioAnalysisError::InvalidOffset(start_offset));
        }

        Ok(Self {
            tempo,
            beat_duration: 60.0 / tempo,
            start_offset,
            total_duration,
        })
    }
}

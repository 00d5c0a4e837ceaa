use crate::error::AudioAnalysisError;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Tempi derived from beat intervals must fall strictly inside this range.
pub const MIN_PLAUSIBLE_BPM: f64 = 30.0;
pub const MAX_PLAUSIBLE_BPM: f64 = 300.0;

fn usable(tempo: Option<f64>) -> Option<f64> {
    tempo.filter(|t| t.is_finite() && *t > 0.0)
}

/// Median gap between consecutive beat times, if there are at least two.
pub fn median_beat_interval(beat_times: &[f64]) -> Option<f64> {
    let mut gaps: Vec<f64> = beat_times
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| gap.is_finite())
        .collect();
    if gaps.is_empty() {
        return None;
    }
    gaps.sort_by(|a, b| a.total_cmp(b));

    let mid = gaps.len() / 2;
    Some(if gaps.len() % 2 == 0 {
        (gaps[mid - 1] + gaps[mid]) / 2.0
    } else {
        gaps[mid]
    })
}

/// Pick a tempo from a beat tracker's outputs.
///
/// Preference order: the tracker's own tempo, then the tempo implied by the
/// median beat interval (only if it is a plausible BPM), then a global
/// rhythm estimate.
pub fn resolve_tempo(
    tracked: Option<f64>,
    beat_times: &[f64],
    global_estimate: Option<f64>,
) -> Result<f64, AudioAnalysisError> {
    if let Some(tempo) = usable(tracked) {
        return Ok(tempo);
    }

    if let Some(interval) = median_beat_interval(beat_times).filter(|i| *i > 0.0) {
        let tempo = 60.0 / interval;
        if tempo > MIN_PLAUSIBLE_BPM && tempo < MAX_PLAUSIBLE_BPM {
            log_debug!("tempo from median beat interval: {:.2} BPM", tempo);
            return Ok(tempo);
        }
        log_debug!("implausible interval tempo {:.2} BPM ignored", tempo);
    }

    if let Some(tempo) = usable(global_estimate) {
        log_debug!("tempo from global estimate: {:.2} BPM", tempo);
        return Ok(tempo);
    }

    log_warn!("no usable tempo estimate");
    Err(AudioAnalysisError::NoTempo)
}

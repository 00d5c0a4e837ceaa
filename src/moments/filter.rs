use crate::models::{Moment, Segment};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Moments need to last at least this many beats to be kept.
pub const MIN_MOMENT_BEATS: f64 = 2.0;

/// Result of filtering one source's segments.
#[derive(Debug, Clone, Default)]
pub struct FilteredMoments {
    pub primary: Vec<Moment>,
    pub other: Vec<Moment>,
    pub discarded: usize,
}

impl FilteredMoments {
    pub fn total(&self) -> usize {
        self.primary.len() + self.other.len()
    }
}

/// Minimum moment length for a beat duration; zero (filter disabled) when
/// the beat duration is missing or not positive.
pub fn min_moment_duration(beat_duration: Option<f64>) -> f64 {
    match beat_duration {
        Some(beat) if beat > 0.0 => beat * MIN_MOMENT_BEATS,
        _ => 0.0,
    }
}

/// Drop segments shorter than `min_duration` and partition the rest into
/// primary-subject and other moments, preserving input order.
///
/// A `min_duration <= 0` keeps every segment.
pub fn filter_segments(segments: Vec<Segment>, min_duration: f64) -> FilteredMoments {
    let mut result = FilteredMoments::default();
    let filter_enabled = min_duration > 0.0;

    for segment in segments {
        if filter_enabled && segment.duration_secs() < min_duration {
            result.discarded += 1;
            continue;
        }

        let moment = Moment::from_segment(segment);
        if moment.is_primary() {
            result.primary.push(moment);
        } else {
            result.other.push(moment);
        }
    }

    log_debug!(
        "kept {} primary, {} other moments (>= {:.3}s); discarded {}",
        result.primary.len(),
        result.other.len(),
        min_duration,
        result.discarded
    );

    result
}

/// Filter with the beat-derived minimum.
pub fn run_filter(segments: Vec<Segment>, beat_duration: f64) -> FilteredMoments {
    filter_segments(segments, min_moment_duration(Some(beat_duration)))
}

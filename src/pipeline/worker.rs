use std::time::{Duration, Instant};

use crate::error::SourceError;
use crate::moments::{filter_segments, FilteredMoments};
use crate::segmentation::SegmentationConfig;
use crate::sensing::{run_segmentation, FrameClassifier, FrameSource};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// What one source contributed to the session.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub source_id: String,
    pub segments: usize,
    pub moments: FilteredMoments,
    pub elapsed: Duration,
}

/// Segment one source and keep the moments at least `min_moment_secs` long.
///
/// Blocking: classifies every sampled frame. Run it off the async runtime.
pub fn analyze_source(
    source: &mut dyn FrameSource,
    classifier: &dyn FrameClassifier,
    config: &SegmentationConfig,
    min_moment_secs: f64,
) -> Result<SourceOutcome, SourceError> {
    let started = Instant::now();
    let source_id = source.id().to_string();
    log_info!(
        "analyzing {} ({:.1}s @ {:.2} fps)",
        source_id,
        source.duration_secs(),
        source.fps()
    );

    let segments = run_segmentation(source, classifier, config)?;
    let segment_count = segments.len();
    let moments = filter_segments(segments, min_moment_secs);
    let elapsed = started.elapsed();

    log_info!(
        "{}: {} segments -> {} moments ({} primary, {} discarded) in {:?}",
        source_id,
        segment_count,
        moments.total(),
        moments.primary.len(),
        moments.discarded,
        elapsed
    );

    Ok(SourceOutcome {
        source_id,
        segments: segment_count,
        moments,
        elapsed,
    })
}

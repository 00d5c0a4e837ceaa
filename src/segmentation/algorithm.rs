use crate::models::{RawInstant, SceneLabel, Segment};
use crate::segmentation::merge::merge_adjacent;

/// An open run of identically labeled instants.
#[derive(Debug, Clone)]
struct OpenRun {
    label: SceneLabel,
    start: f64,
}

impl OpenRun {
    /// Close the run at `end`. Background and zero-length runs are dropped.
    fn close(self, end: f64, source_id: &str) -> Option<Segment> {
        if self.label.is_background() || end <= self.start {
            return None;
        }
        Some(Segment {
            start: self.start,
            end,
            label: self.label,
            source_id: source_id.to_string(),
        })
    }
}

/// Main segmentation function: one pass to split on label changes, then
/// gap-merge same-label neighbours.
///
/// Instants must be in non-decreasing timestamp order; they are not re-sorted.
pub fn segment_instants<I>(source_id: &str, instants: I, merge_gap: f64) -> Vec<Segment>
where
    I: IntoIterator<Item = RawInstant>,
{
    let segments = group_instants(source_id, instants);
    merge_adjacent(segments, merge_gap)
}

/// Split a labeled stream into segments at every label transition.
///
/// A run opens at the first instant's timestamp (whatever its label), closes
/// at the timestamp of the instant whose label differs, and the final run
/// closes at the last instant's timestamp.
pub fn group_instants<I>(source_id: &str, instants: I) -> Vec<Segment>
where
    I: IntoIterator<Item = RawInstant>,
{
    let mut segments = Vec::new();
    let mut current: Option<OpenRun> = None;
    let mut last_timestamp = 0.0;

    for instant in instants {
        match current.take() {
            Some(run) if run.label == instant.label => {
                current = Some(run);
            }
            Some(run) => {
                segments.extend(run.close(instant.timestamp, source_id));
                current = Some(OpenRun {
                    label: instant.label,
                    start: instant.timestamp,
                });
            }
            None => {
                current = Some(OpenRun {
                    label: instant.label,
                    start: instant.timestamp,
                });
            }
        }
        last_timestamp = instant.timestamp;
    }

    // Push final run
    if let Some(run) = current {
        segments.extend(run.close(last_timestamp, source_id));
    }

    segments
}

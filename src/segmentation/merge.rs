use crate::models::Segment;

/// Fuse consecutive same-label segments separated by at most `merge_gap` seconds.
///
/// Expects segments ordered by start time. A later segment is folded into the
/// running one when labels match and `0 <= next.start - current.end <= merge_gap`;
/// the fused end is the max of both ends. Re-running on its own output is a no-op.
pub fn merge_adjacent(segments: Vec<Segment>, merge_gap: f64) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());

    for segment in segments {
        match merged.last_mut() {
            Some(current) if current.label == segment.label => {
                let gap = segment.start - current.end;
                if gap >= 0.0 && gap <= merge_gap {
                    current.end = current.end.max(segment.end);
                    continue;
                }
                merged.push(segment);
            }
            _ => merged.push(segment),
        }
    }

    merged
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::segment::Moment;

/// A moment paired with its simulated on-timeline duration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreparedClip {
    pub moment: Moment,
    pub duration_secs: f64,
}

/// All simulated clips for one style, with their cached total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipPool {
    style: String,
    clips: Vec<PreparedClip>,
    total_duration: f64,
}

impl ClipPool {
    pub fn new(style: impl Into<String>, clips: Vec<PreparedClip>) -> Self {
        let total_duration = clips.iter().map(|clip| clip.duration_secs).sum();
        Self {
            style: style.into(),
            clips,
            total_duration,
        }
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn clips(&self) -> &[PreparedClip] {
        &self.clips
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Duration budget for the final edit, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct TargetDuration(f64);

impl TargetDuration {
    pub fn new(secs: f64) -> Self {
        Self(secs)
    }

    /// Clamp a requested target to `[min_secs, min(audio, pool_total)]`.
    /// Upper bounds that are missing or non-positive are ignored; the lower
    /// bound always wins.
    pub fn bounded(
        requested: f64,
        min_secs: f64,
        audio_duration: Option<f64>,
        pool_total: f64,
    ) -> Self {
        let audio_cap = audio_duration
            .filter(|secs| *secs > 0.0)
            .unwrap_or(f64::INFINITY);
        let pool_cap = if pool_total > 0.0 {
            pool_total
        } else {
            f64::INFINITY
        };
        let max_target = audio_cap.min(pool_cap);

        Self(requested.min(max_target).max(min_secs))
    }

    pub fn secs(&self) -> f64 {
        self.0
    }
}

/// The clips chosen by the allocator: a read-only view into a pool.
#[derive(Debug, Clone)]
pub struct FinalClipSet {
    pool: Arc<ClipPool>,
    indices: Vec<usize>,
}

impl FinalClipSet {
    pub(crate) fn new(pool: Arc<ClipPool>, indices: Vec<usize>) -> Self {
        Self { pool, indices }
    }

    /// Positions of the selected clips within the pool.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreparedClip> + '_ {
        self.indices.iter().map(move |&i| &self.pool.clips[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.iter().map(|clip| clip.duration_secs).sum()
    }

    /// Selected moments split into (primary, other) for downstream emission.
    pub fn split(&self) -> (Vec<&Moment>, Vec<&Moment>) {
        self.iter()
            .map(|clip| &clip.moment)
            .partition(|moment| moment.is_primary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_capped_by_audio_and_pool() {
        let t = TargetDuration::bounded(500.0, 1.0, Some(120.0), 90.0);
        assert_eq!(t.secs(), 90.0);

        let t = TargetDuration::bounded(500.0, 1.0, Some(60.0), 90.0);
        assert_eq!(t.secs(), 60.0);
    }

    #[test]
    fn target_never_drops_below_minimum() {
        let t = TargetDuration::bounded(0.2, 1.0, Some(60.0), 90.0);
        assert_eq!(t.secs(), 1.0);
    }

    #[test]
    fn missing_caps_leave_request_untouched() {
        let t = TargetDuration::bounded(42.0, 1.0, None, 0.0);
        assert_eq!(t.secs(), 42.0);
    }

    #[test]
    fn pool_total_tracks_clip_sum() {
        let pool = ClipPool::new("Standard", Vec::new());
        assert!(pool.is_empty());
        assert_eq!(pool.total_duration(), 0.0);
    }
}

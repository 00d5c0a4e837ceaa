use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::audio::BeatInfo;
use crate::models::{ClipPool, FinalClipSet};
use crate::moments::MomentPool;

use super::summary::SourceFailure;

/// The analysis run currently allowed to publish.
#[derive(Debug, Clone)]
pub struct ActiveRun {
    pub id: Uuid,
    pub token: CancellationToken,
}

/// Everything one session has committed so far.
///
/// Pools are published as whole `Arc` snapshots; readers never see a pool
/// while it is being built.
#[derive(Debug, Default)]
pub struct SessionState {
    pub active_run: Option<ActiveRun>,
    pub audio_path: Option<PathBuf>,
    pub beat: Option<BeatInfo>,
    pub audio_analysis_secs: Option<f64>,
    pub video_analysis_secs: Option<f64>,
    pub moments: Arc<MomentPool>,
    pub clips: Option<Arc<ClipPool>>,
    pub selection: Option<FinalClipSet>,
    pub errors: Vec<SourceFailure>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, run_id: Uuid) -> bool {
        self.active_run
            .as_ref()
            .map(|run| run.id == run_id)
            .unwrap_or(false)
    }

    /// Cancel and forget the active run, if any.
    pub fn cancel_run(&mut self) -> Option<Uuid> {
        self.active_run.take().map(|run| {
            run.token.cancel();
            run.id
        })
    }

    /// Start a fresh analysis run; supersedes any run still in flight.
    pub fn begin_run(&mut self) -> ActiveRun {
        self.reset_analysis();
        let run = ActiveRun {
            id: Uuid::new_v4(),
            token: CancellationToken::new(),
        };
        self.active_run = Some(run.clone());
        run
    }

    /// Cancel any run and drop everything derived from the sources: moments,
    /// clips, selection and per-source errors.
    pub fn reset_analysis(&mut self) {
        self.cancel_run();
        self.moments = Arc::new(MomentPool::new());
        self.invalidate_clips();
        self.errors.clear();
        self.video_analysis_secs = None;
        self.touch();
    }

    /// Drop simulated and selected clips; they are stale once the beat or
    /// the moment pool changes.
    pub fn invalidate_clips(&mut self) {
        self.clips = None;
        self.selection = None;
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_supersedes_previous() {
        let mut state = SessionState::new();
        let first = state.begin_run();
        let second = state.begin_run();

        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert!(!state.is_active(first.id));
        assert!(state.is_active(second.id));
    }

    #[test]
    fn cancel_clears_active_run() {
        let mut state = SessionState::new();
        let run = state.begin_run();
        assert_eq!(state.cancel_run(), Some(run.id));
        assert!(run.token.is_cancelled());
        assert!(state.active_run.is_none());
        assert_eq!(state.cancel_run(), None);
    }

    #[test]
    fn reset_analysis_keeps_audio_but_drops_source_results() {
        let mut state = SessionState::new();
        state.beat = BeatInfo::from_tempo(120.0, 0.0, 60.0).ok();
        state.audio_path = Some(PathBuf::from("song.mp3"));
        let run = state.begin_run();
        state.errors.push(SourceFailure {
            source_id: "bad.mp4".to_string(),
            message: "unreadable".to_string(),
        });
        state.video_analysis_secs = Some(1.5);

        state.reset_analysis();
        assert!(run.token.is_cancelled());
        assert!(state.active_run.is_none());
        assert!(state.errors.is_empty());
        assert!(state.moments.is_empty());
        assert!(state.video_analysis_secs.is_none());
        assert!(state.beat.is_some());
        assert!(state.audio_path.is_some());
    }
}

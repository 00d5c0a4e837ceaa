use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    audio::{AudioAnalyzer, BeatInfo},
    clips::{allocate, simulate_pool, MultiplierPicker, RngPicker},
    error::SourceError,
    models::{ClipPool, FinalClipSet, TargetDuration},
    moments::MomentPool,
    sensing::{DetectorHandle, FrameSource},
    settings::PipelineSettings,
    styles::StyleRegistry,
};

use super::{
    state::SessionState,
    summary::{AnalysisReport, SessionSummary, SourceFailure, TargetRange},
    worker::{analyze_source, SourceOutcome},
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Drives one editing session: audio analysis, per-source moment
/// extraction, then cheap re-simulation and allocation on demand.
#[derive(Clone)]
pub struct PipelineController {
    state: Arc<Mutex<SessionState>>,
    settings: Arc<PipelineSettings>,
    styles: Arc<StyleRegistry>,
    detector: Arc<DetectorHandle>,
    analyzer: Arc<dyn AudioAnalyzer>,
}

impl PipelineController {
    pub fn new(
        settings: PipelineSettings,
        detector: DetectorHandle,
        analyzer: Arc<dyn AudioAnalyzer>,
    ) -> Result<Self> {
        let styles = settings.style_registry()?;
        Ok(Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            settings: Arc::new(settings),
            styles: Arc::new(styles),
            detector: Arc::new(detector),
            analyzer,
        })
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub async fn beat(&self) -> Option<BeatInfo> {
        self.state.lock().await.beat
    }

    pub async fn moments(&self) -> Arc<MomentPool> {
        Arc::clone(&self.state.lock().await.moments)
    }

    pub async fn clips(&self) -> Option<Arc<ClipPool>> {
        self.state.lock().await.clips.clone()
    }

    pub async fn selection(&self) -> Option<FinalClipSet> {
        self.state.lock().await.selection.clone()
    }

    /// Extract beat parameters from the soundtrack. A failure leaves the
    /// previous beat info in place; a success starts the session over from
    /// the sources, since every moment was filtered against the old beat.
    pub async fn analyze_audio(&self, path: impl AsRef<Path>) -> Result<BeatInfo> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let analyzer = Arc::clone(&self.analyzer);
        let started = Instant::now();

        let task_path = path.clone();
        let beat = tokio::task::spawn_blocking(move || analyzer.analyze(&task_path))
            .await
            .context("audio analysis task failed to join")?
            .with_context(|| format!("Failed to analyze audio {}", path.display()))?;
        let elapsed = started.elapsed().as_secs_f64();

        log_info!(
            "audio {}: {:.1} BPM, beat {:.3}s, offset {:.2}s, {:.1}s long (analyzed in {:.2}s)",
            path.display(),
            beat.tempo,
            beat.beat_duration,
            beat.start_offset,
            beat.total_duration,
            elapsed
        );

        let mut state = self.state.lock().await;
        if let Some(run_id) = state.active_run.as_ref().map(|run| run.id) {
            log_warn!("new audio loaded, cancelling run {}", run_id);
        }
        if !state.moments.is_empty() {
            log_info!(
                "new audio loaded, dropping {} moments from the previous beat",
                state.moments.len()
            );
        }
        state.reset_analysis();
        state.beat = Some(beat);
        state.audio_path = Some(path);
        state.audio_analysis_secs = Some(elapsed);
        Ok(beat)
    }

    /// Segment and filter every source, one at a time, into a fresh moment
    /// pool.
    ///
    /// Each finished source is committed immediately, so a later
    /// cancellation or critical failure keeps what earlier sources found.
    /// A source-level error is recorded and the run moves on.
    ///
    /// Fails without touching the session when no audio has been analyzed,
    /// since the minimum moment length comes from the beat.
    pub async fn analyze_sources(
        &self,
        sources: Vec<Box<dyn FrameSource>>,
    ) -> Result<AnalysisReport> {
        if self.state.lock().await.beat.is_none() {
            bail!("audio has not been analyzed yet");
        }

        let classifier = self.detector.acquire().map_err(|err| {
            anyhow!(SourceError::ClassifierUnavailable(format!("{err:#}")))
        })?;

        let (run, min_moment_secs) = {
            let mut state = self.state.lock().await;
            let beat = state
                .beat
                .ok_or_else(|| anyhow!("audio has not been analyzed yet"))?;
            (state.begin_run(), self.settings.min_moment_secs(beat.beat_duration))
        };

        log_info!("run {}: analyzing {} sources", run.id, sources.len());
        let started = Instant::now();
        let config = self.settings.segmentation_config();

        let mut report = AnalysisReport {
            run_id: run.id,
            processed: 0,
            moments_found: 0,
            errors: Vec::new(),
            critical: None,
            cancelled: false,
        };

        for mut source in sources {
            if run.token.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let source_id = source.id().to_string();
            let classifier = Arc::clone(&classifier);
            let config = config.clone();
            let task = tokio::task::spawn_blocking(move || {
                analyze_source(source.as_mut(), classifier.as_ref(), &config, min_moment_secs)
            });

            let joined = task.await;
            if run.token.is_cancelled() {
                log_info!("run {}: cancelled, discarding {}", run.id, source_id);
                report.cancelled = true;
                break;
            }

            match joined {
                Ok(Ok(outcome)) => {
                    let found = outcome.moments.total();
                    if !self.commit(run.id, outcome).await {
                        report.cancelled = true;
                        break;
                    }
                    report.processed += 1;
                    report.moments_found += found;
                }
                Ok(Err(err)) => {
                    log_warn!("run {}: skipping {}: {}", run.id, source_id, err);
                    let failure = SourceFailure {
                        source_id,
                        message: err.to_string(),
                    };
                    self.record_failure(run.id, failure.clone()).await;
                    report.errors.push(failure);
                }
                Err(join_err) => {
                    let message = format!("analysis of {source_id} aborted: {join_err}");
                    log_error!("run {}: {}; stopping run", run.id, message);
                    let failure = SourceFailure {
                        source_id,
                        message: message.clone(),
                    };
                    self.record_failure(run.id, failure.clone()).await;
                    report.errors.push(failure);
                    report.critical = Some(message);
                    break;
                }
            }
        }

        let elapsed = started.elapsed().as_secs_f64();
        {
            let mut state = self.state.lock().await;
            if state.is_active(run.id) {
                state.active_run = None;
                state.video_analysis_secs = Some(elapsed);
                state.touch();
            }
        }

        log_info!(
            "run {}: {} sources processed, {} moments, {} errors in {:.2}s{}",
            run.id,
            report.processed,
            report.moments_found,
            report.errors.len(),
            elapsed,
            if report.cancelled { " (cancelled)" } else { "" }
        );

        Ok(report)
    }

    async fn commit(&self, run_id: Uuid, outcome: SourceOutcome) -> bool {
        let mut state = self.state.lock().await;
        if !state.is_active(run_id) {
            log_info!(
                "run {} superseded, dropping results for {}",
                run_id,
                outcome.source_id
            );
            return false;
        }

        log_info!(
            "run {}: committed {} moments from {} ({} segments, {:.2}s)",
            run_id,
            outcome.moments.total(),
            outcome.source_id,
            outcome.segments,
            outcome.elapsed.as_secs_f64()
        );
        let mut pool = MomentPool::clone(&state.moments);
        pool.extend(outcome.moments);
        state.moments = Arc::new(pool);
        state.touch();
        true
    }

    async fn record_failure(&self, run_id: Uuid, failure: SourceFailure) {
        let mut state = self.state.lock().await;
        if state.is_active(run_id) {
            state.errors.push(failure);
        }
    }

    /// Simulate clip durations for the whole moment pool under `style`,
    /// drawing from the configured (or entropy-seeded) generator.
    pub async fn prepare_clips(&self, style: &str) -> Result<Arc<ClipPool>> {
        let mut picker = RngPicker::from_seed_option(self.settings.effective_seed());
        self.prepare_clips_with(style, &mut picker).await
    }

    pub async fn prepare_clips_with(
        &self,
        style: &str,
        picker: &mut (dyn MultiplierPicker + Send),
    ) -> Result<Arc<ClipPool>> {
        let (beat, moments) = {
            let state = self.state.lock().await;
            let beat = state
                .beat
                .ok_or_else(|| anyhow!("audio has not been analyzed yet"))?;
            (beat, Arc::clone(&state.moments))
        };

        let profile = self.styles.get(style);
        let pool = Arc::new(simulate_pool(
            moments.iter(),
            beat.beat_duration,
            style,
            profile,
            &self.settings.simulation_params(),
            picker,
        ));

        let mut state = self.state.lock().await;
        if !Arc::ptr_eq(&state.moments, &moments) {
            bail!("moment pool changed while preparing clips");
        }
        state.clips = Some(Arc::clone(&pool));
        state.selection = None;
        state.touch();
        Ok(pool)
    }

    /// Valid target durations for the prepared pool, or `None` before
    /// `prepare_clips`.
    pub async fn target_range(&self) -> Option<TargetRange> {
        let state = self.state.lock().await;
        let pool = state.clips.as_ref()?;
        Some(target_range_for(
            self.settings.min_target_secs(),
            state.beat.map(|beat| beat.total_duration),
            pool.total_duration(),
        ))
    }

    /// Fit the prepared pool into `target` seconds (default: the longest
    /// allowed target). The request is clamped to the allowed range.
    pub async fn select_clips(&self, target: Option<f64>) -> Result<FinalClipSet> {
        let mut state = self.state.lock().await;
        let pool = state
            .clips
            .clone()
            .ok_or_else(|| anyhow!("clips have not been prepared yet"))?;

        let audio = state.beat.map(|beat| beat.total_duration);
        let range = target_range_for(self.settings.min_target_secs(), audio, pool.total_duration());
        let requested = target.unwrap_or(range.default_secs);
        let bounded = TargetDuration::bounded(
            requested,
            self.settings.min_target_secs(),
            audio,
            pool.total_duration(),
        );
        if (bounded.secs() - requested).abs() > f64::EPSILON {
            log_info!(
                "target {:.2}s clamped to {:.2}s",
                requested,
                bounded.secs()
            );
        }

        let selection = allocate(pool, bounded);
        state.selection = Some(selection.clone());
        state.touch();
        Ok(selection)
    }

    pub async fn summary(&self) -> SessionSummary {
        let state = self.state.lock().await;
        SessionSummary {
            generated_at: Utc::now(),
            updated_at: state.updated_at,
            audio_path: state
                .audio_path
                .as_ref()
                .map(|path| path.display().to_string()),
            beat: state.beat,
            audio_analysis_secs: state.audio_analysis_secs,
            video_analysis_secs: state.video_analysis_secs,
            total_moments: state.moments.len(),
            counts: state.moments.counts(),
            style: state.clips.as_ref().map(|pool| pool.style().to_string()),
            pool_total_secs: state.clips.as_ref().map(|pool| pool.total_duration()),
            selected_clips: state.selection.as_ref().map(FinalClipSet::len),
            selected_secs: state.selection.as_ref().map(FinalClipSet::total_duration),
            errors: state.errors.clone(),
        }
    }

    /// Stop the analysis run in flight; committed sources stay.
    pub async fn cancel(&self) -> bool {
        match self.state.lock().await.cancel_run() {
            Some(run_id) => {
                log_info!("run {} cancelled", run_id);
                true
            }
            None => false,
        }
    }

    /// Cancel any run and forget all session data.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.cancel_run();
        *state = SessionState::new();
        log_info!("session reset");
    }

    /// Reset and release the classifier.
    pub async fn shutdown(&self) {
        self.reset().await;
        self.detector.release();
    }
}

fn target_range_for(min_secs: f64, audio_duration: Option<f64>, pool_total: f64) -> TargetRange {
    let max_secs = TargetDuration::bounded(f64::INFINITY, min_secs, audio_duration, pool_total).secs();
    TargetRange {
        min_secs,
        max_secs,
        default_secs: max_secs,
    }
}

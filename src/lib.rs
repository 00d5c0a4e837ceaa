pub mod audio;
pub mod clips;
pub mod error;
pub mod models;
pub mod moments;
pub mod pipeline;
pub mod segmentation;
pub mod sensing;
pub mod settings;
pub mod styles;
pub mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;

pub use audio::{AudioAnalyzer, BeatInfo};
pub use clips::{allocate, simulate_pool, MultiplierPicker, RngPicker};
pub use error::{AudioAnalysisError, SourceError, StyleError};
pub use models::{ClipPool, FinalClipSet, Moment, SceneLabel, Segment, TargetDuration};
pub use moments::{run_filter, MomentPool};
pub use pipeline::{AnalysisReport, PipelineController, SessionSummary};
pub use sensing::{
    run_segmentation, DetectionLoader, DetectorHandle, FrameClassifier, FrameSource,
    ObjectDetector,
};
pub use settings::{PipelineSettings, SettingsStore};
pub use styles::{EditingStyleProfile, StyleRegistry};
pub use utils::init_logging;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

/// Start logging, load settings from `settings_path` (defaults when the file
/// is missing) and build a controller for one editing session.
pub fn open_session(
    settings_path: PathBuf,
    detector: DetectorHandle,
    analyzer: Arc<dyn AudioAnalyzer>,
) -> Result<PipelineController> {
    let settings = load_settings(settings_path)?;
    PipelineController::new(settings, detector, analyzer)
}

/// Like [`open_session`], but builds the classifier from an object detector
/// using the score threshold and result cap from the settings file.
pub fn open_detection_session<F, D>(
    settings_path: PathBuf,
    make_detector: F,
    analyzer: Arc<dyn AudioAnalyzer>,
) -> Result<PipelineController>
where
    F: Fn() -> Result<D> + Send + Sync + 'static,
    D: ObjectDetector + 'static,
{
    let settings = load_settings(settings_path)?;
    let loader = DetectionLoader::from_settings(make_detector, &settings.detector);
    let detector = DetectorHandle::new(Arc::new(loader));
    PipelineController::new(settings, detector, analyzer)
}

fn load_settings(settings_path: PathBuf) -> Result<PipelineSettings> {
    init_logging();

    let store = SettingsStore::new(settings_path)?;
    let settings = store.get()?;
    log_info!(
        "session settings: sampling every {:.2}s, {} fps edit grid, seed {:?}, detector threshold {:.2}",
        settings.sampling_interval_secs,
        settings.edit_fps,
        settings.effective_seed(),
        settings.detector.score_threshold
    );
    Ok(settings)
}

use anyhow::Result;

use crate::models::{label_from_detections, Detection, SceneLabel};

use super::source::Frame;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Assigns a scene label to a single frame.
pub trait FrameClassifier: Send + Sync {
    fn classify(&self, frame: &Frame) -> Result<SceneLabel>;
}

/// Classify, degrading any failure to `Background` so one bad frame never
/// aborts a source.
pub fn classify_or_background(classifier: &dyn FrameClassifier, frame: &Frame) -> SceneLabel {
    match classifier.classify(frame) {
        Ok(label) => label,
        Err(err) => {
            log_warn!("frame classification failed, treating as background: {err:?}");
            SceneLabel::Background
        }
    }
}

/// Raw object detector: returns the top category of each detected object.
pub trait ObjectDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>>;
}

/// Turns an object detector into a scene classifier.
pub struct DetectionClassifier<D> {
    detector: D,
    score_threshold: f32,
    max_results: usize,
}

impl<D: ObjectDetector> DetectionClassifier<D> {
    pub fn new(detector: D, score_threshold: f32, max_results: usize) -> Self {
        Self {
            detector,
            score_threshold,
            max_results,
        }
    }
}

impl<D: ObjectDetector> FrameClassifier for DetectionClassifier<D> {
    fn classify(&self, frame: &Frame) -> Result<SceneLabel> {
        let mut detections = self.detector.detect(frame)?;
        detections.truncate(self.max_results);
        Ok(label_from_detections(&detections, self.score_threshold))
    }
}

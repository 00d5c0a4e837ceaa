use anyhow::{anyhow, Context, Result};
use std::sync::{Arc, Mutex};

use crate::settings::DetectorSettings;

use super::classifier::{DetectionClassifier, FrameClassifier, ObjectDetector};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Builds the (expensive) classifier on first use.
pub trait DetectorLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn FrameClassifier>>;
}

impl<F> DetectorLoader for F
where
    F: Fn() -> Result<Arc<dyn FrameClassifier>> + Send + Sync,
{
    fn load(&self) -> Result<Arc<dyn FrameClassifier>> {
        self()
    }
}

/// Loads an object detector and wraps it in a [`DetectionClassifier`].
pub struct DetectionLoader<F> {
    make_detector: F,
    score_threshold: f32,
    max_results: usize,
}

impl<F> DetectionLoader<F> {
    pub fn new(make_detector: F, score_threshold: f32, max_results: usize) -> Self {
        Self {
            make_detector,
            score_threshold,
            max_results,
        }
    }

    /// Use the thresholds from the pipeline settings.
    pub fn from_settings(make_detector: F, settings: &DetectorSettings) -> Self {
        Self::new(make_detector, settings.score_threshold, settings.max_results)
    }
}

impl<F, D> DetectorLoader for DetectionLoader<F>
where
    F: Fn() -> Result<D> + Send + Sync,
    D: ObjectDetector + 'static,
{
    fn load(&self) -> Result<Arc<dyn FrameClassifier>> {
        let detector = (self.make_detector)()?;
        Ok(Arc::new(DetectionClassifier::new(
            detector,
            self.score_threshold,
            self.max_results,
        )))
    }
}

/// Owned, lazily loaded classifier. `acquire` loads once and hands out
/// shared references; `release` drops the handle's copy so the model is
/// freed once in-flight users finish.
pub struct DetectorHandle {
    loader: Arc<dyn DetectorLoader>,
    slot: Mutex<Option<Arc<dyn FrameClassifier>>>,
}

impl DetectorHandle {
    pub fn new(loader: Arc<dyn DetectorLoader>) -> Self {
        Self {
            loader,
            slot: Mutex::new(None),
        }
    }

    pub fn acquire(&self) -> Result<Arc<dyn FrameClassifier>> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("detector lock poisoned"))?;

        if let Some(classifier) = slot.as_ref() {
            return Ok(Arc::clone(classifier));
        }

        log_info!("loading frame classifier");
        let classifier = self
            .loader
            .load()
            .context("frame classifier could not be loaded")?;
        *slot = Some(Arc::clone(&classifier));
        Ok(classifier)
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    pub fn release(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            if slot.take().is_some() {
                log_info!("released frame classifier");
            }
        }
    }
}

impl Drop for DetectorHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Detection, SceneLabel};
    use crate::sensing::source::Frame;
    use image::{DynamicImage, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AlwaysPeople;

    impl FrameClassifier for AlwaysPeople {
        fn classify(&self, _frame: &Frame) -> Result<SceneLabel> {
            Ok(SceneLabel::People)
        }
    }

    struct CountingLoader(AtomicUsize);

    impl DetectorLoader for CountingLoader {
        fn load(&self) -> Result<Arc<dyn FrameClassifier>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(AlwaysPeople))
        }
    }

    #[test]
    fn loads_lazily_once_and_reloads_after_release() {
        let loader = Arc::new(CountingLoader(AtomicUsize::new(0)));
        let handle = DetectorHandle::new(loader.clone());
        assert!(!handle.is_loaded());

        handle.acquire().unwrap();
        handle.acquire().unwrap();
        assert!(handle.is_loaded());
        assert_eq!(loader.0.load(Ordering::SeqCst), 1);

        handle.release();
        assert!(!handle.is_loaded());
        handle.acquire().unwrap();
        assert_eq!(loader.0.load(Ordering::SeqCst), 2);
    }

    struct SeesDog;

    impl ObjectDetector for SeesDog {
        fn detect(&self, _frame: &Frame) -> Result<Vec<Detection>> {
            Ok(vec![Detection {
                category: "dog".to_string(),
                score: 0.8,
            }])
        }
    }

    #[test]
    fn detection_loader_builds_scene_classifier() {
        let loader = DetectionLoader::new(|| Ok::<_, anyhow::Error>(SeesDog), 0.3, 5);
        let handle = DetectorHandle::new(Arc::new(loader));
        let classifier = handle.acquire().unwrap();
        let frame = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        assert_eq!(classifier.classify(&frame).unwrap(), SceneLabel::Animal);
    }

    #[test]
    fn settings_threshold_filters_weak_detections() {
        let frame = DynamicImage::ImageRgb8(RgbImage::new(2, 2));

        let strict = DetectorSettings {
            score_threshold: 0.9,
            max_results: 5,
        };
        let loader = DetectionLoader::from_settings(|| Ok::<_, anyhow::Error>(SeesDog), &strict);
        let classifier = loader.load().unwrap();
        assert_eq!(classifier.classify(&frame).unwrap(), SceneLabel::Background);

        let loader = DetectionLoader::from_settings(
            || Ok::<_, anyhow::Error>(SeesDog),
            &DetectorSettings::default(),
        );
        let classifier = loader.load().unwrap();
        assert_eq!(classifier.classify(&frame).unwrap(), SceneLabel::Animal);
    }

    #[test]
    fn load_failure_is_reported_and_not_cached() {
        let handle = DetectorHandle::new(Arc::new(|| -> Result<Arc<dyn FrameClassifier>> {
            Err(anyhow!("model file missing"))
        }));
        assert!(handle.acquire().is_err());
        assert!(!handle.is_loaded());
    }
}

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use beatcut::sensing::{Frame, ImageSequenceSource};
use beatcut::models::Detection;
use beatcut::{
    open_detection_session, open_session, BeatInfo, DetectorHandle, FrameClassifier,
    FrameSource, ObjectDetector, SceneLabel,
};
use image::{Rgb, RgbImage};

/// Red frames show people, green frames show vehicles, anything else is
/// background.
struct ColorClassifier;

impl FrameClassifier for ColorClassifier {
    fn classify(&self, frame: &Frame) -> Result<SceneLabel> {
        let Rgb([r, g, _]) = *frame.to_rgb8().get_pixel(0, 0);
        Ok(if r > 128 {
            SceneLabel::People
        } else if g > 128 {
            SceneLabel::Vehicle
        } else {
            SceneLabel::Background
        })
    }
}

fn write_frames(dir: &Path, colors: &[(Rgb<u8>, usize)]) {
    std::fs::create_dir_all(dir).unwrap();
    let mut index = 0;
    for &(color, count) in colors {
        for _ in 0..count {
            RgbImage::from_pixel(4, 4, color)
                .save(dir.join(format!("{index:04}.png")))
                .unwrap();
            index += 1;
        }
    }
}

#[tokio::test]
async fn frames_to_final_clip_set() {
    let tmp = tempfile::tempdir().unwrap();
    let shots = tmp.path().join("shots");
    // 10 fps: people 0.0-2.0s, background, vehicle 2.5-3.9s
    write_frames(
        &shots,
        &[
            (Rgb([255, 0, 0]), 20),
            (Rgb([0, 0, 0]), 5),
            (Rgb([0, 255, 0]), 15),
        ],
    );

    let settings_path = tmp.path().join("settings.json");
    std::fs::write(&settings_path, r#"{ "rngSeed": 42 }"#).unwrap();

    let detector = DetectorHandle::new(Arc::new(|| -> Result<Arc<dyn FrameClassifier>> {
        Ok(Arc::new(ColorClassifier))
    }));
    let analyzer = |_path: &Path| BeatInfo::from_tempo(120.0, 0.0, 30.0);
    let ctrl = open_session(settings_path, detector, Arc::new(analyzer)).unwrap();

    let beat = ctrl.analyze_audio("track.wav").await.unwrap();
    assert_eq!(beat.beat_duration, 0.5);

    let source = ImageSequenceSource::open(&shots, 10.0).unwrap();
    assert_eq!(source.frame_count(), 40);
    let report = ctrl.analyze_sources(vec![Box::new(source)]).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.processed, 1);
    assert_eq!(report.moments_found, 2);

    let pool = ctrl.prepare_clips("Fast-paced").await.unwrap();
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.style(), "Fast-paced");
    assert!(pool.total_duration() >= 2.0 - 1e-9 && pool.total_duration() <= 3.0 + 1e-9);
    for clip in pool.clips() {
        assert!(clip.duration_secs >= 1.0 - 1e-9);
    }

    let again = ctrl.prepare_clips("Fast-paced").await.unwrap();
    assert_eq!(pool.total_duration(), again.total_duration());

    let everything = ctrl.select_clips(None).await.unwrap();
    assert_eq!(everything.len(), 2);
    let (primary, other) = everything.split();
    assert_eq!(primary.len(), 1);
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].label(), SceneLabel::Vehicle);

    let tight = ctrl.select_clips(Some(1.0)).await.unwrap();
    assert!(tight.total_duration() <= 1.0 + 1e-2);

    let summary = ctrl.summary().await;
    assert_eq!(summary.total_moments, 2);
    assert_eq!(summary.style.as_deref(), Some("Fast-paced"));
    let text = summary.render();
    assert!(text.contains("People: 1"));
    assert!(text.contains("Vehicle Scene: 1"));

    ctrl.shutdown().await;
}

#[tokio::test]
async fn empty_session_yields_empty_selection() {
    let tmp = tempfile::tempdir().unwrap();
    let detector = DetectorHandle::new(Arc::new(|| -> Result<Arc<dyn FrameClassifier>> {
        Ok(Arc::new(ColorClassifier))
    }));
    let analyzer = |_path: &Path| BeatInfo::from_tempo(90.0, 0.0, 60.0);
    let ctrl = open_session(tmp.path().join("settings.json"), detector, Arc::new(analyzer)).unwrap();

    ctrl.analyze_audio("track.wav").await.unwrap();
    let report = ctrl.analyze_sources(Vec::new()).await.unwrap();
    assert_eq!(report.processed, 0);

    let pool = ctrl.prepare_clips("Standard").await.unwrap();
    assert!(pool.is_empty());
    let selection = ctrl.select_clips(Some(20.0)).await.unwrap();
    assert!(selection.is_empty());
    assert_eq!(selection.total_duration(), 0.0);
}

/// Reports a person at 0.5 confidence on red frames, nothing elsewhere.
struct HesitantPersonDetector;

impl ObjectDetector for HesitantPersonDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>> {
        let Rgb([r, _, _]) = *frame.to_rgb8().get_pixel(0, 0);
        if r > 128 {
            Ok(vec![Detection {
                category: "person".to_string(),
                score: 0.5,
            }])
        } else {
            Ok(Vec::new())
        }
    }
}

async fn moments_with_settings(tmp: &Path, shots: &Path, settings_json: &str) -> usize {
    let settings_path = tmp.join("settings.json");
    std::fs::write(&settings_path, settings_json).unwrap();

    let analyzer = |_path: &Path| BeatInfo::from_tempo(120.0, 0.0, 30.0);
    let ctrl = open_detection_session(
        settings_path,
        || Ok::<_, anyhow::Error>(HesitantPersonDetector),
        Arc::new(analyzer),
    )
    .unwrap();
    ctrl.analyze_audio("track.wav").await.unwrap();

    let source = ImageSequenceSource::open(shots, 10.0).unwrap();
    let report = ctrl.analyze_sources(vec![Box::new(source)]).await.unwrap();
    assert!(report.is_complete());
    report.moments_found
}

#[tokio::test]
async fn detector_threshold_comes_from_settings() {
    let tmp = tempfile::tempdir().unwrap();
    let shots = tmp.path().join("shots");
    // 10 fps: person 0.0-3.0s, then background
    write_frames(&shots, &[(Rgb([255, 0, 0]), 30), (Rgb([0, 0, 0]), 5)]);

    assert_eq!(moments_with_settings(tmp.path(), &shots, "{}").await, 1);
    assert_eq!(
        moments_with_settings(tmp.path(), &shots, r#"{ "detector": { "scoreThreshold": 0.9 } }"#)
            .await,
        0
    );
}

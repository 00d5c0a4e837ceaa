use crate::error::SourceError;
use crate::models::{RawInstant, Segment};
use crate::segmentation::{segment_instants, SegmentationConfig};

use super::classifier::{classify_or_background, FrameClassifier};
use super::source::FrameSource;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Classify a source every `interval_secs` and return the labeled instants.
///
/// The first frame is always classified at t=0. After that every
/// `max(1, floor(fps × interval))`-th frame is classified at `index / fps`.
/// A final instant carrying the last label is added at the last frame's
/// timestamp so the open run ends with the source. A read failure after the
/// first frame ends sampling early.
pub fn sample_instants(
    source: &mut dyn FrameSource,
    classifier: &dyn FrameClassifier,
    interval_secs: f64,
) -> Result<Vec<RawInstant>, SourceError> {
    let fps = source.fps();
    if !fps.is_finite() || fps <= 0.0 {
        return Err(SourceError::InvalidFrameRate {
            source_id: source.id().to_string(),
            fps,
        });
    }

    let frame_count = source.frame_count();
    if frame_count == 0 {
        return Err(SourceError::Empty(source.id().to_string()));
    }

    let step = ((fps * interval_secs).floor() as u64).max(1);
    let mut instants = Vec::with_capacity((frame_count / step + 2) as usize);

    let first = source.read_frame(0).map_err(|err| SourceError::FrameRead {
        source_id: source.id().to_string(),
        index: 0,
        reason: format!("{err:#}"),
    })?;
    let mut last_label = classify_or_background(classifier, &first);
    instants.push(RawInstant::new(0.0, last_label));

    let mut last_index = 0u64;
    let mut index = step;
    while index < frame_count {
        match source.read_frame(index) {
            Ok(frame) => {
                last_label = classify_or_background(classifier, &frame);
                instants.push(RawInstant::new(index as f64 / fps, last_label));
                last_index = index;
            }
            Err(err) => {
                log_warn!(
                    "{}: frame {} unreadable, ending sampling early: {err:#}",
                    source.id(),
                    index
                );
                break;
            }
        }
        index += step;
    }

    let read_to_end = index >= frame_count;
    let final_index = if read_to_end { frame_count - 1 } else { last_index };
    if final_index > last_index {
        instants.push(RawInstant::new(final_index as f64 / fps, last_label));
    }

    Ok(instants)
}

/// Sample, label and segment one source.
pub fn run_segmentation(
    source: &mut dyn FrameSource,
    classifier: &dyn FrameClassifier,
    config: &SegmentationConfig,
) -> Result<Vec<Segment>, SourceError> {
    let instants = sample_instants(source, classifier, config.sampling_interval_secs)?;
    let sampled = instants.len();
    let segments = segment_instants(source.id(), instants, config.merge_gap_secs());

    log_info!(
        "{}: {} instants -> {} segments (merge gap {:.2}s)",
        source.id(),
        sampled,
        segments.len(),
        config.merge_gap_secs()
    );

    Ok(segments)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::SceneLabel;
    use crate::sensing::source::Frame;
    use anyhow::{bail, Result};
    use image::{DynamicImage, GrayImage, Luma};

    /// Synthetic source whose frames encode a scene label in pixel (0,0).
    pub(crate) struct ScriptedSource {
        pub id: String,
        pub fps: f64,
        pub labels: Vec<SceneLabel>,
        pub fail_from: Option<u64>,
    }

    impl ScriptedSource {
        pub(crate) fn new(id: &str, fps: f64, labels: Vec<SceneLabel>) -> Self {
            Self {
                id: id.to_string(),
                fps,
                labels,
                fail_from: None,
            }
        }
    }

    pub(crate) fn code(label: SceneLabel) -> u8 {
        label as u8
    }

    pub(crate) fn decode(value: u8) -> SceneLabel {
        [
            SceneLabel::People,
            SceneLabel::Vehicle,
            SceneLabel::Animal,
            SceneLabel::Indoor,
            SceneLabel::OutdoorObject,
            SceneLabel::Food,
        ]
        .get(value as usize)
        .copied()
        .unwrap_or(SceneLabel::Background)
    }

    impl FrameSource for ScriptedSource {
        fn id(&self) -> &str {
            &self.id
        }

        fn fps(&self) -> f64 {
            self.fps
        }

        fn frame_count(&self) -> u64 {
            self.labels.len() as u64
        }

        fn read_frame(&mut self, index: u64) -> Result<Frame> {
            if self.fail_from.map(|from| index >= from).unwrap_or(false) {
                bail!("decoder error");
            }
            let label = self.labels[index as usize];
            Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([code(label)]))))
        }
    }

    /// Reads the label back out of a scripted frame.
    pub(crate) struct PixelClassifier;

    impl FrameClassifier for PixelClassifier {
        fn classify(&self, frame: &Frame) -> Result<SceneLabel> {
            Ok(decode(frame.to_luma8().get_pixel(0, 0).0[0]))
        }
    }

    fn labels(runs: &[(SceneLabel, usize)]) -> Vec<SceneLabel> {
        runs.iter()
            .flat_map(|&(label, n)| std::iter::repeat(label).take(n))
            .collect()
    }

    #[test]
    fn samples_on_interval_and_closes_at_last_frame() {
        // 10 fps, 0.2s interval -> every 2nd frame; 11 frames -> 0.0 .. 1.0s
        let mut source = ScriptedSource::new("s.mp4", 10.0, labels(&[(SceneLabel::People, 11)]));
        let instants = sample_instants(&mut source, &PixelClassifier, 0.2).unwrap();
        let times: Vec<f64> = instants.iter().map(|i| i.timestamp).collect();
        assert_eq!(times, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn trailing_instant_added_when_last_frame_not_sampled() {
        let mut source = ScriptedSource::new("s.mp4", 10.0, labels(&[(SceneLabel::Food, 10)]));
        let instants = sample_instants(&mut source, &PixelClassifier, 0.2).unwrap();
        let last = instants.last().unwrap();
        assert!((last.timestamp - 0.9).abs() < 1e-9);
        assert_eq!(last.label, SceneLabel::Food);
    }

    #[test]
    fn rejects_invalid_sources() {
        let mut bad_fps = ScriptedSource::new("s.mp4", 0.0, labels(&[(SceneLabel::Food, 3)]));
        assert!(matches!(
            sample_instants(&mut bad_fps, &PixelClassifier, 0.1),
            Err(SourceError::InvalidFrameRate { .. })
        ));

        let mut empty = ScriptedSource::new("s.mp4", 24.0, Vec::new());
        assert!(matches!(
            sample_instants(&mut empty, &PixelClassifier, 0.1),
            Err(SourceError::Empty(_))
        ));

        let mut unreadable = ScriptedSource::new("s.mp4", 24.0, labels(&[(SceneLabel::Food, 3)]));
        unreadable.fail_from = Some(0);
        assert!(matches!(
            sample_instants(&mut unreadable, &PixelClassifier, 0.1),
            Err(SourceError::FrameRead { index: 0, .. })
        ));
    }

    #[test]
    fn read_failure_truncates_stream() {
        let mut source = ScriptedSource::new("s.mp4", 10.0, labels(&[(SceneLabel::Animal, 20)]));
        source.fail_from = Some(6);
        let instants = sample_instants(&mut source, &PixelClassifier, 0.2).unwrap();
        let last = instants.last().unwrap();
        assert!((last.timestamp - 0.4).abs() < 1e-9);
    }

    #[test]
    fn segments_follow_label_runs() {
        // 10 fps sampled every frame: People 0.0-2.0, Background, Vehicle 3.0-4.9
        let mut source = ScriptedSource::new(
            "s.mp4",
            10.0,
            labels(&[
                (SceneLabel::People, 20),
                (SceneLabel::Background, 10),
                (SceneLabel::Vehicle, 20),
            ]),
        );
        let config = SegmentationConfig {
            sampling_interval_secs: 0.1,
            merge_gap_factor: 2.0,
        };
        let segments = run_segmentation(&mut source, &PixelClassifier, &config).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label, SceneLabel::People);
        assert!((segments[0].end - 2.0).abs() < 1e-9);
        assert_eq!(segments[1].label, SceneLabel::Vehicle);
        assert!((segments[1].start - 3.0).abs() < 1e-9);
        assert!((segments[1].end - 4.9).abs() < 1e-9);
        assert!(segments.iter().all(|s| s.source_id == "s.mp4"));
    }
}

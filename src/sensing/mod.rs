pub mod classifier;
pub mod detector;
pub mod sampler;
pub mod source;

pub use classifier::{classify_or_background, DetectionClassifier, FrameClassifier, ObjectDetector};
pub use detector::{DetectionLoader, DetectorHandle, DetectorLoader};
pub use sampler::{run_segmentation, sample_instants};
pub use source::{Frame, FrameSource, ImageSequenceSource};

pub mod clip;
pub mod label;
pub mod segment;

pub use clip::{ClipPool, FinalClipSet, PreparedClip, TargetDuration};
pub use label::{label_for_category, label_from_detections, Detection, SceneLabel};
pub use segment::{Moment, MomentTag, RawInstant, Segment};

pub mod algorithm;
pub mod config;
pub mod merge;

pub use algorithm::{group_instants, segment_instants};
pub use config::SegmentationConfig;
pub use merge::merge_adjacent;

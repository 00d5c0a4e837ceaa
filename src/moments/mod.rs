pub mod filter;
pub mod pool;

pub use filter::{filter_segments, min_moment_duration, run_filter, FilteredMoments};
pub use pool::{count_by_label, MomentPool};

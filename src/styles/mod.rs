pub mod profile;
pub mod registry;

pub use profile::{EditingStyleProfile, StyleConfig};
pub use registry::{StyleRegistry, FAST_PACED, RELAXED, STANDARD};

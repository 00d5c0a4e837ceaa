pub mod allocate;
pub mod picker;
pub mod simulate;

pub use allocate::{allocate, OVERSHOOT_TOLERANCE_SECS, USE_ALL_THRESHOLD};
pub use picker::{MultiplierPicker, RngPicker};
pub use simulate::{simulate_duration, simulate_pool, SimulationParams};

/// Tunables for turning a labeled sample stream into segments.
#[derive(Debug, Clone)]
pub struct SegmentationConfig {
    /// How often (seconds) a frame is classified
    pub sampling_interval_secs: f64,

    /// Multiplier on the sampling interval giving the largest gap that still
    /// fuses two same-label segments
    pub merge_gap_factor: f64,
}

impl SegmentationConfig {
    pub fn merge_gap_secs(&self) -> f64 {
        self.sampling_interval_secs * self.merge_gap_factor
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            sampling_interval_secs: 0.1,
            merge_gap_factor: 2.0,
        }
    }
}

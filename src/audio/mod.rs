pub mod beat;
pub mod tempo;

pub use beat::BeatInfo;
pub use tempo::{median_beat_interval, resolve_tempo, MAX_PLAUSIBLE_BPM, MIN_PLAUSIBLE_BPM};

use std::path::Path;

use crate::error::AudioAnalysisError;

/// Extracts beat parameters from an audio file.
///
/// Implementations wrap whatever beat tracker is available and are expected
/// to funnel their raw estimates through [`resolve_tempo`] and
/// [`BeatInfo::from_tempo`].
pub trait AudioAnalyzer: Send + Sync {
    fn analyze(&self, path: &Path) -> Result<BeatInfo, AudioAnalysisError>;
}

impl<F> AudioAnalyzer for F
where
    F: Fn(&Path) -> Result<BeatInfo, AudioAnalysisError> + Send + Sync,
{
    fn analyze(&self, path: &Path) -> Result<BeatInfo, AudioAnalysisError> {
        self(path)
    }
}

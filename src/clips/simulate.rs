use crate::models::{ClipPool, Moment, PreparedClip};
use crate::styles::EditingStyleProfile;
use crate::utils::time::{frames_to_secs, secs_to_frames};

use super::picker::MultiplierPicker;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

pub const DEFAULT_EDIT_FPS: f64 = 24.0;
pub const DEFAULT_MIN_CLIP_FRAMES: i64 = 12;

/// Frame grid the simulated durations are quantized to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub fps: f64,
    pub min_clip_frames: i64,
}

impl SimulationParams {
    /// Shortest clip the simulator can produce, in seconds.
    pub fn min_clip_secs(&self) -> f64 {
        frames_to_secs(self.min_clip_frames, self.fps)
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            fps: DEFAULT_EDIT_FPS,
            min_clip_frames: DEFAULT_MIN_CLIP_FRAMES,
        }
    }
}

/// Pick a beat-quantized duration (seconds) for one moment under `style`.
///
/// Moments at least one beat long get `k × beat` for a multiplier `k` that
/// fits inside the moment (or the smallest configured multiplier if none
/// fits); shorter moments keep their own length. The result is never below
/// `min_clip_frames`. Returns `None` for a non-positive beat, moment length
/// or frame rate.
pub fn simulate_duration(
    moment: &Moment,
    beat_duration: f64,
    style: &EditingStyleProfile,
    params: &SimulationParams,
    picker: &mut dyn MultiplierPicker,
) -> Option<f64> {
    let raw = moment.duration_secs();
    if beat_duration <= 0.0 || raw <= 0.0 || params.fps <= 0.0 {
        return None;
    }

    let raw_f = secs_to_frames(raw, params.fps);
    let beat_f = secs_to_frames(beat_duration, params.fps);
    if beat_f <= 0 {
        return None;
    }

    let duration_f = if raw_f >= beat_f {
        let max_multiplier = raw_f / beat_f;
        let multiplier = choose_multiplier(style, max_multiplier, picker);
        i64::from(multiplier) * beat_f
    } else {
        raw_f
    };

    let duration_f = duration_f.max(params.min_clip_frames);
    Some(frames_to_secs(duration_f, params.fps))
}

/// Draw a multiplier no larger than `max_multiplier`.
fn choose_multiplier(
    style: &EditingStyleProfile,
    max_multiplier: i64,
    picker: &mut dyn MultiplierPicker,
) -> u32 {
    let multipliers = style.multipliers();

    let mut indices: Vec<usize> = multipliers
        .iter()
        .enumerate()
        .filter(|(_, m)| i64::from(**m) <= max_multiplier)
        .map(|(i, _)| i)
        .collect();
    if indices.is_empty() {
        indices.push(0);
    }
    let candidates: Vec<u32> = indices
        .iter()
        .map(|&i| multipliers.get(i).copied().unwrap_or(1))
        .collect();

    let weights = style
        .weights()
        .filter(|weights| weights.len() == multipliers.len())
        .and_then(|weights| {
            let sliced: Vec<f64> = indices.iter().map(|&i| weights[i]).collect();
            let sum: f64 = sliced.iter().sum();
            (sum > 0.0).then(|| sliced.into_iter().map(|w| w / sum).collect::<Vec<_>>())
        });

    let index = weights
        .and_then(|weights| picker.pick_weighted(&weights))
        .unwrap_or_else(|| picker.pick_uniform(candidates.len()));

    candidates
        .get(index)
        .copied()
        .unwrap_or_else(|| style.smallest_multiplier())
}

/// Simulate every moment once and collect the clips with a usable duration.
pub fn simulate_pool<'a, I>(
    moments: I,
    beat_duration: f64,
    style_name: &str,
    style: &EditingStyleProfile,
    params: &SimulationParams,
    picker: &mut dyn MultiplierPicker,
) -> ClipPool
where
    I: IntoIterator<Item = &'a Moment>,
{
    let mut clips = Vec::new();
    let mut skipped = 0usize;

    for moment in moments {
        match simulate_duration(moment, beat_duration, style, params, picker) {
            Some(duration_secs) if duration_secs > 0.0 => {
                log_debug!(
                    "{} [{:.2}-{:.2}] -> {:.3}s",
                    moment.source_id,
                    moment.start,
                    moment.end,
                    duration_secs
                );
                clips.push(PreparedClip {
                    moment: moment.clone(),
                    duration_secs,
                });
            }
            _ => skipped += 1,
        }
    }

    let pool = ClipPool::new(style_name, clips);
    log_info!(
        "simulated style '{}': {} clips, {:.2}s total ({} skipped)",
        style_name,
        pool.len(),
        pool.total_duration(),
        skipped
    );
    pool
}

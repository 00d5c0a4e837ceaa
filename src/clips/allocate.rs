use std::sync::Arc;

use crate::models::{ClipPool, FinalClipSet, TargetDuration};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Targets at or above this fraction of the pool total take every clip.
pub const USE_ALL_THRESHOLD: f64 = 0.999;

/// How far below zero the running total may drift before removal stops.
pub const OVERSHOOT_TOLERANCE_SECS: f64 = 0.01;

/// Fit the pool into `target` by dropping the shortest clips first.
///
/// An empty pool (or one with no duration) gives an empty set. A target at
/// or above `USE_ALL_THRESHOLD` of the total keeps the whole pool in its
/// original order. Otherwise clips are removed in ascending duration order
/// (ties in pool order) until the remaining total fits; the survivors are
/// returned in pool order.
pub fn allocate(pool: Arc<ClipPool>, target: TargetDuration) -> FinalClipSet {
    let total = pool.total_duration();
    if pool.is_empty() || total <= 0.0 {
        return FinalClipSet::new(pool, Vec::new());
    }

    let target_secs = target.secs();
    if target_secs >= total * USE_ALL_THRESHOLD {
        log_info!(
            "using all {} clips: target {:.2}s >= available {:.2}s",
            pool.len(),
            target_secs,
            total
        );
        let indices = (0..pool.len()).collect();
        return FinalClipSet::new(pool, indices);
    }

    let mut order: Vec<usize> = (0..pool.len()).collect();
    // stable: equal durations keep pool order
    order.sort_by(|&a, &b| {
        let da = pool.clips()[a].duration_secs;
        let db = pool.clips()[b].duration_secs;
        da.total_cmp(&db)
    });

    let mut running = total;
    let mut removed = 0usize;
    while running > target_secs && removed < order.len() {
        running -= pool.clips()[order[removed]].duration_secs;
        removed += 1;
        if running < -OVERSHOOT_TOLERANCE_SECS {
            log_warn!(
                "running total went negative ({:.3}s), stopping removal",
                running
            );
            break;
        }
    }

    let mut kept = order.split_off(removed);
    kept.sort_unstable();

    log_info!(
        "removed {} shortest clips: {:.2}s -> {:.2}s (target {:.2}s)",
        removed,
        total,
        running,
        target_secs
    );

    FinalClipSet::new(pool, kept)
}

/// Render seconds as `MM:SS`, or `H:MM:SS` past one hour.
/// Missing, negative or non-finite values render as "N/A".
pub fn format_clock(seconds: Option<f64>) -> String {
    let Some(secs) = seconds else {
        return "N/A".to_string();
    };
    if !secs.is_finite() || secs < 0.0 {
        return "N/A".to_string();
    }

    let total = secs.round() as u64;
    let (minutes, seconds) = (total / 60, total % 60);
    if total < 3600 {
        format!("{minutes:02}:{seconds:02}")
    } else {
        let (hours, minutes) = (minutes / 60, minutes % 60);
        format!("{hours}:{minutes:02}:{seconds:02}")
    }
}

/// Seconds to whole frames at `fps`, rounded to nearest; exact halves go
/// to the even frame.
pub fn secs_to_frames(secs: f64, fps: f64) -> i64 {
    (secs * fps).round_ties_even() as i64
}

/// Frames back to seconds; zero when `fps` is not positive.
pub fn frames_to_secs(frames: i64, fps: f64) -> f64 {
    if fps > 0.0 {
        frames as f64 / fps
    } else {
        0.0
    }
}

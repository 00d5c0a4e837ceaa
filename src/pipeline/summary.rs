use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use uuid::Uuid;

use crate::audio::BeatInfo;
use crate::utils::time::format_clock;

/// A source that could not be analyzed, and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceFailure {
    pub source_id: String,
    pub message: String,
}

/// Outcome of one `analyze_sources` run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub run_id: Uuid,
    /// Sources whose moments were committed to the session
    pub processed: usize,
    pub moments_found: usize,
    pub errors: Vec<SourceFailure>,
    /// Set when the run stopped early on an unrecoverable failure
    pub critical: Option<String>,
    pub cancelled: bool,
}

impl AnalysisReport {
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.critical.is_none()
    }
}

/// Allowed and default target durations for the current clip pool.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetRange {
    pub min_secs: f64,
    pub max_secs: f64,
    pub default_secs: f64,
}

/// Read-only snapshot of a session for display or export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub generated_at: DateTime<Utc>,
    /// Last time the session state changed
    pub updated_at: Option<DateTime<Utc>>,
    pub audio_path: Option<String>,
    pub beat: Option<BeatInfo>,
    pub audio_analysis_secs: Option<f64>,
    pub video_analysis_secs: Option<f64>,
    pub total_moments: usize,
    pub counts: BTreeMap<String, usize>,
    pub style: Option<String>,
    pub pool_total_secs: Option<f64>,
    pub selected_clips: Option<usize>,
    pub selected_secs: Option<f64>,
    pub errors: Vec<SourceFailure>,
}

impl SessionSummary {
    /// Plain-text report, one fact per line.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(path) = &self.audio_path {
            let _ = writeln!(out, "Audio: {path}");
        }
        match &self.beat {
            Some(beat) => {
                let _ = writeln!(
                    out,
                    "Tempo: {:.1} BPM (beat {:.3}s, offset {:.2}s)",
                    beat.tempo, beat.beat_duration, beat.start_offset
                );
                let _ = writeln!(out, "Audio duration: {}", format_clock(Some(beat.total_duration)));
            }
            None => {
                let _ = writeln!(out, "Tempo: N/A");
            }
        }
        let _ = writeln!(out, "Audio analysis: {}", format_clock(self.audio_analysis_secs));
        let _ = writeln!(out, "Video analysis: {}", format_clock(self.video_analysis_secs));

        let breakdown = self
            .counts
            .iter()
            .map(|(label, count)| format!("{label}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        if breakdown.is_empty() {
            let _ = writeln!(out, "Moments: {}", self.total_moments);
        } else {
            let _ = writeln!(out, "Moments: {} ({})", self.total_moments, breakdown);
        }

        if let Some(style) = &self.style {
            let _ = writeln!(
                out,
                "Clip pool ({}): {}",
                style,
                format_clock(self.pool_total_secs)
            );
        }
        if let Some(count) = self.selected_clips {
            let _ = writeln!(
                out,
                "Selected: {} clips, {}",
                count,
                format_clock(self.selected_secs)
            );
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out, "Errors: {}", self.errors.len());
            for failure in &self.errors {
                let _ = writeln!(out, "  - {}: {}", failure.source_id, failure.message);
            }
        }

        if let Some(updated_at) = self.updated_at {
            let _ = writeln!(out, "Updated: {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }

        out
    }
}

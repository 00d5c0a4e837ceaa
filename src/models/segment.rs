use serde::{Deserialize, Serialize};

use super::label::SceneLabel;

/// One classified sample of a source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawInstant {
    pub timestamp: f64,
    pub label: SceneLabel,
}

impl RawInstant {
    pub fn new(timestamp: f64, label: SceneLabel) -> Self {
        Self { timestamp, label }
    }
}

/// A labeled interval of one source. Never carries `Background`;
/// `end > start` for every emitted segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub label: SceneLabel,
    pub source_id: String,
}

impl Segment {
    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }
}

/// Two-way partition of moments: the primary subject, or any other scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", tag = "kind", content = "label")]
pub enum MomentTag {
    Primary,
    Other(SceneLabel),
}

impl MomentTag {
    pub fn for_label(label: SceneLabel) -> Self {
        if label.is_primary() {
            MomentTag::Primary
        } else {
            MomentTag::Other(label)
        }
    }

    /// Name used for counting and display ("People" for the primary bucket).
    pub fn name(&self) -> &'static str {
        match self {
            MomentTag::Primary => SceneLabel::People.as_str(),
            MomentTag::Other(label) => label.as_str(),
        }
    }
}

/// A segment that survived minimum-length filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Moment {
    pub start: f64,
    pub end: f64,
    pub tag: MomentTag,
    pub source_id: String,
}

impl Moment {
    pub fn from_segment(segment: Segment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
            tag: MomentTag::for_label(segment.label),
            source_id: segment.source_id,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_primary(&self) -> bool {
        self.tag == MomentTag::Primary
    }

    pub fn label(&self) -> SceneLabel {
        match self.tag {
            MomentTag::Primary => SceneLabel::People,
            MomentTag::Other(label) => label,
        }
    }
}

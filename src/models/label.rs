//! Scene labels assigned to sampled instants and intervals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of scene categories. `People` is the primary subject;
/// `Background` marks "nothing of interest" and never becomes a segment.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "camelCase")]
pub enum SceneLabel {
    People,
    Vehicle,
    Animal,
    Indoor,
    OutdoorObject,
    Food,
    #[default]
    Background,
}

impl SceneLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneLabel::People => "People",
            SceneLabel::Vehicle => "Vehicle Scene",
            SceneLabel::Animal => "Animal Scene",
            SceneLabel::Indoor => "Indoor Scene",
            SceneLabel::OutdoorObject => "Outdoor/Object Scene",
            SceneLabel::Food => "Food Scene",
            SceneLabel::Background => "Other",
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, SceneLabel::People)
    }

    pub fn is_background(&self) -> bool {
        matches!(self, SceneLabel::Background)
    }
}

impl fmt::Display for SceneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const VEHICLES: &[&str] = &[
    "car", "truck", "bus", "motorcycle", "bicycle", "airplane", "boat", "train",
];

const ANIMALS: &[&str] = &[
    "cat", "dog", "bird", "horse", "sheep", "cow", "bear", "zebra", "giraffe", "elephant",
];

const INDOOR: &[&str] = &[
    "chair", "couch", "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator",
    "book", "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush", "cup", "fork",
    "knife", "spoon", "bowl",
];

const OUTDOOR_OBJECTS: &[&str] = &[
    "bench", "traffic light", "fire hydrant", "stop sign", "parking meter", "tree", "backpack",
    "umbrella", "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball",
    "kite", "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket",
    "bottle", "wine glass",
];

const FOOD: &[&str] = &[
    "banana", "apple", "sandwich", "orange", "broccoli", "carrot", "hot dog", "pizza", "donut",
    "cake",
];

/// Map an object-detector category name onto a scene label.
/// Unknown categories fall through to `Background`.
pub fn label_for_category(category: &str) -> SceneLabel {
    let name = category.trim().to_lowercase();
    let name = name.as_str();

    if name == "person" {
        SceneLabel::People
    } else if VEHICLES.contains(&name) {
        SceneLabel::Vehicle
    } else if ANIMALS.contains(&name) {
        SceneLabel::Animal
    } else if INDOOR.contains(&name) {
        SceneLabel::Indoor
    } else if OUTDOOR_OBJECTS.contains(&name) {
        SceneLabel::OutdoorObject
    } else if FOOD.contains(&name) {
        SceneLabel::Food
    } else {
        SceneLabel::Background
    }
}

/// One detector hit: the top category of a detected object and its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub category: String,
    pub score: f32,
}

/// Choose the scene label for a frame from its detections.
///
/// Only detections at or above `score_threshold` that map to a real scene
/// are considered; the strictly highest score wins, so ties keep the
/// earlier detection.
pub fn label_from_detections(detections: &[Detection], score_threshold: f32) -> SceneLabel {
    let mut best = SceneLabel::Background;
    let mut highest = 0.0_f32;

    for detection in detections {
        if detection.score < score_threshold || detection.score <= highest {
            continue;
        }
        let label = label_for_category(&detection.category);
        if !label.is_background() {
            highest = detection.score;
            best = label;
        }
    }

    best
}

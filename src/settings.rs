use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf, sync::RwLock};

use crate::clips::SimulationParams;
use crate::moments::filter::MIN_MOMENT_BEATS;
use crate::segmentation::SegmentationConfig;
use crate::styles::{StyleConfig, StyleRegistry};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Environment variable that pins the simulation RNG seed.
pub const SEED_ENV_VAR: &str = "BEATCUT_SEED";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorSettings {
    pub score_threshold: f32,
    pub max_results: usize,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            score_threshold: 0.3,
            max_results: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineSettings {
    pub sampling_interval_secs: f64,
    pub merge_gap_factor: f64,
    pub edit_fps: f64,
    pub min_clip_frames: i64,
    pub min_moment_beats: f64,
    pub detector: DetectorSettings,
    pub rng_seed: Option<u64>,
    pub styles: BTreeMap<String, StyleConfig>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let segmentation = SegmentationConfig::default();
        let simulation = SimulationParams::default();
        Self {
            sampling_interval_secs: segmentation.sampling_interval_secs,
            merge_gap_factor: segmentation.merge_gap_factor,
            edit_fps: simulation.fps,
            min_clip_frames: simulation.min_clip_frames,
            min_moment_beats: MIN_MOMENT_BEATS,
            detector: DetectorSettings::default(),
            rng_seed: None,
            styles: BTreeMap::new(),
        }
    }
}

impl PipelineSettings {
    pub fn segmentation_config(&self) -> SegmentationConfig {
        SegmentationConfig {
            sampling_interval_secs: self.sampling_interval_secs,
            merge_gap_factor: self.merge_gap_factor,
        }
    }

    pub fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            fps: self.edit_fps,
            min_clip_frames: self.min_clip_frames,
        }
    }

    /// Smallest target duration a caller may request.
    pub fn min_target_secs(&self) -> f64 {
        self.simulation_params().min_clip_secs().max(1.0)
    }

    /// Minimum moment length for a given beat; zero disables the filter.
    pub fn min_moment_secs(&self, beat_duration: f64) -> f64 {
        if beat_duration > 0.0 && self.min_moment_beats > 0.0 {
            beat_duration * self.min_moment_beats
        } else {
            0.0
        }
    }

    pub fn style_registry(&self) -> Result<StyleRegistry> {
        StyleRegistry::with_custom(&self.styles).context("Invalid custom style in settings")
    }

    /// Seed from the environment if set and parseable, else from the file.
    pub fn effective_seed(&self) -> Option<u64> {
        match std::env::var(SEED_ENV_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    log_warn!("ignoring {}={:?}: not a u64", SEED_ENV_VAR, raw);
                    self.rng_seed
                }
            },
            Err(_) => self.rng_seed,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<PipelineSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!(
                    "settings at {} unreadable ({}), using defaults",
                    path.display(),
                    err
                );
                PipelineSettings::default()
            })
        } else {
            PipelineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> Result<PipelineSettings> {
        self.data
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| anyhow!("settings lock poisoned"))
    }

    pub fn update(&self, settings: PipelineSettings) -> Result<()> {
        // reject styles that would fail later at prepare time
        settings.style_registry()?;

        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &PipelineSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: PipelineSettings = serde_json::from_str(&contents)?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = data;
        Ok(())
    }
}

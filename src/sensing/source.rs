use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};

pub type Frame = DynamicImage;

/// A decoded video (or frame sequence) that can be read by frame index.
pub trait FrameSource: Send {
    /// Identifier carried into every segment (usually the file name).
    fn id(&self) -> &str;

    fn fps(&self) -> f64;

    fn frame_count(&self) -> u64;

    fn duration_secs(&self) -> f64 {
        if self.fps() > 0.0 {
            self.frame_count() as f64 / self.fps()
        } else {
            0.0
        }
    }

    fn read_frame(&mut self, index: u64) -> Result<Frame>;
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// Frames stored as numbered image files in one directory, played back at a
/// fixed rate. Files are ordered by name.
pub struct ImageSequenceSource {
    id: String,
    fps: f64,
    frames: Vec<PathBuf>,
}

impl ImageSequenceSource {
    pub fn open(dir: impl AsRef<Path>, fps: f64) -> Result<Self> {
        let dir = dir.as_ref();
        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to list frames in {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        frames.sort();

        let id = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        Ok(Self { id, fps, frames })
    }
}

impl FrameSource for ImageSequenceSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn read_frame(&mut self, index: u64) -> Result<Frame> {
        let path = self
            .frames
            .get(index as usize)
            .ok_or_else(|| anyhow!("frame {index} out of range"))?;
        image::open(path).with_context(|| format!("Failed to decode {}", path.display()))
    }
}

// Engine tuning.
//
// Pixel thresholds were tuned on a 640×480 webcam. They stay fixed unless
// `scale_with_resolution` is set, in which case `EngineConfig::scaled_for`
// rescales them by the frame diagonal.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::joints;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pointer–pinch joint distance below which the hand counts as pinched (px)
    pub pinch_threshold_px: f32,
    /// Consecutive points farther apart than this are not joined (px)
    pub max_jump_px: f32,
    /// Width of rasterized stroke segments (px)
    pub stroke_thickness_px: u32,
    /// Strokes with fewer points are discarded at commit
    pub min_stroke_points: usize,
    /// Margin added around the stroke points before normalizing (px)
    pub roi_padding_px: u32,
    /// Letterbox margin as a fraction of the longer crop side
    pub margin_fraction: f32,
    /// Flip frames horizontally before detection (selfie view)
    pub mirror_frames: bool,
    /// Joint that draws
    pub pointer_joint: usize,
    /// Joint whose distance to the pointer joint signals a pinch
    pub pinch_joint: usize,
    pub scale_with_resolution: bool,
    pub reference_width: u32,
    pub reference_height: u32,
    /// Back-off after a missed frame (ms)
    pub idle_sleep_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pinch_threshold_px: 40.0,
            max_jump_px: 100.0,
            stroke_thickness_px: 15,
            min_stroke_points: 5,
            roi_padding_px: 20,
            margin_fraction: 0.2,
            mirror_frames: true,
            pointer_joint: joints::INDEX_TIP,
            pinch_joint: joints::MIDDLE_TIP,
            scale_with_resolution: false,
            reference_width: 640,
            reference_height: 480,
            idle_sleep_ms: 5,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.pinch_threshold_px > 0.0) {
            return Err(Error::Config("pinch_threshold_px must be > 0".into()));
        }
        if !(self.max_jump_px > 0.0) {
            return Err(Error::Config("max_jump_px must be > 0".into()));
        }
        if self.stroke_thickness_px == 0 {
            return Err(Error::Config("stroke_thickness_px must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.margin_fraction) {
            return Err(Error::Config(format!(
                "margin_fraction {} outside 0..=1",
                self.margin_fraction
            )));
        }
        if self.reference_width == 0 || self.reference_height == 0 {
            return Err(Error::Config("reference resolution must be non-zero".into()));
        }
        if self.pointer_joint == self.pinch_joint {
            return Err(Error::Config("pointer_joint and pinch_joint must differ".into()));
        }
        Ok(())
    }

    /// Thresholds for a `width`×`height` frame. Unchanged unless
    /// `scale_with_resolution` is on.
    pub fn scaled_for(&self, width: u32, height: u32) -> Self {
        if !self.scale_with_resolution {
            return self.clone();
        }
        let diag = |w: u32, h: u32| ((w as f32).powi(2) + (h as f32).powi(2)).sqrt();
        let k = diag(width, height) / diag(self.reference_width, self.reference_height);
        let scale_px = |v: u32| ((v as f32 * k).round() as u32).max(1);
        Self {
            pinch_threshold_px: self.pinch_threshold_px * k,
            max_jump_px: self.max_jump_px * k,
            stroke_thickness_px: scale_px(self.stroke_thickness_px),
            roi_padding_px: scale_px(self.roi_padding_px),
            ..self.clone()
        }
    }
}

//! Tunables for both field variants.
//!
//! Configs are plain serde structs with defaults matching the stock landing
//! page look. Load overrides from JSON and adjust further with the builder
//! setters:
//!
//! ```ignore
//! use pixel_field::prelude::*;
//!
//! let config = ImageFieldConfig::from_json_file("field.json")?
//!     .with_repulsion_radius(60.0)
//!     .with_stride(StepTable::fixed(3));
//! ```
//!
//! Missing JSON keys fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::align::Alignment;
use crate::error::{FieldError, Result};

// ========== Stride policy ==========

/// Chooses the sampling stride for an image from the on-screen pixel area.
///
/// Larger screens get a coarser stride so the particle count stays bounded.
/// Any `Fn(f32) -> u32` closure is a policy.
pub trait StridePolicy {
    /// Stride in image pixels for a viewport of `screen_area` square pixels.
    fn stride(&self, screen_area: f32) -> u32;
}

impl<F> StridePolicy for F
where
    F: Fn(f32) -> u32,
{
    fn stride(&self, screen_area: f32) -> u32 {
        self(screen_area)
    }
}

/// One threshold row of a [`StepTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepThreshold {
    /// Screen area that must be exceeded for this row to apply.
    pub above_area: f32,
    /// Stride used past that area.
    pub step: u32,
}

/// Threshold table mapping screen area to stride.
///
/// The last row whose `above_area` is strictly exceeded wins; `base` applies
/// when no row does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTable {
    /// Stride for small screens.
    pub base: u32,
    /// Rows in ascending area order.
    pub thresholds: Vec<StepThreshold>,
}

impl StepTable {
    /// A table that always yields `step`.
    pub fn fixed(step: u32) -> Self {
        Self {
            base: step,
            thresholds: Vec::new(),
        }
    }
}

impl Default for StepTable {
    fn default() -> Self {
        let row = |above_area, step| StepThreshold { above_area, step };
        Self {
            base: 4,
            thresholds: vec![
                row(1_000_000.0, 6),
                row(1_500_000.0, 8),
                row(2_000_000.0, 12),
                row(3_000_000.0, 16),
                row(4_000_000.0, 20),
            ],
        }
    }
}

impl StridePolicy for StepTable {
    fn stride(&self, screen_area: f32) -> u32 {
        self.thresholds
            .iter()
            .filter(|t| screen_area > t.above_area)
            .map(|t| t.step)
            .last()
            .unwrap_or(self.base)
            .max(1)
    }
}

// ========== Image field ==========

/// Settings for the image particle field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageFieldConfig {
    /// Multiplier applied on top of the fit-to-viewport scale.
    pub scale_factor: f32,
    /// Grid cell size used to quantize the pointer offset.
    pub pixel_size: f32,
    /// Pixelated distance below which particles are pushed away.
    pub repulsion_radius: f32,
    /// Euclidean distance below which the pixelated test is even considered.
    pub update_radius: f32,
    /// Distance moved per frame when repelled.
    pub move_step: f32,
    /// Return step while the pointer is inside the region but out of range.
    pub return_step_near: f32,
    /// Return step once the pointer has left the region.
    pub return_step_away: f32,
    /// Per-axis distance below which a returning particle snaps home.
    pub snap_threshold: f32,
    /// Particle count above which frames are throttled.
    pub throttle_above: usize,
    /// Host frame rate the throttle is computed against.
    pub host_fps: u32,
    /// Effective frame rate for throttled fields.
    pub throttled_fps: u32,
    /// Suggested on-screen point size for renderers.
    pub point_size: f32,
    /// Stride table for sampling the image.
    pub stride: StepTable,
}

impl Default for ImageFieldConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.725,
            pixel_size: 12.0,
            repulsion_radius: 45.0,
            update_radius: 50.0,
            move_step: 8.0,
            return_step_near: 6.0,
            return_step_away: 8.0,
            snap_threshold: 0.5,
            throttle_above: 5000,
            host_fps: 60,
            throttled_fps: 30,
            point_size: 6.0,
            stride: StepTable::default(),
        }
    }
}

impl ImageFieldConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that every value is usable by the update rule.
    pub fn validate(&self) -> Result<()> {
        positive("pixel_size", self.pixel_size)?;
        positive("scale_factor", self.scale_factor)?;
        positive("move_step", self.move_step)?;
        positive("return_step_near", self.return_step_near)?;
        positive("return_step_away", self.return_step_away)?;
        non_negative("repulsion_radius", self.repulsion_radius)?;
        non_negative("update_radius", self.update_radius)?;
        non_negative("snap_threshold", self.snap_threshold)?;
        if self.host_fps == 0 || self.throttled_fps == 0 {
            return Err(FieldError::InvalidConfig(
                "frame rates must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn with_scale_factor(mut self, factor: f32) -> Self {
        self.scale_factor = factor;
        self
    }

    pub fn with_pixel_size(mut self, size: f32) -> Self {
        self.pixel_size = size;
        self
    }

    pub fn with_repulsion_radius(mut self, radius: f32) -> Self {
        self.repulsion_radius = radius;
        self
    }

    pub fn with_update_radius(mut self, radius: f32) -> Self {
        self.update_radius = radius;
        self
    }

    pub fn with_move_step(mut self, step: f32) -> Self {
        self.move_step = step;
        self
    }

    /// Set both return steps (near and away) at once.
    pub fn with_return_step(mut self, step: f32) -> Self {
        self.return_step_near = step;
        self.return_step_away = step;
        self
    }

    pub fn with_stride(mut self, stride: StepTable) -> Self {
        self.stride = stride;
        self
    }

    /// Disable frame throttling regardless of particle count.
    pub fn without_throttle(mut self) -> Self {
        self.throttle_above = usize::MAX;
        self
    }
}

// ========== Mesh field ==========

/// Settings for the sphere-to-text mesh field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshFieldConfig {
    /// Number of particles sampled from each surface.
    pub count: usize,
    /// Radius of the idle sphere.
    pub sphere_radius: f32,
    /// Longitude segments of the sphere mesh.
    pub sphere_width_segments: u32,
    /// Latitude segments of the sphere mesh.
    pub sphere_height_segments: u32,
    /// Fraction of the remaining distance covered each frame.
    pub blend: f32,
    /// Amplitude of the idle z wave.
    pub wave_amplitude: f32,
    /// Radial frequency of the idle z wave.
    pub wave_frequency: f32,
    /// Glyph height as a fraction of the smaller viewport side.
    pub font_size_ratio: f32,
    /// Maximum line width as a fraction of the viewport width.
    pub max_width_ratio: f32,
    /// Distance between baselines, in multiples of the font size.
    pub line_spacing: f32,
    /// Extrusion depth, in multiples of the font size.
    pub depth_ratio: f32,
    /// How base and target samples are paired up.
    pub alignment: Alignment,
    /// Seed for surface sampling. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Uniform particle colour.
    pub color: [f32; 3],
    /// Suggested point size for renderers.
    pub point_size: f32,
}

impl Default for MeshFieldConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            sphere_radius: 2.0,
            sphere_width_segments: 32,
            sphere_height_segments: 32,
            blend: 0.04,
            wave_amplitude: 0.2,
            wave_frequency: 2.0,
            font_size_ratio: 0.2,
            max_width_ratio: 0.8,
            line_spacing: 1.2,
            depth_ratio: 0.1,
            alignment: Alignment::Angular,
            seed: None,
            color: [1.0, 1.0, 1.0],
            point_size: 0.02,
        }
    }
}

impl MeshFieldConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that every value is usable by the builder and update rule.
    pub fn validate(&self) -> Result<()> {
        if !(self.blend > 0.0 && self.blend <= 1.0) {
            return Err(FieldError::InvalidConfig(format!(
                "blend must be in (0, 1], got {}",
                self.blend
            )));
        }
        positive("sphere_radius", self.sphere_radius)?;
        positive("font_size_ratio", self.font_size_ratio)?;
        positive("max_width_ratio", self.max_width_ratio)?;
        non_negative("line_spacing", self.line_spacing)?;
        non_negative("depth_ratio", self.depth_ratio)?;
        Ok(())
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_blend(mut self, blend: f32) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_sphere(mut self, radius: f32, width_segments: u32, height_segments: u32) -> Self {
        self.sphere_radius = radius;
        self.sphere_width_segments = width_segments;
        self.sphere_height_segments = height_segments;
        self
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(FieldError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(FieldError::InvalidConfig(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}

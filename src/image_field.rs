//! Image particle fields.
//!
//! An image is sampled on a stride grid; every sampled pixel with non-zero
//! alpha becomes one coloured particle, laid out centred in the viewport. Each
//! frame, particles near the pointer are shoved away along an 8-direction
//! grid, and everything else steps back home.
//!
//! # Example
//!
//! ```ignore
//! use pixel_field::prelude::*;
//!
//! let screen = Vec2::new(1920.0, 1080.0);
//! let mut field = ImageField::from_path("assets/frame.png", screen, ImageFieldConfig::default())?;
//! let mut tracker = PointerTracker::new(section_rect, screen);
//!
//! // per frame
//! field.update(tracker.state());
//! upload(bytemuck::cast_slice(&field.cloud().vertices()));
//! ```
//!
//! # The repulsion rule
//!
//! The offset from pointer to particle is floored onto a grid of
//! `pixel_size` cells. The larger absolute grid component is the
//! *pixelated distance*. Inside `repulsion_radius - pixel_size` the particle
//! moves `move_step` along the dominant grid axis (both axes on a tie), which
//! gives blocky, stepwise motion instead of a smooth radial push. Particles in
//! the rim band just inside `update_radius` hold still so they do not jitter
//! between push and return.

use std::path::Path;

use glam::{Vec2, Vec3};
use image::RgbaImage;

use crate::cloud::PointCloud;
use crate::config::{ImageFieldConfig, StridePolicy};
use crate::error::Result;
use crate::pointer::PointerState;
use crate::throttle::FrameThrottle;

// ========== Sampling ==========

/// Scale that fits an `image_size` image into a `screen` viewport.
pub fn fit_scale(image_size: Vec2, screen: Vec2, scale_factor: f32) -> f32 {
    let longest = image_size.max_element();
    if longest <= 0.0 {
        return 0.0;
    }
    screen.min_element() / longest * scale_factor
}

/// Sample an image into a coloured point cloud.
///
/// Pixels are visited every `stride` columns and rows starting at `(0, 0)`.
/// A pixel at `(x, y)` lands at `((x - w/2) * scale, (h/2 - y) * scale, 0)`
/// with its colour normalized to `0.0..=1.0`. Fully transparent pixels are
/// skipped, so a transparent image yields an empty cloud.
pub fn sample_image(image: &RgbaImage, stride: u32, scale: f32) -> PointCloud {
    let (width, height) = image.dimensions();
    let stride = stride.max(1) as usize;
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;

    let mut positions = Vec::new();
    let mut colors = Vec::new();

    for y in (0..height).step_by(stride) {
        for x in (0..width).step_by(stride) {
            let [r, g, b, a] = image.get_pixel(x, y).0;
            if a == 0 {
                continue;
            }
            positions.push(Vec3::new(
                (x as f32 - half_w) * scale,
                (half_h - y as f32) * scale,
                0.0,
            ));
            colors.push(Vec3::new(r as f32, g as f32, b as f32) / 255.0);
        }
    }

    PointCloud::with_colors(positions, colors).unwrap_or_default()
}

// ========== Update rule ==========

/// Advance every particle one frame under the repulsion/return rule.
///
/// Only the x and y components move. Safe on empty buffers.
///
/// # Panics
///
/// If `config` has a negative or NaN return step. [`ImageField`] validates
/// its config up front, so only direct callers need to care.
pub fn repel_step(current: &mut [Vec3], base: &[Vec3], pointer: PointerState, config: &ImageFieldConfig) {
    if !pointer.inside {
        for (p, b) in current.iter_mut().zip(base) {
            return_toward(p, *b, config.return_step_away, config.snap_threshold);
        }
        return;
    }

    for (p, b) in current.iter_mut().zip(base) {
        let offset = Vec2::new(p.x, p.y) - pointer.position;
        if offset.length() < config.update_radius {
            let grid = (offset / config.pixel_size).floor() * config.pixel_size;
            let pixelated = grid.abs().max_element();
            if pixelated < config.repulsion_radius - config.pixel_size {
                let step = grid_step(grid, config.move_step);
                p.x += step.x;
                p.y += step.y;
            }
            continue;
        }
        return_toward(p, *b, config.return_step_near, config.snap_threshold);
    }
}

/// Move along the dominant grid axis, or diagonally on a tie.
fn grid_step(grid: Vec2, step: f32) -> Vec2 {
    let toward = |v: f32| if v > 0.0 { step } else { -step };
    let (ax, ay) = (grid.x.abs(), grid.y.abs());
    if ax == ay {
        Vec2::new(toward(grid.x), toward(grid.y))
    } else if ax > ay {
        Vec2::new(toward(grid.x), 0.0)
    } else {
        Vec2::new(0.0, toward(grid.y))
    }
}

fn return_toward(p: &mut Vec3, base: Vec3, step: f32, threshold: f32) {
    p.x = return_axis(p.x, base.x, step, threshold);
    p.y = return_axis(p.y, base.y, step, threshold);
}

fn return_axis(current: f32, base: f32, step: f32, threshold: f32) -> f32 {
    let delta = base - current;
    if delta.abs() > threshold {
        current + delta.clamp(-step, step)
    } else {
        base
    }
}

// ========== Field ==========

/// A point cloud sampled from an image, with its per-frame update state.
#[derive(Debug, Clone)]
pub struct ImageField {
    cloud: PointCloud,
    config: ImageFieldConfig,
    throttle: FrameThrottle,
}

impl ImageField {
    /// Wrap an existing cloud. Fails if `config` does not validate.
    pub fn new(cloud: PointCloud, config: ImageFieldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(cloud, config))
    }

    fn assemble(cloud: PointCloud, config: ImageFieldConfig) -> Self {
        let throttle = FrameThrottle::for_count(
            cloud.len(),
            config.throttle_above,
            config.host_fps,
            config.throttled_fps,
        );
        log::debug!(
            "image field: {} particles, updating every {} frame(s)",
            cloud.len(),
            throttle.interval()
        );
        Self {
            cloud,
            config,
            throttle,
        }
    }

    /// An inert field with no particles.
    pub fn empty(config: ImageFieldConfig) -> Result<Self> {
        Self::new(PointCloud::empty(), config)
    }

    /// Build from a decoded image, choosing the stride from `config.stride`.
    pub fn from_image(image: &RgbaImage, screen: Vec2, config: ImageFieldConfig) -> Result<Self> {
        let policy = config.stride.clone();
        Self::from_image_with_policy(image, screen, config, &policy)
    }

    /// Build from a decoded image with a custom stride policy.
    pub fn from_image_with_policy(
        image: &RgbaImage,
        screen: Vec2,
        config: ImageFieldConfig,
        policy: &impl StridePolicy,
    ) -> Result<Self> {
        config.validate()?;
        let area = screen.x * screen.y;
        let stride = policy.stride(area);
        log::debug!("screen area {area}, sampling stride {stride}");

        let (w, h) = image.dimensions();
        let scale = fit_scale(Vec2::new(w as f32, h as f32), screen, config.scale_factor);
        let cloud = sample_image(image, stride, scale);
        Ok(Self::assemble(cloud, config))
    }

    /// Decode an image file and build a field from it.
    pub fn from_path<P: AsRef<Path>>(path: P, screen: Vec2, config: ImageFieldConfig) -> Result<Self> {
        config.validate()?;
        let image = image::open(path.as_ref())?.into_rgba8();
        Self::from_image(&image, screen, config)
    }

    /// Decode an in-memory image (PNG or JPEG) and build a field from it.
    pub fn from_memory(bytes: &[u8], screen: Vec2, config: ImageFieldConfig) -> Result<Self> {
        config.validate()?;
        let image = image::load_from_memory(bytes)?.into_rgba8();
        Self::from_image(&image, screen, config)
    }

    /// Like [`from_path`](Self::from_path), but an unreadable image degrades
    /// to an empty field. Only an invalid `config` is an error.
    pub fn from_path_or_empty<P: AsRef<Path>>(
        path: P,
        screen: Vec2,
        config: ImageFieldConfig,
    ) -> Result<Self> {
        config.validate()?;
        match Self::from_path(path.as_ref(), screen, config.clone()) {
            Ok(field) => Ok(field),
            Err(e) => {
                log::warn!(
                    "image field '{}' left empty: {}",
                    path.as_ref().display(),
                    e
                );
                Ok(Self::assemble(PointCloud::empty(), config))
            }
        }
    }

    /// Replace the frame throttle.
    pub fn with_throttle(mut self, throttle: FrameThrottle) -> Self {
        self.throttle = throttle;
        self
    }

    #[inline]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    #[inline]
    pub fn config(&self) -> &ImageFieldConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    /// Host frame callback. Returns `false` when the throttle skipped this frame.
    pub fn update(&mut self, pointer: PointerState) -> bool {
        if !self.throttle.tick() {
            log::trace!("image field frame skipped");
            return false;
        }
        self.step(pointer);
        true
    }

    /// Advance one frame, ignoring the throttle.
    pub fn step(&mut self, pointer: PointerState) {
        let (current, base) = self.cloud.split_mut();
        repel_step(current, base, pointer, &self.config);
    }
}

//! Point clouds shared by both field variants.
//!
//! A [`PointCloud`] pairs an immutable set of base (rest) positions with a
//! mutable buffer of current positions. Index `i` in either buffer is the same
//! logical particle, and the two buffers always have the same length.
//!
//! # GPU upload
//!
//! [`PointCloud::vertices`] packs positions and colours into [`PointVertex`],
//! a `#[repr(C)]` type that implements `bytemuck::Pod`, so a renderer can do
//! `bytemuck::cast_slice(&cloud.vertices())` straight into a vertex buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::{FieldError, Result};

/// One particle as laid out in a vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    /// Current position.
    pub position: [f32; 3],
    /// RGB colour, each channel in `0.0..=1.0`.
    pub color: [f32; 3],
}

/// Base and current positions of a fixed set of particles, with optional colour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    base: Vec<Vec3>,
    current: Vec<Vec3>,
    colors: Option<Vec<Vec3>>,
}

impl PointCloud {
    /// Create a cloud at rest: current positions start equal to `base`.
    pub fn new(base: Vec<Vec3>) -> Self {
        Self {
            current: base.clone(),
            base,
            colors: None,
        }
    }

    /// Create a coloured cloud at rest.
    ///
    /// Fails if `colors` is not index-aligned with `base`.
    pub fn with_colors(base: Vec<Vec3>, colors: Vec<Vec3>) -> Result<Self> {
        if colors.len() != base.len() {
            return Err(FieldError::LengthMismatch {
                expected: base.len(),
                actual: colors.len(),
            });
        }
        Ok(Self {
            current: base.clone(),
            base,
            colors: Some(colors),
        })
    }

    /// An empty cloud. Update rules are no-ops on it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Whether the cloud holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Rest positions, fixed at construction.
    #[inline]
    pub fn base(&self) -> &[Vec3] {
        &self.base
    }

    /// Positions as of the last update.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.current
    }

    /// Per-particle colours, if the cloud was built with them.
    #[inline]
    pub fn colors(&self) -> Option<&[Vec3]> {
        self.colors.as_deref()
    }

    /// Current positions alongside their base positions, for in-place updates.
    #[inline]
    pub(crate) fn split_mut(&mut self) -> (&mut [Vec3], &[Vec3]) {
        (&mut self.current, &self.base)
    }

    /// Overwrite current positions.
    ///
    /// The replacement must keep the particle count unchanged.
    pub fn set_positions(&mut self, positions: Vec<Vec3>) -> Result<()> {
        if positions.len() != self.base.len() {
            return Err(FieldError::LengthMismatch {
                expected: self.base.len(),
                actual: positions.len(),
            });
        }
        self.current = positions;
        Ok(())
    }

    /// Put every particle back on its base position.
    pub fn reset(&mut self) {
        self.current.copy_from_slice(&self.base);
    }

    /// Whether every particle sits exactly on its base position.
    pub fn is_at_rest(&self) -> bool {
        self.current == self.base
    }

    /// Pack current positions and colours for upload.
    ///
    /// Particles without a colour buffer are emitted with `fallback`.
    pub fn vertices_with(&self, fallback: Vec3) -> Vec<PointVertex> {
        self.current
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let c = self
                    .colors
                    .as_ref()
                    .map_or(fallback, |colors| colors[i]);
                PointVertex {
                    position: p.to_array(),
                    color: c.to_array(),
                }
            })
            .collect()
    }

    /// Pack current positions and colours for upload, white when uncoloured.
    pub fn vertices(&self) -> Vec<PointVertex> {
        self.vertices_with(Vec3::ONE)
    }
}

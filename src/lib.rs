//! # pixel-field
//!
//! Animated pixel-particle backgrounds, computed on the CPU and handed to any
//! renderer as a flat vertex buffer.
//!
//! Two independent field types are provided:
//!
//! - [`ImageField`] samples a raster image into coloured particles that
//!   scatter away from the pointer in blocky, grid-snapped steps and walk
//!   back home when it leaves.
//! - [`MeshField`] samples points from a sphere and from extruded pixel-font
//!   text, and eases the same particles between the two shapes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pixel_field::prelude::*;
//!
//! let screen = Vec2::new(1280.0, 720.0);
//! let mut field = ImageField::from_path_or_empty("hero.png", screen, ImageFieldConfig::default())?;
//! let mut pointer = PointerTracker::new(Rect::new(0.0, 0.0, 1280.0, 720.0), screen);
//!
//! // event listeners
//! pointer.handle_event(PointerEvent::Moved(Vec2::new(640.0, 360.0)));
//!
//! // frame callback
//! if field.update(pointer.state()) {
//!     renderer.upload(bytemuck::cast_slice(&field.cloud().vertices()));
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Point clouds
//!
//! Every field owns a [`PointCloud`]: base positions fixed at construction
//! plus a current-position buffer of the same length that the update rule
//! mutates in place.
//!
//! ### Per-instance state
//!
//! Pointer and clock state live in values the host owns ([`PointerTracker`],
//! [`FrameClock`]) and pass into `update` each frame. Nothing is global, so
//! any number of fields can run side by side.
//!
//! ### Silent degradation
//!
//! Asset problems surface as [`FieldError`]. A host that cannot load an asset
//! renders an empty field; update rules are no-ops on empty clouds.
//!
//! ## Feature Overview
//!
//! | Concern | Items |
//! |---------|-------|
//! | Image fields | [`ImageField`], [`image_field::sample_image`], [`image_field::repel_step`] |
//! | Mesh fields | [`MeshField`], [`mesh_field::interpolate_step`] |
//! | Geometry | [`TriangleMesh`], [`SurfaceSampler`], [`PixelFont`] |
//! | Pairing | [`Alignment`], [`align::align`] |
//! | Input | [`PointerTracker`], [`PointerEvent`], [`Rect`] |
//! | Tuning | [`ImageFieldConfig`], [`MeshFieldConfig`], [`StridePolicy`], [`FrameThrottle`] |

pub mod align;
pub mod clock;
pub mod cloud;
pub mod config;
mod error;
pub mod font;
pub mod image_field;
pub mod mesh;
pub mod mesh_field;
pub mod pointer;
pub mod sampler;
pub mod throttle;

pub use align::Alignment;
pub use bytemuck;
pub use clock::FrameClock;
pub use cloud::{PointCloud, PointVertex};
pub use config::{ImageFieldConfig, MeshFieldConfig, StepTable, StepThreshold, StridePolicy};
pub use error::{FieldError, Result};
pub use font::{PixelFont, TextLayout};
pub use glam::{Vec2, Vec3};
pub use image_field::ImageField;
pub use mesh::TriangleMesh;
pub use mesh_field::MeshField;
pub use pointer::{PointerEvent, PointerState, PointerTracker, Rect};
pub use sampler::SurfaceSampler;
pub use throttle::FrameThrottle;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use pixel_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::align::Alignment;
    pub use crate::clock::FrameClock;
    pub use crate::cloud::{PointCloud, PointVertex};
    pub use crate::config::{ImageFieldConfig, MeshFieldConfig, StepTable, StridePolicy};
    pub use crate::error::{FieldError, Result};
    pub use crate::font::{PixelFont, TextLayout};
    pub use crate::image_field::ImageField;
    pub use crate::mesh::TriangleMesh;
    pub use crate::mesh_field::MeshField;
    pub use crate::pointer::{PointerEvent, PointerState, PointerTracker, Rect};
    pub use crate::throttle::FrameThrottle;
    pub use crate::{Vec2, Vec3};
}

//! Sphere-to-text mesh particle fields.
//!
//! A fixed number of points is sampled from the surface of a sphere (the
//! base set) and, once a font is available, the same number from a text mesh
//! (the target set). Each frame every particle eases a fixed fraction of the
//! way toward its goal: its text partner while the field is *formed*, or its
//! sphere position flattened onto an undulating wave while *scattered*.
//!
//! # Example
//!
//! ```ignore
//! use pixel_field::prelude::*;
//!
//! let mut field = MeshField::new(MeshFieldConfig::default())?;
//! field.rebuild_targets("SENPO STUDIOS", &PixelFont::builtin(), Vec2::new(10.0, 6.0))?;
//! field.set_formed(true);
//!
//! let mut clock = FrameClock::new();
//! // per frame
//! field.update(clock.tick());
//! ```
//!
//! Easing is geometric: a formed particle covers `blend` of its remaining
//! distance each frame, so it approaches the text without ever landing on it
//! exactly.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;

use crate::align::{match_targets, sort_by_angle};
use crate::cloud::{PointCloud, PointVertex};
use crate::config::MeshFieldConfig;
use crate::error::{FieldError, Result};
use crate::font::{PixelFont, TextLayout};
use crate::mesh::TriangleMesh;
use crate::sampler::{sampling_rng, SurfaceSampler};

// ========== Update rule ==========

/// Where a scattered particle heads: its base x and y, with z on the idle wave.
#[inline]
pub fn idle_goal(base: Vec3, elapsed: f32, config: &MeshFieldConfig) -> Vec3 {
    let r = Vec2::new(base.x, base.y).length();
    let z = (elapsed + r * config.wave_frequency).sin() * config.wave_amplitude;
    Vec3::new(base.x, base.y, z)
}

/// Advance every particle one frame.
///
/// With `target` present, particles ease toward it; otherwise they ease toward
/// the idle wave over `base`. Safe on empty buffers.
pub fn interpolate_step(
    current: &mut [Vec3],
    base: &[Vec3],
    target: Option<&[Vec3]>,
    elapsed: f32,
    config: &MeshFieldConfig,
) {
    match target {
        Some(target) => {
            for (p, t) in current.iter_mut().zip(target) {
                *p = p.lerp(*t, config.blend);
            }
        }
        None => {
            for (p, b) in current.iter_mut().zip(base) {
                *p = p.lerp(idle_goal(*b, elapsed, config), config.blend);
            }
        }
    }
}

// ========== Field ==========

/// Particles sampled from a sphere that can form into text.
#[derive(Debug, Clone)]
pub struct MeshField {
    cloud: PointCloud,
    targets: Option<Vec<Vec3>>,
    formed: bool,
    config: MeshFieldConfig,
    rng: SmallRng,
}

impl MeshField {
    /// Sample the base sphere. The field starts scattered with no targets.
    pub fn new(config: MeshFieldConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = sampling_rng(config.seed);

        let sphere = TriangleMesh::sphere(
            config.sphere_radius,
            config.sphere_width_segments,
            config.sphere_height_segments,
        );
        let mut base = SurfaceSampler::new(&sphere)?.sample_n(config.count, &mut rng);
        sort_by_angle(&mut base);
        log::debug!("mesh field: sampled {} sphere points", base.len());

        Ok(Self {
            cloud: PointCloud::new(base),
            targets: None,
            formed: false,
            config,
            rng,
        })
    }

    #[inline]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    #[inline]
    pub fn config(&self) -> &MeshFieldConfig {
        &self.config
    }

    /// Target positions, index-aligned with the base set, if built.
    #[inline]
    pub fn targets(&self) -> Option<&[Vec3]> {
        self.targets.as_deref()
    }

    #[inline]
    pub fn has_targets(&self) -> bool {
        self.targets.is_some()
    }

    #[inline]
    pub fn is_formed(&self) -> bool {
        self.formed
    }

    /// Request the formed (text) or scattered (sphere) state.
    ///
    /// Forming without targets is allowed; the field idles until they arrive.
    pub fn set_formed(&mut self, formed: bool) {
        self.formed = formed;
    }

    /// Flip between formed and scattered. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.formed = !self.formed;
        self.formed
    }

    /// Install an explicit target set, reordered to pair with the base set.
    pub fn set_targets(&mut self, mut targets: Vec<Vec3>) -> Result<()> {
        if targets.len() != self.cloud.len() {
            return Err(FieldError::LengthMismatch {
                expected: self.cloud.len(),
                actual: targets.len(),
            });
        }
        match_targets(self.cloud.base(), &mut targets, self.config.alignment);
        self.targets = Some(targets);
        Ok(())
    }

    /// Sample targets from an arbitrary mesh.
    pub fn sample_targets(&mut self, mesh: &TriangleMesh) -> Result<()> {
        let sampler = SurfaceSampler::new(mesh)?;
        let targets = sampler.sample_n(self.cloud.len(), &mut self.rng);
        self.set_targets(targets)
    }

    /// Lay out `text` for a viewport of `viewport` world units and sample it.
    ///
    /// Call again on resize. On failure (for example text with no renderable
    /// glyphs) the previous targets are kept.
    pub fn rebuild_targets(&mut self, text: &str, font: &PixelFont, viewport: Vec2) -> Result<()> {
        let layout = TextLayout::for_viewport(viewport, &self.config);
        let mesh = font.layout(text, &layout);
        self.sample_targets(&mesh)
    }

    /// Drop the target set; the field idles until new targets are built.
    pub fn clear_targets(&mut self) {
        self.targets = None;
    }

    /// Host frame callback. `elapsed` is seconds since the field mounted.
    pub fn update(&mut self, elapsed: f32) {
        let target = if self.formed {
            self.targets.as_deref()
        } else {
            None
        };
        let (current, base) = self.cloud.split_mut();
        interpolate_step(current, base, target, elapsed, &self.config);
    }

    /// Pack positions with the configured colour for upload.
    pub fn vertices(&self) -> Vec<PointVertex> {
        self.cloud.vertices_with(Vec3::from_array(self.config.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(count: usize) -> MeshField {
        MeshField::new(MeshFieldConfig::default().with_count(count).with_seed(11)).unwrap()
    }

    #[test]
    fn test_base_on_sphere_and_sorted() {
        let f = field(300);
        assert_eq!(f.cloud().len(), 300);
        assert!(f.cloud().base().iter().all(|p| p.length() <= 2.0 + 1e-4));
        let angles: Vec<f32> = f
            .cloud()
            .base()
            .iter()
            .map(|p| crate::align::polar_angle(*p))
            .collect();
        assert!(angles.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_idle_goal_wave() {
        let config = MeshFieldConfig::default();
        let goal = idle_goal(Vec3::new(0.0, 0.0, 1.5), std::f32::consts::FRAC_PI_2, &config);
        assert_eq!(goal.x, 0.0);
        assert!((goal.z - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_formed_without_targets_idles() {
        let mut a = field(50);
        let mut b = a.clone();
        a.set_formed(true);
        a.update(1.0);
        b.update(1.0);
        assert_eq!(a.cloud().positions(), b.cloud().positions());
    }

    #[test]
    fn test_lerp_fraction() {
        let mut f = field(1);
        f.set_targets(vec![Vec3::new(10.0, 0.0, 0.0)]).unwrap();
        f.set_formed(true);
        let start = f.cloud().positions()[0];
        f.update(0.0);
        let expected = start.lerp(Vec3::new(10.0, 0.0, 0.0), 0.04);
        assert!(f.cloud().positions()[0].distance(expected) < 1e-5);
    }

    #[test]
    fn test_targets_must_match_count() {
        let mut f = field(10);
        let err = f.set_targets(vec![Vec3::ZERO; 3]).unwrap_err();
        assert!(matches!(
            err,
            FieldError::LengthMismatch {
                expected: 10,
                actual: 3
            }
        ));
        assert!(!f.has_targets());
    }

    #[test]
    fn test_rebuild_targets_from_text() {
        let mut f = field(200);
        f.rebuild_targets("HI", &PixelFont::builtin(), Vec2::new(10.0, 6.0))
            .unwrap();
        let targets = f.targets().unwrap();
        assert_eq!(targets.len(), 200);
        assert!(targets.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn test_failed_rebuild_keeps_old_targets() {
        let mut f = field(20);
        let font = PixelFont::builtin();
        f.rebuild_targets("OK", &font, Vec2::new(10.0, 6.0)).unwrap();
        let before = f.targets().unwrap().to_vec();
        assert!(f.rebuild_targets("~~", &font, Vec2::new(10.0, 6.0)).is_err());
        assert_eq!(f.targets().unwrap(), before.as_slice());
    }

    #[test]
    fn test_toggle() {
        let mut f = field(1);
        assert!(!f.is_formed());
        assert!(f.toggle());
        assert!(!f.toggle());
    }

    #[test]
    fn test_empty_field_updates() {
        let mut f = field(0);
        f.set_formed(true);
        f.update(3.0);
        assert!(f.cloud().is_empty());
    }
}

//! Triangle meshes used as sampling sources.
//!
//! Only what surface sampling needs: positions and triangle indices. There
//! are no normals or UVs, since particles are rendered as unlit points.

use std::f32::consts::PI;

use glam::Vec3;

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// UV sphere centred at the origin.
    ///
    /// Pole rows emit a single triangle per segment so no degenerate triangles
    /// reach the sampler.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row_len = width_segments + 1;

        let mut mesh = Self::new();
        for iy in 0..=height_segments {
            let theta = iy as f32 / height_segments as f32 * PI;
            for ix in 0..=width_segments {
                let phi = ix as f32 / width_segments as f32 * PI * 2.0;
                mesh.positions.push(Vec3::new(
                    -radius * theta.sin() * phi.cos(),
                    radius * theta.cos(),
                    radius * theta.sin() * phi.sin(),
                ));
            }
        }

        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row_len + ix + 1;
                let b = iy * row_len + ix;
                let c = (iy + 1) * row_len + ix;
                let d = (iy + 1) * row_len + ix + 1;
                if iy != 0 {
                    mesh.indices.push([a, b, d]);
                }
                if iy != height_segments - 1 {
                    mesh.indices.push([b, c, d]);
                }
            }
        }
        mesh
    }

    /// Append a quad `a b c d` (counter-clockwise) as two triangles.
    pub fn push_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[a, b, c, d]);
        self.indices.push([base, base + 1, base + 2]);
        self.indices.push([base, base + 2, base + 3]);
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Corner positions of every triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.iter().map(|[a, b, c]| {
            [
                self.positions[*a as usize],
                self.positions[*b as usize],
                self.positions[*c as usize],
            ]
        })
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f32 {
        self.triangles().map(|t| triangle_area(&t)).sum()
    }

    /// Shift every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for a mesh with no vertices.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    /// Translate so the bounding box is centred on the origin.
    pub fn center(&mut self) {
        if let Some((lo, hi)) = self.bounding_box() {
            self.translate(-(lo + hi) * 0.5);
        }
    }

    /// Append another mesh.
    pub fn append(&mut self, other: &TriangleMesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices
            .extend(other.indices.iter().map(|[a, b, c]| [a + base, b + base, c + base]));
    }

    /// Merge several meshes into one.
    pub fn merge<'a>(meshes: impl IntoIterator<Item = &'a TriangleMesh>) -> Self {
        let mut merged = Self::new();
        for mesh in meshes {
            merged.append(mesh);
        }
        merged
    }
}

/// Area of a triangle.
#[inline]
pub fn triangle_area([a, b, c]: &[Vec3; 3]) -> f32 {
    (*b - *a).cross(*c - *a).length() * 0.5
}

//! Uniform random sampling of mesh surfaces.
//!
//! Triangles are chosen with probability proportional to their area, then a
//! point is drawn uniformly inside the chosen triangle, so samples are spread
//! evenly over the whole surface regardless of how it is tessellated.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{FieldError, Result};
use crate::mesh::{triangle_area, TriangleMesh};

/// Area-weighted sampler over a mesh's triangles.
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    triangles: Vec<[Vec3; 3]>,
    cumulative: Vec<f32>,
    total: f32,
}

impl SurfaceSampler {
    /// Build the sampling table. Fails if the mesh has no surface area.
    pub fn new(mesh: &TriangleMesh) -> Result<Self> {
        let mut triangles = Vec::with_capacity(mesh.triangle_count());
        let mut cumulative = Vec::with_capacity(mesh.triangle_count());
        let mut total = 0.0;

        for tri in mesh.triangles() {
            let area = triangle_area(&tri);
            if area <= 0.0 {
                continue;
            }
            total += area;
            triangles.push(tri);
            cumulative.push(total);
        }

        if triangles.is_empty() || !total.is_finite() {
            return Err(FieldError::EmptyMesh);
        }

        Ok(Self {
            triangles,
            cumulative,
            total,
        })
    }

    /// Total sampled area.
    #[inline]
    pub fn area(&self) -> f32 {
        self.total
    }

    /// Draw one surface point.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let target = rng.gen_range(0.0..self.total);
        let idx = self
            .cumulative
            .partition_point(|&c| c <= target)
            .min(self.triangles.len() - 1);
        let [a, b, c] = self.triangles[idx];

        let mut u: f32 = rng.gen();
        let mut v: f32 = rng.gen();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        a + (b - a) * u + (c - a) * v
    }

    /// Draw `count` surface points.
    pub fn sample_n<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<Vec3> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}

/// Seeded RNG, or one seeded from the clock when `seed` is `None`.
pub fn sampling_rng(seed: Option<u64>) -> SmallRng {
    let seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });
    SmallRng::seed_from_u64(seed)
}

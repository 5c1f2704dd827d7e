//! Pairing base and target samples.
//!
//! Two independently sampled point sets have no index correspondence, so a
//! naive index-for-index interpolation sends particles flying across the
//! scene. Reordering both sets gives each base point a nearby partner.

use std::cmp::Ordering;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Strategy for pairing base and target points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    /// Sort both sets by their angle around the z axis.
    #[default]
    Angular,
    /// Angular sort of the base, then give each base point (in that order)
    /// the nearest still-unclaimed target. Quadratic in the point count.
    GreedyNearest,
}

/// Angle of a point around the origin in the xy plane.
#[inline]
pub fn polar_angle(p: Vec3) -> f32 {
    p.y.atan2(p.x)
}

fn by_angle(a: &Vec3, b: &Vec3) -> Ordering {
    polar_angle(*a).total_cmp(&polar_angle(*b))
}

/// Sort points by [`polar_angle`].
pub fn sort_by_angle(points: &mut [Vec3]) {
    points.sort_by(by_angle);
}

/// Reorder `base` and `target` in place so equal indices are partners.
///
/// Both slices keep their contents; only the order changes.
pub fn align(base: &mut [Vec3], target: &mut [Vec3], alignment: Alignment) {
    sort_by_angle(base);
    match_targets(base, target, alignment);
}

/// Reorder only `target` against a `base` already in angular order.
///
/// Used when targets are rebuilt under a live field whose base order must not
/// change.
pub fn match_targets(base: &[Vec3], target: &mut [Vec3], alignment: Alignment) {
    match alignment {
        Alignment::Angular => sort_by_angle(target),
        Alignment::GreedyNearest => greedy_nearest(base, target),
    }
}

fn greedy_nearest(base: &[Vec3], target: &mut [Vec3]) {
    let mut pool: Vec<Vec3> = target.to_vec();
    for (slot, b) in target.iter_mut().zip(base) {
        let nearest = pool
            .iter()
            .enumerate()
            .min_by(|(_, p), (_, q)| p.distance_squared(*b).total_cmp(&q.distance_squared(*b)))
            .map(|(i, _)| i);
        if let Some(i) = nearest {
            *slot = pool.swap_remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize, radius: f32, phase: f32) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let a = phase + i as f32 / n as f32 * std::f32::consts::TAU;
                Vec3::new(radius * a.cos(), radius * a.sin(), 0.0)
            })
            .collect()
    }

    fn sorted(mut v: Vec<Vec3>) -> Vec<[u32; 3]> {
        let mut keys: Vec<[u32; 3]> = v
            .drain(..)
            .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_angles_ascending() {
        let mut pts = ring(16, 1.0, 0.3);
        pts.reverse();
        sort_by_angle(&mut pts);
        let angles: Vec<f32> = pts.iter().map(|p| polar_angle(*p)).collect();
        assert!(angles.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_align_preserves_contents() {
        let mut base = ring(12, 1.0, 0.0);
        let mut target = ring(12, 3.0, 1.0);
        let (b0, t0) = (base.clone(), target.clone());

        for alignment in [Alignment::Angular, Alignment::GreedyNearest] {
            align(&mut base, &mut target, alignment);
            assert_eq!(sorted(base.clone()), sorted(b0.clone()));
            assert_eq!(sorted(target.clone()), sorted(t0.clone()));
        }
    }

    #[test]
    fn test_angular_pairs_neighbours() {
        // Concentric rings, target indices rotated out of step.
        let mut base = ring(32, 1.0, 0.01);
        let mut target = ring(32, 2.0, 0.02);
        target.rotate_left(11);

        align(&mut base, &mut target, Alignment::Angular);
        for (b, t) in base.iter().zip(&target) {
            assert!(b.distance(*t) < 1.1, "{b} -> {t}");
        }
    }

    #[test]
    fn test_greedy_pairs_nearest() {
        let mut base = vec![Vec3::new(1.0, 0.1, 0.0), Vec3::new(-1.0, 0.1, 0.0)];
        let mut target = vec![Vec3::new(-1.0, 0.2, 0.0), Vec3::new(1.0, 0.2, 0.0)];
        align(&mut base, &mut target, Alignment::GreedyNearest);
        let total: f32 = base.iter().zip(&target).map(|(b, t)| b.distance(*t)).sum();
        assert!((total - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_empty_is_fine() {
        align(&mut [], &mut [], Alignment::GreedyNearest);
    }
}

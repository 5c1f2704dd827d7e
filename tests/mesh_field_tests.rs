//! Integration tests for sphere-to-text mesh fields.

use glam::{Vec2, Vec3};
use pixel_field::mesh_field::interpolate_step;
use pixel_field::prelude::*;
use proptest::prelude::*;

fn seeded(count: usize) -> MeshField {
    MeshField::new(MeshFieldConfig::default().with_count(count).with_seed(7)).unwrap()
}

fn distances(field: &MeshField) -> Vec<f32> {
    let targets = field.targets().unwrap();
    field
        .cloud()
        .positions()
        .iter()
        .zip(targets)
        .map(|(p, t)| p.distance(*t))
        .collect()
}

// ============================================================================
// Forming
// ============================================================================

#[test]
fn test_text_targets_cover_every_particle() {
    let mut field = seeded(500);
    field
        .rebuild_targets("SENPO STUDIOS", &PixelFont::builtin(), Vec2::new(10.0, 6.0))
        .unwrap();

    let targets = field.targets().unwrap();
    assert_eq!(targets.len(), field.cloud().len());
    assert!(targets.iter().all(|t| t.is_finite()));
}

#[test]
fn test_index_pairs_sphere_point_with_text_point() {
    let font = PixelFont::builtin();
    let viewport = Vec2::new(10.0, 6.0);
    let mut field = seeded(400);
    field.rebuild_targets("SENPO STUDIOS", &font, viewport).unwrap();

    let layout = TextLayout::for_viewport(viewport, field.config());
    let (lo, hi) = font.layout("SENPO STUDIOS", &layout).bounding_box().unwrap();
    let eps = Vec3::splat(1e-4);

    let targets = field.targets().unwrap();
    let base = field.cloud().base();
    assert_eq!(targets.len(), base.len());
    for (i, (b, t)) in base.iter().zip(targets).enumerate() {
        assert!(
            t.cmpge(lo - eps).all() && t.cmple(hi + eps).all(),
            "target {i} at {t} outside text bounds"
        );
        assert!(
            b.length() <= 2.0 + 1e-4 && b.length() > 1.98,
            "base {i} at {b} left the sphere"
        );
    }
}

#[test]
fn test_explicit_targets_leave_base_on_sphere() {
    let mut field = seeded(50);
    let base = field.cloud().base().to_vec();
    let targets: Vec<Vec3> = (0..50).map(|i| Vec3::new(i as f32 * 0.1, 1.0, 0.0)).collect();
    field.set_targets(targets).unwrap();

    assert_eq!(field.cloud().base(), base.as_slice());
    assert!(field
        .targets()
        .unwrap()
        .iter()
        .all(|t| t.y == 1.0 && (0.0..=4.9 + 1e-4).contains(&t.x)));
}

#[test]
fn test_forming_closes_distance_every_frame() {
    let mut field = seeded(300);
    field
        .rebuild_targets("HELLO", &PixelFont::builtin(), Vec2::new(8.0, 6.0))
        .unwrap();
    field.set_formed(true);

    let mut clock = FrameClock::fixed(1.0 / 60.0);
    let mut before = distances(&field);
    for _ in 0..60 {
        field.update(clock.tick());
        let after = distances(&field);
        for (a, b) in after.iter().zip(&before) {
            assert!(a <= b, "distance grew from {b} to {a}");
        }
        before = after;
    }
}

#[test]
fn test_formed_then_scattered_returns_to_sphere() {
    let mut field = seeded(200);
    field
        .rebuild_targets("GO", &PixelFont::builtin(), Vec2::new(8.0, 6.0))
        .unwrap();

    field.set_formed(true);
    for frame in 0..200 {
        field.update(frame as f32 / 60.0);
    }
    field.set_formed(false);
    for frame in 200..600 {
        field.update(frame as f32 / 60.0);
    }

    // Scattered particles sit on their sphere point in x and y; z rides the wave.
    for (p, b) in field.cloud().positions().iter().zip(field.cloud().base()) {
        assert!(Vec2::new(p.x - b.x, p.y - b.y).length() < 0.01);
        assert!(p.z.abs() <= 0.2 + 0.01);
    }
}

#[test]
fn test_rebuild_on_resize_keeps_base_order() {
    let mut field = seeded(100);
    let base = field.cloud().base().to_vec();
    let font = PixelFont::builtin();

    field.rebuild_targets("WIDE TEXT", &font, Vec2::new(12.0, 6.0)).unwrap();
    field.rebuild_targets("WIDE TEXT", &font, Vec2::new(4.0, 6.0)).unwrap();
    assert_eq!(field.cloud().base(), base.as_slice());
}

#[test]
fn test_same_seed_same_field() {
    let a = seeded(64);
    let b = seeded(64);
    assert_eq!(a.cloud().base(), b.cloud().base());
}

#[test]
fn test_greedy_alignment_pairs_each_target_once() {
    let config = MeshFieldConfig::default()
        .with_count(40)
        .with_seed(3)
        .with_alignment(Alignment::GreedyNearest);
    let mut field = MeshField::new(config).unwrap();

    let targets: Vec<Vec3> = (0..40).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
    field.set_targets(targets).unwrap();

    let mut xs: Vec<i32> = field.targets().unwrap().iter().map(|t| t.x as i32).collect();
    xs.sort_unstable();
    assert_eq!(xs, (0..40).collect::<Vec<_>>());
}

#[test]
fn test_wrapped_text_is_centred() {
    let font = PixelFont::builtin();
    let layout = TextLayout::for_viewport(Vec2::new(3.0, 6.0), &MeshFieldConfig::default());
    let mesh = font.layout("ONE TWO THREE", &layout);

    let (lo, hi) = mesh.bounding_box().unwrap();
    let mid = (lo + hi) * 0.5;
    assert!(mid.length() < 1e-4, "centre was {mid}");
    // narrow viewport forces more than one line
    assert!(hi.y - lo.y > layout.font_size * layout.line_spacing);
}

#[test]
fn test_config_from_json() {
    let config = MeshFieldConfig::from_json_str(r#"{ "count": 12, "blend": 0.5, "seed": 9 }"#).unwrap();
    assert_eq!(config.count, 12);
    assert_eq!(config.blend, 0.5);
    assert_eq!(config.sphere_radius, 2.0);

    assert!(MeshFieldConfig::from_json_str(r#"{ "blend": 0.0 }"#).is_err());
}

proptest! {
    #[test]
    fn prop_interpolate_never_moves_away(
        pairs in prop::collection::vec(
            ((-5.0f32..5.0, -5.0f32..5.0, -5.0f32..5.0), (-5.0f32..5.0, -5.0f32..5.0, -5.0f32..5.0)),
            1..50,
        ),
        blend in 0.01f32..1.0,
    ) {
        let config = MeshFieldConfig::default().with_blend(blend);
        let mut current: Vec<Vec3> = pairs.iter().map(|(p, _)| Vec3::new(p.0, p.1, p.2)).collect();
        let target: Vec<Vec3> = pairs.iter().map(|(_, t)| Vec3::new(t.0, t.1, t.2)).collect();
        let base = current.clone();
        let before: Vec<f32> = current.iter().zip(&target).map(|(p, t)| p.distance(*t)).collect();

        interpolate_step(&mut current, &base, Some(target.as_slice()), 0.0, &config);

        for ((p, t), d) in current.iter().zip(&target).zip(&before) {
            prop_assert!(p.distance(*t) <= *d + 1e-5);
        }
    }
}

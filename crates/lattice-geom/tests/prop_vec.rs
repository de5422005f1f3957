use lattice_geom::{Vec2, Vec3};
use proptest::prelude::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn small_f32() -> impl Strategy<Value = f32> {
    -1000.0f32..1000.0
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (small_f32(), small_f32(), small_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_vec2() -> impl Strategy<Value = Vec2> {
    (small_f32(), small_f32()).prop_map(|(x, y)| Vec2::new(x, y))
}

#[test]
fn unit_axes_cross_to_third_axis() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 1.0, 0.0);
    let z = Vec3::new(0.0, 0.0, 1.0);
    assert_eq!(x.cross(y), z);
    assert_eq!(y.cross(z), x);
    assert_eq!(z.cross(x), y);
}

#[test]
fn from_grid_converts_each_axis() {
    assert_eq!(Vec3::from_grid(3, 0, 7), Vec3::new(3.0, 0.0, 7.0));
}

proptest! {
    // cross product is orthogonal to both inputs (within tolerance)
    #[test]
    fn cross_is_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let c = a.cross(b);
        let scale = a.length() * b.length() * c.length().max(1.0);
        prop_assert!(c.dot(a).abs() <= 1e-3 * scale.max(1.0));
        prop_assert!(c.dot(b).abs() <= 1e-3 * scale.max(1.0));
    }

    #[test]
    fn add_then_sub_returns_original(a in arb_vec3(), b in arb_vec3()) {
        let r = (a + b) - b;
        prop_assert!(approx(r.x, a.x, 1e-3));
        prop_assert!(approx(r.y, a.y, 1e-3));
        prop_assert!(approx(r.z, a.z, 1e-3));
    }

    #[test]
    fn add_assign_matches_add(a in arb_vec3(), b in arb_vec3()) {
        let mut c = a;
        c += b;
        prop_assert_eq!(c, a + b);
    }

    #[test]
    fn vec2_add_sub(a in arb_vec2(), b in arb_vec2()) {
        let r = (a + b) - b;
        prop_assert!(approx(r.x, a.x, 1e-3));
        prop_assert!(approx(r.y, a.y, 1e-3));
    }
}

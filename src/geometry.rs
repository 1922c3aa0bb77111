//! Primitive geometric operations shared by the mesh and partition stages.

use glam::{DVec2, Vec3};

/// Straight-line (chord) distance between two points on the unit sphere.
pub fn chord_distance(a: Vec3, b: Vec3) -> f32 {
    (b - a).length()
}

pub fn centroid(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (a + b + c) / 3.0
}

/// Stereographic projection from the north pole: `(x, y, z) -> (x/(1-z), y/(1-z))`.
///
/// Undefined at the pole itself; callers must keep `z` strictly below 1.
pub fn stereographic(p: Vec3) -> DVec2 {
    let inv = 1.0 / (1.0 - p.z as f64);
    DVec2::new(p.x as f64 * inv, p.y as f64 * inv)
}

/// 2D orientation determinant. Positive when `a -> b -> c` turns
/// counter-clockwise, negative when clockwise, zero when collinear.
pub fn orient2d(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

pub fn color_approx_eq(a: [f32; 4], b: [f32; 4], tolerance: f32) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_distance_of_antipodes_is_diameter() {
        let d = chord_distance(Vec3::X, -Vec3::X);
        assert!(approx_eq(d, 2.0, 1e-6));
    }

    #[test]
    fn stereographic_equator_maps_to_unit_circle() {
        // Any equatorial point (z = 0) projects onto the unit circle.
        let p = stereographic(Vec3::new(0.6, 0.8, 0.0));
        assert!((p.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn stereographic_south_pole_maps_to_origin() {
        let p = stereographic(Vec3::new(0.0, 0.0, -1.0));
        assert!(p.length() < 1e-9);
    }

    #[test]
    fn approximate_comparisons() {
        assert!(approx_eq(1.0, 1.0 + 1e-7, 1e-6));
        assert!(!approx_eq(1.0, 1.1, 1e-6));
        assert!(color_approx_eq(
            [1.0, 0.5, 0.0, 1.0],
            [1.0, 0.5 + 1e-7, 0.0, 1.0],
            1e-6
        ));
        assert!(!color_approx_eq(
            [1.0, 0.5, 0.0, 1.0],
            [0.0, 0.5, 0.0, 1.0],
            1e-6
        ));
    }

    #[test]
    fn orient2d_signs() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(1.0, 0.0);
        assert!(orient2d(a, b, DVec2::new(0.0, 1.0)) > 0.0);
        assert!(orient2d(a, b, DVec2::new(0.0, -1.0)) < 0.0);
        assert_eq!(orient2d(a, b, DVec2::new(2.0, 0.0)), 0.0);
    }
}

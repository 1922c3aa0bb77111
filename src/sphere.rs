//! Sphere mesh construction.
//!
//! Lattice points are spread over the sphere with a golden-ratio spiral,
//! projected to the plane stereographically, triangulated there, and the
//! mesh is closed by fanning the projection pole across the convex hull.
//! The pole is appended as the final vertex, so `count` lattice points
//! always produce `count + 1` vertices and `2 * (count + 1) - 4` triangles.

use crate::delaunay::triangulate;
use crate::error::{ConfigError, GenError, Result};
use crate::geometry::{orient2d, stereographic};
use crate::mesh::SphereMesh;
use glam::{DVec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GOLDEN_RATIO: f64 = 1.618033988749895;

/// Elevation offset for the spiral lattice. Larger point counts need a
/// larger offset to keep the first and last turns of the spiral from
/// bunching at the poles.
fn lattice_epsilon(count: usize) -> f64 {
    match count {
        n if n < 24 => 0.33,
        n if n < 177 => 1.33,
        n if n < 890 => 3.33,
        n if n < 11_000 => 10.0,
        n if n < 39_000 => 27.0,
        n if n < 600_000 => 75.0,
        _ => 214.0,
    }
}

fn lattice_point(i: usize, count: usize, epsilon: f64) -> Vec3 {
    let theta = std::f64::consts::TAU * i as f64 / GOLDEN_RATIO;
    let z = 1.0 - 2.0 * (i as f64 + epsilon) / (count as f64 - 1.0 + 2.0 * epsilon);
    let radius = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(
        (radius * theta.cos()) as f32,
        (radius * theta.sin()) as f32,
        z as f32,
    )
}

fn perturb(point: Vec3, scale: f32, rng: &mut StdRng) -> Vec3 {
    let offset = Vec3::new(
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
    );
    (point + offset * scale).normalize()
}

/// Build a closed triangulated sphere mesh from `count` lattice points.
///
/// `jitter` perturbs each lattice point by a seeded random offset scaled by
/// `jitter / sqrt(count)` before triangulation. A zero jitter skips the
/// perturbation entirely and is a bit-exact no-op on both lattice paths.
///
/// # Errors
/// `ConfigError::TooFewVertices` for `count < 4`; `GeometryError` when the
/// (jittered) input degenerates the triangulation. Degenerate input is
/// fatal, not retried.
pub fn build_sphere(
    count: usize,
    jitter: f32,
    use_altered_lattice: bool,
    seed: u64,
) -> Result<SphereMesh> {
    if count < 4 {
        return Err(GenError::Config(ConfigError::TooFewVertices(count)));
    }

    let epsilon = lattice_epsilon(count);
    let scale = jitter / (count as f32).sqrt();
    let mut rng = StdRng::seed_from_u64(seed);

    // Both paths place the same spiral lattice; they differ only in where
    // the jitter pass is folded in.
    let mut positions: Vec<Vec3> = Vec::with_capacity(count + 1);
    if use_altered_lattice {
        for i in 0..count {
            let mut point = lattice_point(i, count, epsilon);
            if jitter > 0.0 {
                point = perturb(point, scale, &mut rng);
            }
            positions.push(point);
        }
    } else {
        for i in 0..count {
            positions.push(lattice_point(i, count, epsilon));
        }
        if jitter > 0.0 {
            for point in &mut positions {
                *point = perturb(*point, scale, &mut rng);
            }
        }
    }

    // Project everything except the closure pole and triangulate in-plane.
    let projected: Vec<DVec2> = positions.iter().map(|&p| stereographic(p)).collect();
    let planar = triangulate(&projected)?;

    let pole = positions.len() as u32;
    positions.push(Vec3::Z);

    let mut indices = planar.triangles;
    indices.extend(close_hull(&planar.hull, &projected, pole));

    Ok(SphereMesh::new(positions, indices))
}

/// One triangle per consecutive hull pair, fanned around the pole vertex.
/// The winding of each fan triangle is fixed against the hull interior with
/// the 2D orientation determinant so every face of the closed mesh winds
/// the same way.
fn close_hull(hull: &[u32], projected: &[DVec2], pole: u32) -> Vec<[u32; 3]> {
    let interior = hull
        .iter()
        .fold(DVec2::ZERO, |acc, &v| acc + projected[v as usize])
        / hull.len() as f64;

    let mut fan = Vec::with_capacity(hull.len());
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let det = orient2d(projected[a as usize], projected[b as usize], interior);
        // The planar triangles already own the hull edge in its interior
        // direction; the fan triangle must traverse it the other way.
        if det > 0.0 {
            fan.push([pole, b, a]);
        } else {
            fan.push([pole, a, b]);
        }
    }
    fan
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    #[rstest]
    #[case(12, 13, 22)]
    #[case(24, 25, 46)]
    #[case(100, 101, 198)]
    #[case(500, 501, 998)]
    fn closed_sphere_counts(
        #[case] count: usize,
        #[case] vertices: usize,
        #[case] triangles: usize,
    ) {
        let mesh = build_sphere(count, 0.0, true, 7).unwrap();
        assert_eq!(mesh.vertices.len(), vertices);
        assert_eq!(mesh.triangles.len(), triangles);
    }

    #[test]
    fn vertices_are_unit_length() {
        let mesh = build_sphere(200, 0.4, true, 11).unwrap();
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn mesh_is_closed_and_consistently_wound() {
        let mesh = build_sphere(64, 0.0, true, 3).unwrap();
        // Closed orientable surface: every directed edge appears exactly
        // once, every undirected edge exactly twice.
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        let mut undirected: HashMap<(u32, u32), usize> = HashMap::new();
        for t in &mesh.triangles {
            let [a, b, c] = t.vertices;
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *directed.entry((u, v)).or_insert(0) += 1;
                let key = if u < v { (u, v) } else { (v, u) };
                *undirected.entry(key).or_insert(0) += 1;
            }
        }
        assert!(directed.values().all(|&c| c == 1));
        assert!(undirected.values().all(|&c| c == 2));
    }

    #[test]
    fn zero_jitter_matches_across_lattice_paths() {
        let altered = build_sphere(96, 0.0, true, 42).unwrap();
        let plain = build_sphere(96, 0.0, false, 42).unwrap();
        for (a, b) in altered.vertices.iter().zip(plain.vertices.iter()) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn same_seed_reproduces_jittered_mesh_exactly() {
        let a = build_sphere(96, 0.8, true, 42).unwrap();
        let b = build_sphere(96, 0.8, true, 42).unwrap();
        for (va, vb) in a.vertices.iter().zip(b.vertices.iter()) {
            assert_eq!(va.position, vb.position);
        }
    }

    #[test]
    fn jitter_moves_points() {
        let still = build_sphere(96, 0.0, true, 42).unwrap();
        let moved = build_sphere(96, 0.8, true, 42).unwrap();
        let any_moved = still
            .vertices
            .iter()
            .zip(moved.vertices.iter())
            .any(|(a, b)| a.position != b.position);
        assert!(any_moved);
    }

    #[test]
    fn tiny_counts_are_rejected() {
        assert!(build_sphere(3, 0.0, true, 0).is_err());
        assert!(build_sphere(4, 0.0, true, 0).is_ok());
    }

    #[test]
    fn epsilon_breakpoints() {
        assert_eq!(lattice_epsilon(4), 0.33);
        assert_eq!(lattice_epsilon(23), 0.33);
        assert_eq!(lattice_epsilon(24), 1.33);
        assert_eq!(lattice_epsilon(600_000), 214.0);
    }
}

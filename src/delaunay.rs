//! Planar Delaunay triangulation, Bowyer-Watson style.
//!
//! Points are inserted one at a time into a super-triangle enclosing the
//! whole input: every triangle whose circumcircle contains the new point is
//! removed, and the star-shaped cavity left behind is re-triangulated as a
//! fan around the point. The result is the triangle set plus the convex hull
//! boundary, which the sphere builder needs to close the mesh around the
//! projection pole.
//!
//! Insertion order follows input order, so the output is a pure function of
//! the input point list. All predicates run in f64.

use crate::error::GeometryError;
use crate::geometry::orient2d;
use glam::DVec2;
use std::collections::{HashMap, HashSet};

pub struct Triangulation {
    /// Counter-clockwise triangles, indices into the input point list.
    pub triangles: Vec<[u32; 3]>,
    /// Convex hull vertices in counter-clockwise order.
    pub hull: Vec<u32>,
}

pub fn triangulate(points: &[DVec2]) -> Result<Triangulation, GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::DegenerateInput { index: 0 });
    }

    // Working point set: input points followed by the three super-triangle
    // corners, sized from the bounding box so every circumcircle fits.
    let mut pts = points.to_vec();
    let mut lo = pts[0];
    let mut hi = pts[0];
    for p in &pts[1..] {
        lo = lo.min(*p);
        hi = hi.max(*p);
    }
    let span = (hi - lo).max_element().max(1.0);
    let mid = (lo + hi) * 0.5;
    pts.push(DVec2::new(mid.x - 20.0 * span, mid.y - 10.0 * span));
    pts.push(DVec2::new(mid.x + 20.0 * span, mid.y - 10.0 * span));
    pts.push(DVec2::new(mid.x, mid.y + 20.0 * span));
    let super_base = points.len();

    let mut triangles: Vec<[usize; 3]> =
        vec![oriented([super_base, super_base + 1, super_base + 2], &pts)
            .ok_or(GeometryError::DegenerateInput { index: 0 })?];

    for (i, p) in points.iter().enumerate() {
        // Cavity: all triangles whose circumcircle contains the new point.
        let mut bad: Vec<usize> = Vec::new();
        for (t, tri) in triangles.iter().enumerate() {
            if in_circumcircle(pts[tri[0]], pts[tri[1]], pts[tri[2]], *p) {
                bad.push(t);
            }
        }
        if bad.is_empty() {
            // Duplicate or coincident input; the point falls in no
            // circumcircle only when the triangulation is already broken.
            return Err(GeometryError::DegenerateInput { index: i });
        }

        // Cavity boundary: directed edges of removed triangles whose reverse
        // is not also removed. Shared edges cancel pairwise.
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &t in &bad {
            let tri = triangles[t];
            for k in 0..3 {
                let edge = (tri[k], tri[(k + 1) % 3]);
                if let Some(pos) = boundary.iter().position(|&(a, b)| (b, a) == edge) {
                    boundary.remove(pos);
                } else {
                    boundary.push(edge);
                }
            }
        }

        for &t in bad.iter().rev() {
            triangles.swap_remove(t);
        }
        for (a, b) in boundary {
            let tri = oriented([a, b, i], &pts)
                .ok_or(GeometryError::DegenerateInput { index: i })?;
            triangles.push(tri);
        }
    }

    // Strip everything that still touches a super-triangle corner.
    triangles.retain(|t| t.iter().all(|&v| v < super_base));
    if triangles.is_empty() {
        return Err(GeometryError::DegenerateInput { index: 0 });
    }

    let hull = extract_hull(&triangles)?;
    let triangles = triangles
        .into_iter()
        .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
        .collect();
    Ok(Triangulation { triangles, hull })
}

/// Reorder a triangle counter-clockwise; `None` when the corners are collinear.
fn oriented(t: [usize; 3], pts: &[DVec2]) -> Option<[usize; 3]> {
    let det = orient2d(pts[t[0]], pts[t[1]], pts[t[2]]);
    if det > 0.0 {
        Some(t)
    } else if det < 0.0 {
        Some([t[0], t[2], t[1]])
    } else {
        None
    }
}

/// Strict circumcircle containment for a counter-clockwise triangle `abc`.
fn in_circumcircle(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    let ax = a.x - p.x;
    let ay = a.y - p.y;
    let bx = b.x - p.x;
    let by = b.y - p.y;
    let cx = c.x - p.x;
    let cy = c.y - p.y;
    let det = (ax * ax + ay * ay) * (bx * cy - cx * by)
        - (bx * bx + by * by) * (ax * cy - cx * ay)
        + (cx * cx + cy * cy) * (ax * by - bx * ay);
    det > 0.0
}

/// Walk the directed edges that have no reverse counterpart into the single
/// counter-clockwise hull loop.
fn extract_hull(triangles: &[[usize; 3]]) -> Result<Vec<u32>, GeometryError> {
    let mut directed: HashSet<(usize, usize)> = HashSet::new();
    for t in triangles {
        for k in 0..3 {
            directed.insert((t[k], t[(k + 1) % 3]));
        }
    }
    let mut successor: HashMap<usize, usize> = HashMap::new();
    for t in triangles {
        for k in 0..3 {
            let (a, b) = (t[k], t[(k + 1) % 3]);
            if !directed.contains(&(b, a)) {
                if successor.insert(a, b).is_some() {
                    // Two outgoing boundary edges from one vertex: the
                    // boundary is not a simple loop.
                    return Err(GeometryError::DegenerateInput { index: a });
                }
            }
        }
    }
    if successor.is_empty() {
        return Err(GeometryError::DegenerateInput { index: 0 });
    }
    let start = *successor.keys().min().unwrap();
    let mut hull = vec![start as u32];
    let mut current = successor[&start];
    while current != start {
        hull.push(current as u32);
        current = *successor
            .get(&current)
            .ok_or(GeometryError::DegenerateInput { index: current })?;
        if hull.len() > successor.len() {
            return Err(GeometryError::DegenerateInput { index: current });
        }
    }
    if hull.len() != successor.len() {
        return Err(GeometryError::DegenerateInput { index: start });
    }
    Ok(hull)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_center() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(0.5, 0.4),
        ]
    }

    #[test]
    fn square_with_center_triangulates_fully() {
        let t = triangulate(&square_with_center()).unwrap();
        // n points with h on the hull give 2n - 2 - h triangles.
        assert_eq!(t.triangles.len(), 2 * 5 - 2 - 4);
        assert_eq!(t.hull.len(), 4);
    }

    #[test]
    fn all_triangles_wind_counter_clockwise() {
        let points = square_with_center();
        let t = triangulate(&points).unwrap();
        for tri in &t.triangles {
            let det = orient2d(
                points[tri[0] as usize],
                points[tri[1] as usize],
                points[tri[2] as usize],
            );
            assert!(det > 0.0);
        }
    }

    #[test]
    fn interior_edges_are_shared_exactly_twice() {
        let points: Vec<DVec2> = (0..25)
            .map(|i| {
                let f = i as f64;
                // Irregular but deterministic scatter.
                DVec2::new((f * 0.37).sin() * 3.0, (f * 0.71).cos() * 3.0 + f * 0.05)
            })
            .collect();
        let t = triangulate(&points).unwrap();

        let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in &t.triangles {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let key = if a < b { (a, b) } else { (b, a) };
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        for (_, count) in counts {
            assert!(count == 1 || count == 2);
        }
    }

    #[test]
    fn hull_is_convex_loop() {
        let points = square_with_center();
        let t = triangulate(&points).unwrap();
        let n = t.hull.len();
        for i in 0..n {
            let a = points[t.hull[i] as usize];
            let b = points[t.hull[(i + 1) % n] as usize];
            let c = points[t.hull[(i + 2) % n] as usize];
            assert!(orient2d(a, b, c) > 0.0);
        }
    }

    #[test]
    fn duplicate_points_are_rejected() {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
        ];
        assert!(triangulate(&points).is_err());
    }

    #[test]
    fn too_few_points_are_rejected() {
        assert!(triangulate(&[DVec2::ZERO, DVec2::X]).is_err());
    }
}

//! Plate boundary recovery and fault-line classification.
//!
//! Mesh adjacency is not precomputed, so boundaries are recovered by edge
//! counting: within one plate, an edge backed by two owned triangles is
//! interior and an edge backed by one is boundary. Boundary edges are then
//! matched across plates by their canonical vertex pair and grouped into
//! fault lines per plate pair.

use crate::error::{GeometryError, Result};
use crate::mesh::{canonical, SphereMesh};
use crate::plate::{Plate, PlateType};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Canonical undirected mesh edge, `a < b`. Used as the matching key across
/// plates; the owning-plate bookkeeping around it is discarded once fault
/// lines are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    pub fn new(u: u32, v: u32) -> Self {
        let (a, b) = canonical(u, v);
        Self { a, b }
    }
}

/// Relative-motion class of a fault line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Plates colliding (red).
    Convergent,
    /// Plates spreading apart (blue).
    Divergent,
    /// Plates sliding past each other (yellow).
    Transform,
}

impl FaultKind {
    pub fn color(&self) -> [f32; 3] {
        match self {
            FaultKind::Convergent => [1.0, 0.0, 0.0],
            FaultKind::Divergent => [0.0, 0.5, 1.0],
            FaultKind::Transform => [1.0, 1.0, 0.0],
        }
    }
}

/// A run of boundary edges between one plate pair, with its classification.
#[derive(Debug, Clone)]
pub struct FaultLine {
    /// Lower plate id of the pair.
    pub plate_a: usize,
    /// Higher plate id of the pair.
    pub plate_b: usize,
    pub edges: Vec<Edge>,
    pub kind: FaultKind,
}

impl FaultLine {
    /// Number of continental plates among the pair (0, 1 or 2).
    pub fn continental_count(&self, plates: &[Plate]) -> usize {
        [self.plate_a, self.plate_b]
            .iter()
            .filter(|&&p| plates[p].kind == PlateType::Continental)
            .count()
    }
}

/// Recover each plate's boundary polyline, match boundary edges across
/// plates, group them into fault lines per plate pair and classify each
/// line from the pair's rigid velocities.
pub fn extract_fault_lines(mesh: &SphereMesh, plates: &mut [Plate]) -> Result<Vec<FaultLine>> {
    let mut per_plate: Vec<Vec<Edge>> = Vec::with_capacity(plates.len());
    for plate in plates.iter() {
        per_plate.push(plate_boundary_edges(mesh, plate)?);
    }

    // Pool all plates' boundary edges and match twins by canonical pair.
    let mut owners: HashMap<Edge, Vec<usize>> = HashMap::new();
    for (plate_id, edges) in per_plate.iter().enumerate() {
        for &edge in edges {
            owners.entry(edge).or_default().push(plate_id);
        }
    }

    // Emit each matched edge once, from its lower-id plate, preserving that
    // plate's polyline order. Validation: the full-coverage guarantee means
    // every boundary edge has exactly one twin on another plate.
    let mut matched: Vec<(usize, usize, Edge)> = Vec::new();
    for (plate_id, edges) in per_plate.iter().enumerate() {
        for &edge in edges {
            let owning = &owners[&edge];
            match owning.len() {
                2 => {
                    let (p, q) = (owning[0].min(owning[1]), owning[0].max(owning[1]));
                    if p == q {
                        return Err(GeometryError::MissingTwin {
                            a: edge.a,
                            b: edge.b,
                        }
                        .into());
                    }
                    if plate_id == p {
                        matched.push((p, q, edge));
                    }
                }
                1 => {
                    return Err(GeometryError::MissingTwin {
                        a: edge.a,
                        b: edge.b,
                    }
                    .into());
                }
                n => {
                    return Err(GeometryError::OverclaimedEdge {
                        a: edge.a,
                        b: edge.b,
                        count: n,
                    }
                    .into());
                }
            }
        }
    }

    // Group contiguous runs of the same plate pair in edge sort order. The
    // grouping is keyed by the pair, not by topology: disjoint boundary
    // segments between the same two plates collapse into one fault line.
    matched.sort_by_key(|&(p, q, _)| (p, q));

    let mut fault_lines: Vec<FaultLine> = Vec::new();
    for (p, q, edge) in matched {
        match fault_lines.last_mut() {
            Some(line) if line.plate_a == p && line.plate_b == q => line.edges.push(edge),
            _ => fault_lines.push(FaultLine {
                plate_a: p,
                plate_b: q,
                edges: vec![edge],
                kind: FaultKind::Transform,
            }),
        }
    }

    for (index, line) in fault_lines.iter_mut().enumerate() {
        line.kind = classify(&plates[line.plate_a], &plates[line.plate_b]);
        plates[line.plate_a].fault_lines.push(index);
        plates[line.plate_b].fault_lines.push(index);
    }
    debug!(
        "extracted {} fault lines across {} plates",
        fault_lines.len(),
        plates.len()
    );
    Ok(fault_lines)
}

/// Boundary edges of one plate, reordered into a continuous polyline where
/// possible.
///
/// Counts every undirected edge of the plate's triangles: count 1 means no
/// second owned triangle supplies the reverse, so the edge faces another
/// plate; count 2 is interior. Higher counts cannot come out of a manifold
/// mesh.
fn plate_boundary_edges(mesh: &SphereMesh, plate: &Plate) -> Result<Vec<Edge>> {
    let mut counts: HashMap<Edge, usize> = HashMap::new();
    for &t in &plate.triangles {
        for (u, v) in mesh.triangles[t as usize].edges() {
            *counts.entry(Edge { a: u, b: v }).or_insert(0) += 1;
        }
    }

    // Collect boundary edges by re-walking triangles in claim order so the
    // result does not depend on hash iteration order.
    let mut boundary: Vec<Edge> = Vec::new();
    let mut emitted: HashSet<Edge> = HashSet::new();
    for &t in &plate.triangles {
        for (u, v) in mesh.triangles[t as usize].edges() {
            let edge = Edge { a: u, b: v };
            match counts[&edge] {
                1 => {
                    if emitted.insert(edge) {
                        boundary.push(edge);
                    }
                }
                2 => {}
                count => {
                    return Err(GeometryError::NonManifoldEdge {
                        a: edge.a,
                        b: edge.b,
                        plate: plate.id,
                        count,
                    }
                    .into());
                }
            }
        }
    }

    Ok(order_polyline(boundary))
}

/// Best-effort nearest-successor ordering: repeatedly scan the remaining
/// edges for one sharing the chain's tail vertex. When the boundary is not
/// one simple loop the unreachable remainder is appended unordered.
fn order_polyline(mut edges: Vec<Edge>) -> Vec<Edge> {
    if edges.len() < 3 {
        return edges;
    }
    let mut ordered = Vec::with_capacity(edges.len());
    let first = edges.remove(0);
    let mut tail = first.b;
    let head = first.a;
    ordered.push(first);

    while !edges.is_empty() {
        let next = edges.iter().position(|e| e.a == tail || e.b == tail);
        match next {
            Some(i) => {
                let edge = edges.remove(i);
                tail = if edge.a == tail { edge.b } else { edge.a };
                ordered.push(edge);
                if tail == head && !edges.is_empty() {
                    // Closed a loop early; continue a fresh chain with what
                    // is left.
                    let fresh = edges.remove(0);
                    tail = fresh.b;
                    ordered.push(fresh);
                }
            }
            None => {
                // Residual unordered suffix.
                ordered.append(&mut edges);
            }
        }
    }
    ordered
}

/// One classification per fault line, from a single representative pair of
/// rigid velocities. The dot product is symmetric, so the plate order in
/// the pair does not matter.
fn classify(a: &Plate, b: &Plate) -> FaultKind {
    let alignment = a.velocity().dot(b.velocity());
    if alignment > 0.1 {
        FaultKind::Convergent
    } else if alignment < -0.1 {
        FaultKind::Divergent
    } else {
        FaultKind::Transform
    }
}

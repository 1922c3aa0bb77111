//! Mesh data model shared by every pipeline stage.
//!
//! Vertices and triangles live in two arrays owned by [`SphereMesh`]; plates
//! and fault lines refer to them by index only, so the canonical geometry is
//! never duplicated. Indices are assigned at mesh creation and never reused
//! or reordered.

use crate::geometry::centroid;
use glam::Vec3;

#[derive(Debug, Clone)]
pub struct Vertex {
    /// Unit-length position on the sphere.
    pub position: Vec3,
    /// Stable global index; equals this vertex's slot in `SphereMesh::vertices`.
    pub index: u32,
    plate: Option<usize>,
}

impl Vertex {
    fn new(position: Vec3, index: u32) -> Self {
        Self {
            position,
            index,
            plate: None,
        }
    }

    /// Id of the plate that claimed this vertex first, if any.
    pub fn plate(&self) -> Option<usize> {
        self.plate
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertex indices into `SphereMesh::vertices`.
    pub vertices: [u32; 3],
    /// Average of the three corner positions (not re-projected to the sphere).
    pub centroid: Vec3,
    plate: Option<usize>,
}

impl Triangle {
    pub fn plate(&self) -> Option<usize> {
        self.plate
    }

    /// The three undirected edges in canonical `(min, max)` order.
    pub fn edges(&self) -> [(u32, u32); 3] {
        let [a, b, c] = self.vertices;
        [canonical(a, b), canonical(b, c), canonical(c, a)]
    }
}

pub fn canonical(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl SphereMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        let vertices = positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| Vertex::new(p, i as u32))
            .collect::<Vec<_>>();
        let triangles = indices
            .into_iter()
            .map(|v| Triangle {
                vertices: v,
                centroid: centroid(
                    vertices[v[0] as usize].position,
                    vertices[v[1] as usize].position,
                    vertices[v[2] as usize].position,
                ),
                plate: None,
            })
            .collect();
        Self {
            vertices,
            triangles,
        }
    }

    /// Claim a triangle for a plate. First writer wins: returns `true` and
    /// stores the id only if the triangle was unclaimed. This is the only way
    /// a triangle's plate is ever set.
    pub fn claim_triangle(&mut self, triangle: u32, plate: usize) -> bool {
        let slot = &mut self.triangles[triangle as usize].plate;
        if slot.is_none() {
            *slot = Some(plate);
            true
        } else {
            false
        }
    }

    /// Claim a vertex for a plate, first writer wins.
    pub fn claim_vertex(&mut self, vertex: u32, plate: usize) -> bool {
        let slot = &mut self.vertices[vertex as usize].plate;
        if slot.is_none() {
            *slot = Some(plate);
            true
        } else {
            false
        }
    }

    /// Direct neighbors of every vertex (vertices sharing a mesh edge),
    /// each list sorted ascending.
    pub fn vertex_neighbors(&self) -> Vec<Vec<u32>> {
        let mut neighbors = vec![Vec::new(); self.vertices.len()];
        for triangle in &self.triangles {
            let [a, b, c] = triangle.vertices;
            for (u, v) in [(a, b), (b, c), (c, a)] {
                neighbors[u as usize].push(v);
                neighbors[v as usize].push(u);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> SphereMesh {
        let positions = vec![
            Vec3::new(1.0, 1.0, 1.0).normalize(),
            Vec3::new(1.0, -1.0, -1.0).normalize(),
            Vec3::new(-1.0, 1.0, -1.0).normalize(),
            Vec3::new(-1.0, -1.0, 1.0).normalize(),
        ];
        let indices = vec![[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];
        SphereMesh::new(positions, indices)
    }

    #[test]
    fn claim_is_first_writer_wins() {
        let mut mesh = tetrahedron();
        assert!(mesh.claim_triangle(0, 1));
        assert!(!mesh.claim_triangle(0, 2));
        assert_eq!(mesh.triangles[0].plate(), Some(1));

        assert!(mesh.claim_vertex(3, 5));
        assert!(!mesh.claim_vertex(3, 6));
        assert_eq!(mesh.vertices[3].plate(), Some(5));
    }

    #[test]
    fn tetrahedron_neighbors_are_complete() {
        let mesh = tetrahedron();
        let neighbors = mesh.vertex_neighbors();
        // Every tetrahedron vertex touches the other three.
        for (i, list) in neighbors.iter().enumerate() {
            assert_eq!(list.len(), 3);
            assert!(!list.contains(&(i as u32)));
        }
    }

    #[test]
    fn canonical_edge_order() {
        assert_eq!(canonical(7, 2), (2, 7));
        assert_eq!(canonical(2, 7), (2, 7));
    }
}

//! KD-tree over 3D points used for nearest and k-nearest queries.
//!
//! Queries break distance ties by point index so that results are stable
//! across runs with the same input.

use glam::Vec3;
use std::collections::BinaryHeap;

/// f32 wrapper with a total order, usable as a heap/sort key.
#[derive(Clone, Copy, PartialEq)]
struct OrdF32(f32);

impl Eq for OrdF32 {}

impl PartialOrd for OrdF32 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

struct Node {
    point: Vec3,
    index: u32,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

pub struct SpatialIndex {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl SpatialIndex {
    /// Build the tree by recursive median split, cycling the split axis
    /// with depth.
    pub fn build(points: &[Vec3]) -> Self {
        let mut order: Vec<u32> = (0..points.len() as u32).collect();
        let mut nodes = Vec::with_capacity(points.len());
        let root = Self::build_recursive(points, &mut order, 0, &mut nodes);
        Self { nodes, root }
    }

    fn build_recursive(
        points: &[Vec3],
        order: &mut [u32],
        depth: usize,
        nodes: &mut Vec<Node>,
    ) -> Option<usize> {
        if order.is_empty() {
            return None;
        }
        let axis = depth % 3;
        order.sort_unstable_by(|&a, &b| {
            let ka = points[a as usize][axis];
            let kb = points[b as usize][axis];
            ka.total_cmp(&kb).then(a.cmp(&b))
        });
        let mid = order.len() / 2;
        let index = order[mid];
        let slot = nodes.len();
        nodes.push(Node {
            point: points[index as usize],
            index,
            axis,
            left: None,
            right: None,
        });
        let (lo, hi) = order.split_at_mut(mid);
        let left = Self::build_recursive(points, lo, depth + 1, nodes);
        let right = Self::build_recursive(points, &mut hi[1..], depth + 1, nodes);
        nodes[slot].left = left;
        nodes[slot].right = right;
        Some(slot)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the point nearest to `query`.
    pub fn nearest(&self, query: Vec3) -> Option<u32> {
        let mut best: Option<(OrdF32, u32)> = None;
        if let Some(root) = self.root {
            self.nearest_recursive(root, query, &mut best);
        }
        best.map(|(_, index)| index)
    }

    fn nearest_recursive(&self, node: usize, query: Vec3, best: &mut Option<(OrdF32, u32)>) {
        let n = &self.nodes[node];
        let key = (OrdF32(n.point.distance_squared(query)), n.index);
        if best.is_none() || key < best.unwrap() {
            *best = Some(key);
        }
        let delta = query[n.axis] - n.point[n.axis];
        let (near, far) = if delta < 0.0 {
            (n.left, n.right)
        } else {
            (n.right, n.left)
        };
        if let Some(near) = near {
            self.nearest_recursive(near, query, best);
        }
        if let Some(far) = far {
            if OrdF32(delta * delta) <= best.unwrap().0 {
                self.nearest_recursive(far, query, best);
            }
        }
    }

    /// Indices of the `k` points nearest to `query`, ordered nearest first.
    pub fn k_nearest(&self, query: Vec3, k: usize) -> Vec<u32> {
        if k == 0 {
            return Vec::new();
        }
        // Max-heap of the k best candidates seen so far; the top is the
        // current worst and is evicted when a closer point arrives.
        let mut heap: BinaryHeap<(OrdF32, u32)> = BinaryHeap::with_capacity(k + 1);
        if let Some(root) = self.root {
            self.k_nearest_recursive(root, query, k, &mut heap);
        }
        let mut out: Vec<(OrdF32, u32)> = heap.into_vec();
        out.sort_unstable();
        out.into_iter().map(|(_, index)| index).collect()
    }

    fn k_nearest_recursive(
        &self,
        node: usize,
        query: Vec3,
        k: usize,
        heap: &mut BinaryHeap<(OrdF32, u32)>,
    ) {
        let n = &self.nodes[node];
        let key = (OrdF32(n.point.distance_squared(query)), n.index);
        if heap.len() < k {
            heap.push(key);
        } else if key < *heap.peek().unwrap() {
            heap.pop();
            heap.push(key);
        }
        let delta = query[n.axis] - n.point[n.axis];
        let (near, far) = if delta < 0.0 {
            (n.left, n.right)
        } else {
            (n.right, n.left)
        };
        if let Some(near) = near {
            self.k_nearest_recursive(near, query, k, heap);
        }
        if let Some(far) = far {
            if heap.len() < k || OrdF32(delta * delta) <= heap.peek().unwrap().0 {
                self.k_nearest_recursive(far, query, k, heap);
            }
        }
    }
}

//! Plate partitioning: assigns every triangle of the mesh to exactly one
//! plate.
//!
//! Seeds are spread over the sphere with a minimum-separation rejection
//! loop, each plate grabs a randomized budget of triangles nearest its
//! center, and a round-robin sweep hands out whatever the budgets missed so
//! that coverage is always complete.

use crate::config::PlateConfig;
use crate::error::{ConfigError, GenError, Result};
use crate::geometry::chord_distance;
use crate::kdtree::SpatialIndex;
use crate::mesh::SphereMesh;
use crate::plate::{Plate, PlateType};
use glam::{Quat, Vec3};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Consecutive rejected samples after which a seed center is accepted
/// regardless of separation, so placement always terminates.
const MAX_PLACEMENT_REJECTIONS: usize = 999;

pub fn partition_plates(
    mesh: &mut SphereMesh,
    config: &PlateConfig,
    seed: u64,
) -> Result<Vec<Plate>> {
    let plate_count = config.plate_count;
    let triangle_count = mesh.triangles.len();
    if plate_count == 0 || plate_count > triangle_count {
        return Err(GenError::Config(ConfigError::BadPlateCount {
            got: plate_count,
            max: triangle_count,
        }));
    }
    if !(0.0..=1.0).contains(&config.continental_ratio) {
        return Err(GenError::Config(ConfigError::RatioOutOfRange(
            config.continental_ratio,
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let separation = config.plate_size.min_separation();
    let centers = place_seed_centers(plate_count, separation, &mut rng);
    let mut plates: Vec<Plate> = centers
        .into_iter()
        .enumerate()
        .map(|(id, center)| Plate::new(id, center))
        .collect();

    claim_nearest_budgets(mesh, &mut plates, &mut rng);
    let leftover = complete_coverage(mesh, &mut plates);
    debug!(
        "partitioned {} triangles into {} plates ({} via coverage sweep)",
        triangle_count, plate_count, leftover
    );

    materialize_vertices(mesh, &mut plates);
    sample_kinematics(&mut plates, config.continental_ratio, &mut rng);
    Ok(plates)
}

/// Uniform random point on the unit sphere, drawn by rejection from the
/// unit ball.
fn random_unit_vector(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-4 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Sample seed centers, rejecting any candidate whose chord distance to an
/// accepted center is below `separation`. The retry budget is an escape
/// hatch, not a packing guarantee: exceeding it force-accepts the candidate.
fn place_seed_centers(count: usize, separation: f32, rng: &mut StdRng) -> Vec<Vec3> {
    let mut centers: Vec<Vec3> = Vec::with_capacity(count);
    while centers.len() < count {
        let mut rejections = 0;
        loop {
            let candidate = random_unit_vector(rng);
            let clear = centers
                .iter()
                .all(|&c| chord_distance(c, candidate) > separation);
            if clear {
                centers.push(candidate);
                break;
            }
            rejections += 1;
            if rejections >= MAX_PLACEMENT_REJECTIONS {
                warn!(
                    "seed placement exhausted {} retries at separation {}, force-accepting plate {}",
                    MAX_PLACEMENT_REJECTIONS,
                    separation,
                    centers.len()
                );
                centers.push(candidate);
                break;
            }
        }
    }
    centers
}

/// First assignment pass. Each plate queries the centroid index for a
/// k-nearest budget of `total / count` scaled by a random per-plate weight,
/// and claims whatever is still unclaimed. Plates query in id order; with a
/// fixed seed the claim pattern is stable, and earlier plates win contested
/// triangles.
fn claim_nearest_budgets(mesh: &mut SphereMesh, plates: &mut [Plate], rng: &mut StdRng) {
    let centroids: Vec<Vec3> = mesh.triangles.iter().map(|t| t.centroid).collect();
    let index = SpatialIndex::build(&centroids);

    let weights: Vec<f32> = plates
        .iter()
        .map(|_| rng.random_range(0.5..1.5))
        .collect();
    let total_weight: f32 = weights.iter().sum();

    for plate in plates.iter_mut() {
        let share = weights[plate.id] / total_weight;
        let budget = (mesh.triangles.len() as f32 * share).round() as usize;
        for triangle in index.k_nearest(plate.center, budget.max(1)) {
            if mesh.claim_triangle(triangle, plate.id) {
                plate.triangles.push(triangle);
            }
        }
    }
}

/// Coverage completion. Every triangle the budgets missed is inserted into
/// one distance-ordered list per plate; the plates then pop their nearest
/// still-unclaimed triangle in round-robin turns until nothing is left.
/// Returns the number of triangles assigned by this sweep.
fn complete_coverage(mesh: &mut SphereMesh, plates: &mut [Plate]) -> usize {
    let unclaimed: Vec<u32> = (0..mesh.triangles.len() as u32)
        .filter(|&t| mesh.triangles[t as usize].plate().is_none())
        .collect();
    if unclaimed.is_empty() {
        return 0;
    }

    let mut queues: Vec<Vec<u32>> = plates
        .iter()
        .map(|plate| {
            let mut list = unclaimed.clone();
            list.sort_unstable_by(|&a, &b| {
                let da = chord_distance(plate.center, mesh.triangles[a as usize].centroid);
                let db = chord_distance(plate.center, mesh.triangles[b as usize].centroid);
                da.total_cmp(&db).then(a.cmp(&b))
            });
            list
        })
        .collect();

    let mut cursors = vec![0usize; plates.len()];
    let mut remaining = unclaimed.len();
    while remaining > 0 {
        for plate in plates.iter_mut() {
            let cursor = &mut cursors[plate.id];
            let queue = &mut queues[plate.id];
            while *cursor < queue.len()
                && mesh.triangles[queue[*cursor] as usize].plate().is_some()
            {
                *cursor += 1;
            }
            if *cursor < queue.len() {
                let triangle = queue[*cursor];
                mesh.claim_triangle(triangle, plate.id);
                plate.triangles.push(triangle);
                *cursor += 1;
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }
    }
    unclaimed.len()
}

/// Deduplicate each plate's vertex memberships from its triangles and set
/// vertex ownership, first claim wins.
fn materialize_vertices(mesh: &mut SphereMesh, plates: &mut [Plate]) {
    for plate in plates.iter_mut() {
        let mut seen = vec![false; mesh.vertices.len()];
        for t in 0..plate.triangles.len() {
            let triangle = plate.triangles[t];
            for vertex in mesh.triangles[triangle as usize].vertices {
                if !seen[vertex as usize] {
                    seen[vertex as usize] = true;
                    plate.vertices.push(vertex);
                    mesh.claim_vertex(vertex, plate.id);
                }
            }
        }
    }
}

/// Rigid-plate kinematics and crust type, sampled independently per plate.
fn sample_kinematics(plates: &mut [Plate], continental_ratio: f64, rng: &mut StdRng) {
    for plate in plates.iter_mut() {
        // Tangent reference: fall back to X when the center runs too close
        // to the global up axis for a stable cross product.
        let up = if plate.center.dot(Vec3::Y).abs() > 0.99 {
            Vec3::X
        } else {
            Vec3::Y
        };
        let tangent = plate.center.cross(up).normalize();
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        plate.direction = Quat::from_axis_angle(plate.center, angle) * tangent;
        plate.speed = rng.random_range(0.01..2.0);
        plate.kind = if rng.random_bool(continental_ratio) {
            PlateType::Continental
        } else {
            PlateType::Oceanic
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlateConfig;
    use crate::plate::PlateSize;
    use crate::sphere::build_sphere;

    fn config(plate_count: usize) -> PlateConfig {
        PlateConfig {
            plate_count,
            plate_size: PlateSize::Medium,
            continental_ratio: 0.5,
        }
    }

    #[test]
    fn every_triangle_is_claimed_exactly_once() {
        let mut mesh = build_sphere(200, 0.0, true, 5).unwrap();
        let plates = partition_plates(&mut mesh, &config(4), 5).unwrap();

        let mut owners = vec![0usize; mesh.triangles.len()];
        for plate in &plates {
            for &t in &plate.triangles {
                owners[t as usize] += 1;
            }
        }
        assert!(owners.iter().all(|&c| c == 1));
        for (i, t) in mesh.triangles.iter().enumerate() {
            let owner = t.plate().expect("unclaimed triangle");
            assert!(plates[owner].triangles.contains(&(i as u32)));
        }
    }

    #[test]
    fn every_vertex_gets_an_owner() {
        let mut mesh = build_sphere(150, 0.0, true, 9).unwrap();
        let plates = partition_plates(&mut mesh, &config(3), 9).unwrap();
        for v in &mesh.vertices {
            assert!(v.plate().is_some());
        }
        // A vertex may sit in several plates' membership lists, but its
        // owner is always one of them.
        for plate in &plates {
            for &v in &plate.vertices {
                assert!(mesh.vertices[v as usize].plate().is_some());
            }
        }
    }

    #[test]
    fn same_seed_same_partition() {
        let run = |seed| {
            let mut mesh = build_sphere(150, 0.0, true, seed).unwrap();
            let plates = partition_plates(&mut mesh, &config(5), seed).unwrap();
            plates
                .iter()
                .map(|p| (p.triangles.clone(), p.center, p.direction, p.speed))
                .collect::<Vec<_>>()
        };
        let a = run(77);
        let b = run(77);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!(pa.0, pb.0);
            assert_eq!(pa.1, pb.1);
            assert_eq!(pa.2, pb.2);
            assert_eq!(pa.3, pb.3);
        }
    }

    #[test]
    fn kinematics_are_unit_tangents() {
        let mut mesh = build_sphere(150, 0.0, true, 13).unwrap();
        let plates = partition_plates(&mut mesh, &config(5), 13).unwrap();
        for plate in &plates {
            assert!((plate.direction.length() - 1.0).abs() < 1e-4);
            // Tangent: orthogonal to the center axis.
            assert!(plate.direction.dot(plate.center).abs() < 1e-3);
            assert!(plate.speed >= 0.01 && plate.speed < 2.0);
        }
    }

    #[test]
    fn ratio_one_makes_everything_continental() {
        let mut mesh = build_sphere(100, 0.0, true, 21).unwrap();
        let all_land = PlateConfig {
            continental_ratio: 1.0,
            ..config(3)
        };
        let plates = partition_plates(&mut mesh, &all_land, 21).unwrap();
        assert!(plates.iter().all(|p| p.kind == PlateType::Continental));
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        let mut mesh = build_sphere(20, 0.0, true, 1).unwrap();
        assert!(partition_plates(&mut mesh, &config(0), 1).is_err());
        assert!(partition_plates(&mut mesh, &config(10_000), 1).is_err());
        let bad_ratio = PlateConfig {
            continental_ratio: 1.5,
            ..config(2)
        };
        assert!(partition_plates(&mut mesh, &bad_ratio, 1).is_err());
    }

    #[test]
    fn forced_acceptance_still_places_all_seeds() {
        // Huge separation with many plates cannot be satisfied; the retry
        // escape hatch must still produce the requested count.
        let mut rng = StdRng::seed_from_u64(3);
        let centers = place_seed_centers(30, PlateSize::Huge.min_separation(), &mut rng);
        assert_eq!(centers.len(), 30);
    }
}

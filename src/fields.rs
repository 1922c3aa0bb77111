//! Scalar field generation: height, moisture and temperature per vertex.
//!
//! Every field is a pure function of the mesh, the plate assignment, the
//! fault classification and the seed; re-running with identical inputs
//! reproduces the values bit for bit.

use crate::boundaries::{FaultKind, FaultLine};
use crate::config::{FieldConfig, NoiseConfig};
use crate::constants::*;
use crate::mesh::SphereMesh;
use crate::plate::{Plate, PlateType};
use crate::tools::splitmix64;
use log::debug;

/// Generated fields, each indexed by global vertex index.
#[derive(Debug, Clone)]
pub struct Fields {
    /// Surface height in `[MIN_HEIGHT, MAX_HEIGHT]`.
    pub height: Vec<f32>,
    /// Height normalized by `MAX_HEIGHT`, in `[0, 1]`.
    pub space: Vec<f32>,
    /// Moisture in `[0, 1]` on continental crust, `MOISTURE_NO_DATA` elsewhere.
    pub moisture: Vec<f32>,
    /// Temperature in degrees Celsius.
    pub temperature: Vec<f32>,
}

pub fn generate_fields(
    mesh: &SphereMesh,
    plates: &[Plate],
    fault_lines: &[FaultLine],
    config: &FieldConfig,
    seed: u64,
) -> Fields {
    let neighbors = mesh.vertex_neighbors();
    let height_seed = splitmix64(seed);
    let moisture_seed = splitmix64(height_seed);

    let (height, space) = generate_height(
        mesh,
        plates,
        fault_lines,
        &neighbors,
        config,
        height_seed as u32,
    );
    let moisture = generate_moisture(mesh, plates, &neighbors, config, moisture_seed as u32);
    let temperature = generate_temperature(mesh, &space);
    debug!("generated fields for {} vertices", mesh.vertices.len());

    Fields {
        height,
        space,
        moisture,
        temperature,
    }
}

/// Fault-line elevation override, keyed on the classification and how many
/// of the two plates are continental. Seven tiers from colliding continents
/// down to oceanic rift floor.
fn fault_elevation(kind: FaultKind, continental: usize) -> f32 {
    match (kind, continental) {
        (FaultKind::Convergent, 2) => MAX_HEIGHT,
        (FaultKind::Convergent, 1) => 8.0,
        (FaultKind::Convergent, _) => 6.0,
        (FaultKind::Transform, 2) => 5.0,
        (FaultKind::Transform, _) => 3.5,
        (FaultKind::Divergent, 2) | (FaultKind::Divergent, 1) => 2.0,
        (FaultKind::Divergent, _) => MIN_HEIGHT,
    }
}

fn generate_height(
    mesh: &SphereMesh,
    plates: &[Plate],
    fault_lines: &[FaultLine],
    neighbors: &[Vec<u32>],
    config: &FieldConfig,
    noise_seed: u32,
) -> (Vec<f32>, Vec<f32>) {
    // Noise contributes at most a third of the elevation ceiling on top of
    // the crust-type base.
    let noise = NoiseConfig::new(noise_seed, config.height_noise_frequency, MAX_HEIGHT / 3.0);

    let mut height: Vec<f32> = mesh
        .vertices
        .iter()
        .map(|v| {
            let base = match plates[v.plate().expect("unpartitioned vertex")].kind {
                PlateType::Continental => CONTINENTAL_BASE * config.continental_multiplier,
                PlateType::Oceanic => OCEANIC_BASE * config.oceanic_multiplier,
            };
            (base + noise.sample(v.position)).clamp(MIN_HEIGHT, MAX_HEIGHT)
        })
        .collect();

    // Fault vertices take their tier elevation outright; blending then
    // diffuses the ridges and trenches into the surrounding crust.
    for line in fault_lines {
        let tier = fault_elevation(line.kind, line.continental_count(plates));
        for edge in &line.edges {
            height[edge.a as usize] = tier;
            height[edge.b as usize] = tier;
        }
    }

    let everywhere = vec![true; height.len()];
    blend(&mut height, neighbors, &everywhere, config.height_blend_depth);

    let space: Vec<f32> = height.iter().map(|h| h / MAX_HEIGHT).collect();
    (height, space)
}

fn generate_moisture(
    mesh: &SphereMesh,
    plates: &[Plate],
    neighbors: &[Vec<u32>],
    config: &FieldConfig,
    noise_seed: u32,
) -> Vec<f32> {
    let noise = NoiseConfig::new(noise_seed, config.moisture_noise_frequency, 1.0);
    let continental: Vec<bool> = mesh
        .vertices
        .iter()
        .map(|v| {
            plates[v.plate().expect("unpartitioned vertex")].kind == PlateType::Continental
        })
        .collect();

    let mut moisture: Vec<f32> = mesh
        .vertices
        .iter()
        .zip(continental.iter())
        .map(|(v, &land)| {
            if land {
                0.5 + 0.5 * noise.sample(v.position)
            } else {
                MOISTURE_NO_DATA
            }
        })
        .collect();

    // Oceanic vertices hold a sentinel, so the blend is restricted to
    // continental neighbors on both sides of the average.
    blend(
        &mut moisture,
        neighbors,
        &continental,
        config.moisture_blend_depth,
    );
    moisture
}

fn generate_temperature(mesh: &SphereMesh, space: &[f32]) -> Vec<f32> {
    mesh.vertices
        .iter()
        .map(|v| vertex_temperature(v.position.y.abs(), space[v.index as usize]))
        .collect()
}

/// Latitude gradient with an altitude adjustment: above the highland
/// threshold elevation cools the vertex, below it the lowlands pick up a
/// mild bonus.
fn vertex_temperature(latitude: f32, space: f32) -> f32 {
    let base = EQUATOR_TEMP + (POLE_TEMP - EQUATOR_TEMP) * latitude;
    if space > HIGHLAND_THRESHOLD {
        base - (space - HIGHLAND_THRESHOLD) * HIGHLAND_LAPSE
    } else {
        base + (HIGHLAND_THRESHOLD - space) * LOWLAND_BONUS
    }
}

/// Bounded-depth neighbor diffusion. Each level reads the previous level's
/// values from a snapshot and writes into the live buffer, so the result
/// does not depend on vertex visit order; masked-out vertices neither
/// change nor contribute.
fn blend(values: &mut [f32], neighbors: &[Vec<u32>], mask: &[bool], depth: usize) {
    for _ in 0..depth {
        let read = values.to_vec();
        for v in 0..values.len() {
            if !mask[v] {
                continue;
            }
            let mut sum = read[v];
            let mut count = 0usize;
            for &n in &neighbors[v] {
                if mask[n as usize] {
                    sum += read[n as usize];
                    count += 1;
                }
            }
            values[v] = sum / (count + 1) as f32;
        }
    }
}

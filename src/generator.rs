//! End-to-end pipeline: mesh, plates, fault lines, fields.
//!
//! Stages run strictly in order and each consumes its predecessor's
//! complete output. Every stage draws from its own seed stream expanded
//! from the configured seed, so a full run is reproducible bit for bit.

use crate::boundaries::{extract_fault_lines, FaultLine};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::fields::{generate_fields, Fields};
use crate::mesh::SphereMesh;
use crate::partition::partition_plates;
use crate::plate::Plate;
use crate::sphere::build_sphere;
use crate::tools::splitmix64;
use log::debug;

/// Complete output of one generator run.
pub struct PlanetData {
    pub mesh: SphereMesh,
    pub plates: Vec<Plate>,
    pub fault_lines: Vec<FaultLine>,
    pub fields: Fields,
}

pub fn generate(config: &GeneratorConfig) -> Result<PlanetData> {
    let sphere_seed = splitmix64(config.seed);
    let plate_seed = splitmix64(sphere_seed);
    let field_seed = splitmix64(plate_seed);

    let mut mesh = build_sphere(
        config.sphere.vertex_count,
        config.sphere.jitter,
        config.sphere.use_altered_lattice,
        sphere_seed,
    )?;
    debug!(
        "built sphere: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangles.len()
    );

    let mut plates = partition_plates(&mut mesh, &config.plates, plate_seed)?;
    let fault_lines = extract_fault_lines(&mesh, &mut plates)?;
    let fields = generate_fields(&mesh, &plates, &fault_lines, &config.fields, field_seed);

    Ok(PlanetData {
        mesh,
        plates,
        fault_lines,
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_run_succeeds_with_defaults() {
        let mut config = GeneratorConfig::default();
        config.sphere.vertex_count = 300;
        config.seed = 12345;
        let planet = generate(&config).unwrap();
        assert_eq!(planet.mesh.vertices.len(), 301);
        assert_eq!(planet.plates.len(), config.plates.plate_count);
        assert!(!planet.fault_lines.is_empty());
        assert_eq!(planet.fields.height.len(), planet.mesh.vertices.len());
    }

    #[test]
    fn stage_seeds_differ() {
        // Expanded streams must not collide, or stages would correlate.
        let seed = 0;
        let a = splitmix64(seed);
        let b = splitmix64(a);
        let c = splitmix64(b);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }
}

use crate::plate::PlateSize;
use glam::Vec3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Seeded coherent-noise sampler over unit-sphere directions.
#[derive(Debug, Clone)]
pub struct NoiseConfig {
    perlin: Perlin,
    frequency: f32,
    amplitude: f32,
}

impl NoiseConfig {
    pub fn new(seed: u32, frequency: f32, amplitude: f32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            frequency,
            amplitude,
        }
    }

    pub fn sample(&self, dir: Vec3) -> f32 {
        let x = dir.x * self.frequency;
        let y = dir.y * self.frequency;
        let z = dir.z * self.frequency;
        self.perlin.get([x as f64, y as f64, z as f64]) as f32 * self.amplitude
    }
}

/// Full generator configuration. One flat option set covering every stage;
/// each stage reads only its own section plus the seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub sphere: SphereConfig,
    pub plates: PlateConfig,
    pub fields: FieldConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SphereConfig {
    pub vertex_count: usize,
    pub jitter: f32,
    pub use_altered_lattice: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateConfig {
    pub plate_count: usize,
    /// Size bucket, mapped to a fixed seed-center separation.
    pub plate_size: PlateSize,
    /// Probability that a plate is continental rather than oceanic.
    pub continental_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub height_blend_depth: usize,
    pub moisture_blend_depth: usize,
    pub continental_multiplier: f32,
    pub oceanic_multiplier: f32,
    pub height_noise_frequency: f32,
    pub moisture_noise_frequency: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            sphere: SphereConfig {
                vertex_count: 2000,
                jitter: 0.0,
                use_altered_lattice: true,
            },
            plates: PlateConfig {
                plate_count: 7,
                plate_size: PlateSize::Medium,
                continental_ratio: 0.5,
            },
            fields: FieldConfig {
                height_blend_depth: 4,
                moisture_blend_depth: 4,
                continental_multiplier: 1.0,
                oceanic_multiplier: 1.0,
                height_noise_frequency: 3.0,
                moisture_noise_frequency: 2.0,
            },
        }
    }
}

impl GeneratorConfig {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_deterministic_per_seed() {
        let a = NoiseConfig::new(9, 3.0, 1.0);
        let b = NoiseConfig::new(9, 3.0, 1.0);
        let dir = Vec3::new(0.3, -0.5, 0.8).normalize();
        assert_eq!(a.sample(dir), b.sample(dir));
        let c = NoiseConfig::new(10, 3.0, 1.0);
        assert_ne!(a.sample(dir), c.sample(dir));
    }

    #[test]
    fn amplitude_bounds_samples() {
        let noise = NoiseConfig::new(4, 2.5, 0.5);
        for i in 0..50 {
            let f = i as f32;
            let dir = Vec3::new(f.sin(), (f * 0.7).cos(), (f * 1.3).sin()).normalize();
            assert!(noise.sample(dir).abs() <= 0.5);
        }
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = GeneratorConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: GeneratorConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.seed, config.seed);
        assert_eq!(back.sphere.vertex_count, config.sphere.vertex_count);
        assert_eq!(back.plates.plate_count, config.plates.plate_count);
        assert_eq!(
            back.fields.height_blend_depth,
            config.fields.height_blend_depth
        );
    }
}

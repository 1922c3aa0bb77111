use crate::constants::DEBUG_COLORS;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateType {
    Continental,
    Oceanic,
}

/// Plate footprint presets, mapped to the minimum chord distance enforced
/// between plate seed centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateSize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl PlateSize {
    // 0.2: tight packing, many small plates touch
    // 0.7: good balance
    // 1.2: very spread out, placement may need the retry escape hatch
    pub fn min_separation(self) -> f32 {
        match self {
            PlateSize::Tiny => 0.2,
            PlateSize::Small => 0.45,
            PlateSize::Medium => 0.7,
            PlateSize::Large => 0.95,
            PlateSize::Huge => 1.2,
        }
    }
}

/// A rigid tectonic plate: one constant motion direction and speed for the
/// whole surface, fixed at creation.
#[derive(Debug, Clone)]
pub struct Plate {
    pub id: usize,
    /// Seed center on the unit sphere.
    pub center: Vec3,
    /// Unit tangent motion direction at the center.
    pub direction: Vec3,
    pub speed: f32,
    pub kind: PlateType,
    /// Owned vertices by global index, deduplicated, in claim order.
    pub vertices: Vec<u32>,
    /// Owned triangles by global index, in claim order.
    pub triangles: Vec<u32>,
    /// Indices into the fault-line list produced by boundary extraction.
    pub fault_lines: Vec<usize>,
    pub debug_color: [f32; 4],
}

impl Plate {
    pub fn new(id: usize, center: Vec3) -> Self {
        Self {
            id,
            center,
            direction: Vec3::ZERO,
            speed: 0.0,
            kind: PlateType::Oceanic,
            vertices: Vec::new(),
            triangles: Vec::new(),
            fault_lines: Vec::new(),
            debug_color: DEBUG_COLORS[id % DEBUG_COLORS.len()],
        }
    }

    /// Rigid velocity used for fault classification.
    pub fn velocity(&self) -> Vec3 {
        (self.direction - self.center).normalize_or_zero() * self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separation_presets_cover_the_documented_range() {
        let presets = [
            PlateSize::Tiny,
            PlateSize::Small,
            PlateSize::Medium,
            PlateSize::Large,
            PlateSize::Huge,
        ];
        let mut previous = 0.0;
        for preset in presets {
            let s = preset.min_separation();
            assert!(s > previous);
            previous = s;
        }
        assert_eq!(PlateSize::Tiny.min_separation(), 0.2);
        assert_eq!(PlateSize::Huge.min_separation(), 1.2);
    }

    #[test]
    fn velocity_scales_with_speed() {
        let mut plate = Plate::new(0, Vec3::X);
        plate.direction = Vec3::Y;
        plate.speed = 2.0;
        assert!((plate.velocity().length() - 2.0).abs() < 1e-6);
    }
}

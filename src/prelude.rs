pub use crate::boundaries::{extract_fault_lines, Edge, FaultKind, FaultLine};
pub use crate::config::{FieldConfig, GeneratorConfig, NoiseConfig, PlateConfig, SphereConfig};
pub use crate::error::{ConfigError, GenError, GeometryError, Result};
pub use crate::fields::{generate_fields, Fields};
pub use crate::generator::{generate, PlanetData};
pub use crate::kdtree::SpatialIndex;
pub use crate::mesh::{SphereMesh, Triangle, Vertex};
pub use crate::partition::partition_plates;
pub use crate::plate::{Plate, PlateSize, PlateType};
pub use crate::sphere::build_sphere;

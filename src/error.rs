use thiserror::Error;

/// Invalid parameters, rejected before any geometry work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sphere needs at least 4 lattice points, got {0}")]
    TooFewVertices(usize),
    #[error("plate count must be between 1 and {max} (triangle count), got {got}")]
    BadPlateCount { got: usize, max: usize },
    #[error("continental ratio must lie in [0, 1], got {0}")]
    RatioOutOfRange(f64),
}

/// Fatal geometric inconsistencies. These indicate a broken mesh or a broken
/// partition and are reported with the offending indices, never patched over.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("triangulation input is degenerate near point {index}")]
    DegenerateInput { index: usize },
    #[error("edge ({a}, {b}) occurs {count} times within plate {plate}")]
    NonManifoldEdge { a: u32, b: u32, plate: usize, count: usize },
    #[error("boundary edge ({a}, {b}) has no twin on another plate")]
    MissingTwin { a: u32, b: u32 },
    #[error("boundary edge ({a}, {b}) is claimed by {count} plates")]
    OverclaimedEdge { a: u32, b: u32, count: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

pub type Result<T> = std::result::Result<T, GenError>;

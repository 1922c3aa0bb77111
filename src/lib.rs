pub mod boundaries;
pub mod config;
pub mod constants;
pub mod delaunay;
pub mod error;
pub mod fields;
pub mod generator;
pub mod geometry;
pub mod kdtree;
pub mod mesh;
pub mod partition;
pub mod plate;
pub mod prelude;
pub mod sphere;
pub mod tools;

pub use generator::{generate, PlanetData};

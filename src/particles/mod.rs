//! Cosmetic particle cloud around the pages.

pub mod field;
pub mod poisson;

pub use field::ParticleField;
pub use poisson::{PointCloud, PoissonDiskSampler};

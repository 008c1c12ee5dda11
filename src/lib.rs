// #![deny(missing_docs)]

extern crate image;

pub mod ternary;

pub mod coordinate;
pub use coordinate::Coordinate;

pub mod error;
pub use error::CarveError;

pub mod mesh;
pub use mesh::{Mesh, PixelRef, BORDER};

pub mod energy;
pub use energy::{AverageGradient, EnergyFunction};

pub mod cost;
pub use cost::{BackwardEnergy, CostProcessor, ForwardEnergy};

pub mod seam;
pub use seam::{Orientation, Seam};

pub mod adjuster;
pub use adjuster::SeamAdjuster;

pub mod mask;
pub use mask::Mask;

pub mod carver;
pub use carver::{SeamCarver, MASK_ENERGY};

//! Geometry support for the KEEL stabilizer: angle normalization,
//! rotated-rectangle fit scaling, and 2x2 transform matrices.
//!
//! Kept deliberately small so the engine crate carries no direct
//! trigonometry beyond its own pipeline math.

pub mod angle;
pub mod fit;
pub mod transform2;

pub use angle::{compass_degrees, normalize_angle};
pub use fit::{fit_scale, Extent, FitError, FitMode};
pub use transform2::{compose, rotation_matrix, scale_matrix};

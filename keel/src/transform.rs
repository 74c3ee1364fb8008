//! Output transform construction.

use keel_math::{compose, fit_scale, normalize_angle, Extent, FitMode};
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::error::StabilizerError;

/// The transform applied to the video surface, the engine's sole output.
///
/// Recomputed every tick and never mutated after construction. The
/// rotation is normalized to (-π, π]; both scales are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Rotation in radians, normalized to (-π, π].
    pub rotation: f64,
}

impl AffineTransform {
    /// Materialize as a 2x2 matrix (scale applied before rotation).
    pub fn matrix(&self) -> Matrix2<f64> {
        compose(self.rotation, self.scale_x, self.scale_y)
    }
}

/// View and video dimensions the transform is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    /// View rectangle, display points.
    pub view: Extent,
    /// Unscaled video rectangle, pixels.
    pub video: Extent,
}

impl SurfaceGeometry {
    /// Create a geometry pair.
    pub fn new(view: Extent, video: Extent) -> Self {
        Self { view, video }
    }
}

/// Builds output transforms for a fixed surface geometry.
///
/// Dimension validation happens once here, so the per-tick `build` path is
/// infallible: a degenerate geometry is rejected up front rather than
/// surfacing later as an infinite or NaN scale.
#[derive(Debug, Clone)]
pub struct TransformBuilder {
    geometry: SurfaceGeometry,
}

impl TransformBuilder {
    /// Validate the geometry and create a builder.
    pub fn new(geometry: SurfaceGeometry) -> Result<Self, StabilizerError> {
        geometry.view.validated()?;
        geometry.video.validated()?;
        Ok(Self { geometry })
    }

    /// Build the transform for a displayed angle.
    ///
    /// The scale is the cover fit: the rotated video keeps the whole view
    /// covered at any rotation.
    pub fn build(&self, rotation: f64) -> AffineTransform {
        let rotation = normalize_angle(rotation);
        let scale = fit_scale(FitMode::Cover, self.geometry.view, self.geometry.video, rotation)
            .expect("geometry validated at construction");
        AffineTransform {
            scale_x: scale,
            scale_y: scale,
            rotation,
        }
    }

    /// Baseline transform with no rotation, for initial layout before any
    /// sensor data arrives.
    pub fn zero_rotation(&self) -> AffineTransform {
        self.build(0.0)
    }

    /// The geometry this builder was constructed with.
    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }
}

//! Rotated-rectangle fit scaling.
//!
//! Computes the uniform scale factor relating a video rectangle to the view
//! rectangle it is rendered into, accounting for an arbitrary rotation of
//! the video. `Cover` keeps the view fully covered at any rotation; that is
//! the mode the stabilizer uses every tick.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for degenerate surface dimensions.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid dimensions: {width}x{height} (must be strictly positive and finite)")]
pub struct FitError {
    /// Offending width.
    pub width: f64,
    /// Offending height.
    pub height: f64,
}

/// A width/height pair in display points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Extent {
    /// Create an extent without validation.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Validate that both dimensions are strictly positive and finite.
    ///
    /// Degenerate extents would otherwise surface as infinite or NaN scale
    /// factors downstream, so this fails fast instead.
    pub fn validated(self) -> Result<Self, FitError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(self)
        } else {
            Err(FitError {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl From<(f64, f64)> for Extent {
    fn from(dims: (f64, f64)) -> Self {
        Self::new(dims.0, dims.1)
    }
}

/// How the rotated video rectangle is fit against the view rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitMode {
    /// Smallest uniform scale at which the rotated video still covers the
    /// whole view. Edge-to-edge rendering; parts of the video may be
    /// cropped.
    Cover,
    /// Largest uniform scale at which the rotated video fits entirely
    /// inside the view. Letterboxed rendering.
    Contain,
}

/// Axis-aligned bounding box of the view rectangle expressed in the
/// video's rotated frame.
fn rotated_bounds(view: Extent, rotation_rad: f64) -> (f64, f64) {
    let c = rotation_rad.cos().abs();
    let s = rotation_rad.sin().abs();
    let width = view.width * c + view.height * s;
    let height = view.width * s + view.height * c;
    (width, height)
}

/// Compute the uniform scale factor for a rotated video over a view.
///
/// # Arguments
/// * `mode` - Cover or Contain (see [`FitMode`])
/// * `view` - View rectangle dimensions
/// * `video` - Unscaled video rectangle dimensions
/// * `rotation_rad` - Rotation applied to the video, radians
///
/// # Returns
/// * `Ok(scale)` - strictly positive scale factor
/// * `Err(FitError)` - if either extent is degenerate
pub fn fit_scale(
    mode: FitMode,
    view: Extent,
    video: Extent,
    rotation_rad: f64,
) -> Result<f64, FitError> {
    let view = view.validated()?;
    let video = video.validated()?;

    let (needed_width, needed_height) = rotated_bounds(view, rotation_rad);
    let scale = match mode {
        FitMode::Cover => (needed_width / video.width).max(needed_height / video.height),
        FitMode::Contain => (needed_width / video.width).min(needed_height / video.height),
    };
    Ok(scale)
}

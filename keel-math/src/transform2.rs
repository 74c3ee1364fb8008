//! 2x2 transform matrices using nalgebra.

use nalgebra::{Matrix2, Vector2};

/// Create a 2x2 rotation matrix
///
/// # Arguments
/// * `angle_rad` - Rotation angle in radians (counter-clockwise)
pub fn rotation_matrix(angle_rad: f64) -> Matrix2<f64> {
    let c = angle_rad.cos();
    let s = angle_rad.sin();
    Matrix2::new(c, -s, s, c)
}

/// Create a 2x2 scaling matrix
///
/// # Arguments
/// * `sx` - Scale factor for x
/// * `sy` - Scale factor for y
pub fn scale_matrix(sx: f64, sy: f64) -> Matrix2<f64> {
    Matrix2::new(sx, 0.0, 0.0, sy)
}

/// Compose rotation and scale into a single matrix (scale applied first).
pub fn compose(angle_rad: f64, sx: f64, sy: f64) -> Matrix2<f64> {
    rotation_matrix(angle_rad) * scale_matrix(sx, sy)
}

/// Apply a 2x2 matrix to a point.
pub fn apply(matrix: &Matrix2<f64>, x: f64, y: f64) -> (f64, f64) {
    let out = matrix * Vector2::new(x, y);
    (out.x, out.y)
}

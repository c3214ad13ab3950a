//! Pinhole camera model in depth-frame pixel space.
//!
//! Camera space follows the depth sensor: `x` right, `y` down, `z` along the
//! viewing direction (the depth value). The placement resolver converts to the
//! right-handed, camera-forward `-z` convention used by the world pose.

use crate::error::InpaintError;
use nalgebra::{Isometry3, Vector3};
use serde::{Deserialize, Serialize};

/// Camera-to-world rigid transform.
pub type CameraPose = Isometry3<f32>;

/// Pinhole camera intrinsics (pixels).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in x (pixels).
    pub fx: f32,
    /// Focal length in y (pixels).
    pub fy: f32,
    /// Principal point x (pixels).
    pub cx: f32,
    /// Principal point y (pixels).
    pub cy: f32,
}

impl CameraIntrinsics {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Returns `true` when all values are finite and focal lengths are non-zero.
    pub fn is_valid(&self) -> bool {
        self.fx.is_finite()
            && self.fy.is_finite()
            && self.cx.is_finite()
            && self.cy.is_finite()
            && self.fx.abs() > 1e-6
            && self.fy.abs() > 1e-6
    }

    pub fn validate(&self) -> Result<(), InpaintError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(InpaintError::InvalidIntrinsics {
                fx: self.fx,
                fy: self.fy,
                cx: self.cx,
                cy: self.cy,
            })
        }
    }

    /// Intrinsics reported for an image of `source` size, rescaled to a
    /// `target` resolution (e.g. camera texture → depth image).
    pub fn rescaled(&self, source: (usize, usize), target: (usize, usize)) -> Self {
        if source.0 == 0 || source.1 == 0 {
            return *self;
        }
        let sx = target.0 as f32 / source.0 as f32;
        let sy = target.1 as f32 / source.1 as f32;
        Self {
            fx: self.fx * sx,
            fy: self.fy * sy,
            cx: self.cx * sx,
            cy: self.cy * sy,
        }
    }

    /// Back-projects pixel `(px, py)` at `depth` to a camera-space point.
    #[inline]
    pub fn back_project(&self, px: f64, py: f64, depth: f64) -> Vector3<f64> {
        Vector3::new(
            depth * (px - self.cx as f64) / self.fx as f64,
            depth * (py - self.cy as f64) / self.fy as f64,
            depth,
        )
    }

    /// Metric footprint of one pixel at `depth` along x and y.
    #[inline]
    pub fn pixel_size(&self, depth: f32) -> (f32, f32) {
        (depth / self.fx, depth / self.fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_projection_of_principal_point_is_on_axis() {
        let intr = CameraIntrinsics::new(200.0, 180.0, 80.0, 45.0);
        let p = intr.back_project(80.0, 45.0, 1234.0);
        assert_eq!(p, Vector3::new(0.0, 0.0, 1234.0));
        let q = intr.back_project(100.0, 45.0, 2000.0);
        assert!((q.x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn rescale_to_depth_resolution() {
        let intr = CameraIntrinsics::new(480.0, 480.0, 320.0, 240.0);
        let depth = intr.rescaled((640, 480), (160, 120));
        assert_eq!(depth, CameraIntrinsics::new(120.0, 120.0, 80.0, 60.0));
    }

    #[test]
    fn zero_focal_length_is_invalid() {
        assert!(CameraIntrinsics::new(0.0, 1.0, 0.0, 0.0).validate().is_err());
        assert!(CameraIntrinsics::new(1.0, 1.0, 0.0, 0.0).validate().is_ok());
    }
}

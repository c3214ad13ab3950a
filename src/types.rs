use crate::camera::CameraIntrinsics;
use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle with inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Region {
    pub fn new(left: usize, top: usize, right: usize, bottom: usize) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }

    pub fn width(&self) -> usize {
        (self.right + 1).saturating_sub(self.left)
    }

    pub fn height(&self) -> usize {
        (self.bottom + 1).saturating_sub(self.top)
    }

    /// Clamps the rectangle to a `width × height` frame. `None` when the
    /// frame is empty, the rectangle is inverted or it lies outside the frame.
    pub fn clamped(&self, width: usize, height: usize) -> Option<Region> {
        if width == 0 || height == 0 || self.left > self.right || self.top > self.bottom {
            return None;
        }
        if self.left >= width || self.top >= height {
            return None;
        }
        Some(Region {
            left: self.left,
            top: self.top,
            right: self.right.min(width - 1),
            bottom: self.bottom.min(height - 1),
        })
    }

    /// Grows the rectangle by `margin` pixels on every side, clamped to the frame.
    pub fn dilated(&self, margin: usize, width: usize, height: usize) -> Region {
        Region {
            left: self.left.saturating_sub(margin),
            top: self.top.saturating_sub(margin),
            right: (self.right + margin).min(width.saturating_sub(1)),
            bottom: (self.bottom + margin).min(height.saturating_sub(1)),
        }
    }

    /// Region from a detector bounding box `[left, top, right, bottom]` in
    /// pixel units. Coordinates are truncated and clamped to the frame.
    pub fn from_bounding_box(bbox: [f32; 4], width: usize, height: usize) -> Option<Region> {
        if width == 0 || height == 0 || bbox.iter().any(|v| !v.is_finite()) {
            return None;
        }
        if bbox[2] < 0.0 || bbox[3] < 0.0 {
            return None;
        }
        let clamp_lo = |v: f32| if v < 0.0 { 0 } else { v as usize };
        let left = clamp_lo(bbox[0]);
        let top = clamp_lo(bbox[1]);
        let right = if bbox[2] >= width as f32 {
            width - 1
        } else {
            clamp_lo(bbox[2])
        };
        let bottom = if bbox[3] >= height as f32 {
            height - 1
        } else {
            clamp_lo(bbox[3])
        };
        Region::new(left, top, right, bottom).clamped(width, height)
    }

    /// The same rectangle after rotating the frame by 180°, used when the
    /// detector ran on a display-rotated (90° / 270°) image.
    pub fn rotated_half_turn(&self, width: usize, height: usize) -> Option<Region> {
        let r = self.clamped(width, height)?;
        Some(Region {
            left: width - 1 - r.right,
            top: height - 1 - r.bottom,
            right: width - 1 - r.left,
            bottom: height - 1 - r.top,
        })
    }
}

/// Plane `z = a + b·x + c·y` in camera space (millimetres).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Plane {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Depth where the viewing ray through pixel `(x, y)` meets the plane.
    ///
    /// `None` when the ray is parallel to the plane or the intersection lies
    /// behind the camera.
    pub fn depth_at_pixel(&self, intrinsics: &CameraIntrinsics, x: f64, y: f64) -> Option<f64> {
        let fx = intrinsics.fx as f64;
        let fy = intrinsics.fy as f64;
        let cx = intrinsics.cx as f64;
        let cy = intrinsics.cy as f64;
        let fxfy = fx * fy;
        let denom = -fxfy + (x - cx) * self.b * fy + (y - cy) * self.c * fx;
        if denom.abs() <= f64::EPSILON * fxfy {
            return None;
        }
        let z = -self.a * fxfy / denom;
        (z.is_finite() && z > 0.0).then_some(z)
    }
}

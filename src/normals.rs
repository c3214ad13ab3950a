//! Per-pixel surface normals from depth finite differences.
//!
//! For each pixel `p` the estimator scans a `(2r+1)²` window (centre
//! excluded). A neighbour `q` contributes when it lies inside the frame and
//! `|d_q − d_p| ≤ outlier_ratio · d_p`, which drops samples across depth
//! discontinuities. Each contribution adds `(d_q − d_p)/Δ` to the x sum when
//! `Δx ≠ 0` and to the y sum when `Δy ≠ 0`.
//!
//! The averaged per-pixel slopes are converted to metric slopes with the
//! pinhole pixel footprint `d_p / f` and the normal is
//! `normalize(∂z/∂x, ∂z/∂y, −1)`: camera space with `z` along the viewing
//! direction, normals facing the camera. Pixels with no usable neighbour (or
//! no depth) get the zero vector, which callers treat as "no normal".
//!
//! Complexity: O(W·H·(2r+1)²).
use crate::camera::CameraIntrinsics;
use crate::image::DepthImage;
use crate::mask::Mask;
use nalgebra::Vector3;
use serde::Deserialize;

/// Tunables of the neighbour-gradient estimator.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalParams {
    /// Half-size of the square window.
    pub radius: usize,
    /// Maximum relative depth difference of a usable neighbour.
    pub outlier_ratio: f32,
}

impl Default for NormalParams {
    fn default() -> Self {
        Self {
            radius: 2,
            outlier_ratio: 0.2,
        }
    }
}

/// Accumulated neighbour slopes around one pixel (depth units per pixel).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DepthGradient {
    pub depth: f32,
    pub sum_x: f32,
    pub count_x: usize,
    pub sum_y: f32,
    pub count_y: usize,
}

impl DepthGradient {
    /// Mean slope along x, `None` without samples.
    pub fn slope_x(&self) -> Option<f32> {
        (self.count_x > 0).then(|| self.sum_x / self.count_x as f32)
    }

    /// Mean slope along y, `None` without samples.
    pub fn slope_y(&self) -> Option<f32> {
        (self.count_y > 0).then(|| self.sum_y / self.count_y as f32)
    }
}

/// Gathers outlier-filtered finite differences around `(x, y)`.
///
/// Returns `None` when the centre pixel has no depth.
pub fn depth_gradient(
    depth: &DepthImage,
    x: usize,
    y: usize,
    params: &NormalParams,
) -> Option<DepthGradient> {
    let dp = depth.get(x, y) as f32;
    if dp <= 0.0 {
        return None;
    }
    let outlier = params.outlier_ratio * dp;
    let r = params.radius as isize;
    let mut grad = DepthGradient {
        depth: dp,
        ..Default::default()
    };
    for dy in -r..=r {
        for dx in -r..=r {
            if dx == 0 && dy == 0 {
                continue;
            }
            let Some(dq) = depth.get_checked(x as isize + dx, y as isize + dy) else {
                continue;
            };
            let distance = dq as f32 - dp;
            if distance.abs() > outlier {
                continue;
            }
            if dx != 0 {
                grad.count_x += 1;
                grad.sum_x += distance / dx as f32;
            }
            if dy != 0 {
                grad.count_y += 1;
                grad.sum_y += distance / dy as f32;
            }
        }
    }
    Some(grad)
}

/// Unit normal at `(x, y)`, or the zero vector when undefined.
pub fn estimate_normal(
    depth: &DepthImage,
    intrinsics: &CameraIntrinsics,
    x: usize,
    y: usize,
    params: &NormalParams,
) -> Vector3<f32> {
    let Some(grad) = depth_gradient(depth, x, y, params) else {
        return Vector3::zeros();
    };
    if grad.count_x == 0 && grad.count_y == 0 {
        return Vector3::zeros();
    }
    let (pixel_x, pixel_y) = intrinsics.pixel_size(grad.depth);
    let nx = grad.slope_x().map_or(0.0, |s| s / pixel_x);
    let ny = grad.slope_y().map_or(0.0, |s| s / pixel_y);
    let n = Vector3::new(nx, ny, -1.0);
    let norm = n.norm();
    if !norm.is_finite() || norm <= f32::EPSILON {
        return Vector3::zeros();
    }
    n / norm
}

/// Dense per-pixel normals (zero vector = undefined).
#[derive(Clone, Debug)]
pub struct NormalMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<Vector3<f32>>,
}

impl NormalMap {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![Vector3::zeros(); w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Vector3<f32> {
        self.data[y * self.w + x]
    }

    pub fn clear(&mut self) {
        self.data.fill(Vector3::zeros());
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.data.clear();
        self.data.resize(w * h, Vector3::zeros());
    }

    /// Number of pixels carrying a defined normal.
    pub fn defined_count(&self) -> usize {
        self.data.iter().filter(|n| n.norm_squared() > 0.0).count()
    }
}

fn fill_row(
    row: &mut [Vector3<f32>],
    y: usize,
    depth: &DepthImage,
    mask: &Mask,
    intrinsics: &CameraIntrinsics,
    params: &NormalParams,
) {
    let w = depth.w;
    for (x, dst) in row.iter_mut().enumerate() {
        *dst = if mask.is_excluded(y * w + x) {
            Vector3::zeros()
        } else {
            estimate_normal(depth, intrinsics, x, y, params)
        };
    }
}

#[cfg(feature = "parallel")]
fn fill_rows(
    normals: &mut NormalMap,
    depth: &DepthImage,
    mask: &Mask,
    intrinsics: &CameraIntrinsics,
    params: &NormalParams,
) {
    use rayon::prelude::*;
    normals
        .data
        .par_chunks_mut(depth.w.max(1))
        .enumerate()
        .for_each(|(y, row)| fill_row(row, y, depth, mask, intrinsics, params));
}

#[cfg(not(feature = "parallel"))]
fn fill_rows(
    normals: &mut NormalMap,
    depth: &DepthImage,
    mask: &Mask,
    intrinsics: &CameraIntrinsics,
    params: &NormalParams,
) {
    for (y, row) in normals.data.chunks_mut(depth.w.max(1)).enumerate() {
        fill_row(row, y, depth, mask, intrinsics, params);
    }
}

/// Computes normals for every non-masked pixel; masked pixels get zero.
pub fn build_normal_map_into(
    normals: &mut NormalMap,
    depth: &DepthImage,
    mask: &Mask,
    intrinsics: &CameraIntrinsics,
    params: &NormalParams,
) {
    debug_assert_eq!((normals.w, normals.h), (depth.w, depth.h));
    debug_assert_eq!((mask.w, mask.h), (depth.w, depth.h));
    fill_rows(normals, depth, mask, intrinsics, params);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> DepthImage {
        let mut depth = DepthImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                depth.set(x, y, (1000 + 2 * x + 3 * y) as i16);
            }
        }
        depth
    }

    #[test]
    fn ramp_normals_match_analytic_slope() {
        let (w, h) = (24usize, 18usize);
        let depth = ramp(w, h);
        let intr = CameraIntrinsics::new(150.0, 140.0, 12.0, 9.0);
        let params = NormalParams::default();
        for y in 2..h - 2 {
            for x in 2..w - 2 {
                let d = depth.get(x, y) as f32;
                let expected =
                    Vector3::new(2.0 * intr.fx / d, 3.0 * intr.fy / d, -1.0).normalize();
                let n = estimate_normal(&depth, &intr, x, y, &params);
                let angle = n.dot(&expected).clamp(-1.0, 1.0).acos();
                assert!(angle < 1e-3, "x={} y={} n={:?} expected={:?}", x, y, n, expected);
            }
        }
    }

    #[test]
    fn flat_depth_faces_camera() {
        let depth = DepthImage::filled(8, 8, 2000);
        let intr = CameraIntrinsics::new(100.0, 100.0, 4.0, 4.0);
        let n = estimate_normal(&depth, &intr, 0, 0, &NormalParams::default());
        assert_eq!(n, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn isolated_pixel_has_no_normal() {
        let mut depth = DepthImage::filled(5, 5, 4000);
        depth.set(2, 2, 1000);
        let intr = CameraIntrinsics::new(100.0, 100.0, 2.0, 2.0);
        let n = estimate_normal(&depth, &intr, 2, 2, &NormalParams::default());
        assert_eq!(n, Vector3::zeros());
        let missing = DepthImage::new(5, 5);
        assert_eq!(
            estimate_normal(&missing, &intr, 2, 2, &NormalParams::default()),
            Vector3::zeros()
        );
    }

    #[test]
    fn gradient_ignores_depth_discontinuity() {
        let mut depth = DepthImage::filled(5, 5, 1000);
        for y in 0..5 {
            depth.set(4, y, 3000);
        }
        let grad = depth_gradient(&depth, 2, 2, &NormalParams::default()).expect("depth");
        // Column x=4 is rejected: 5 rows dropped from the 24 neighbours.
        assert_eq!(grad.count_x + 5, 20);
        assert_eq!(grad.slope_x(), Some(0.0));
    }

    #[test]
    fn masked_pixels_keep_zero_normal() {
        let depth = DepthImage::filled(6, 4, 1500);
        let mut mask = Mask::new(6, 4);
        mask.data[7] = true;
        let intr = CameraIntrinsics::new(100.0, 100.0, 3.0, 2.0);
        let mut normals = NormalMap::new(6, 4);
        build_normal_map_into(&mut normals, &depth, &mask, &intr, &NormalParams::default());
        assert_eq!(normals.data[7], Vector3::zeros());
        assert_eq!(normals.defined_count(), 23);
    }
}

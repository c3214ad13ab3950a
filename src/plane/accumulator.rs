use crate::types::Plane;
use nalgebra::Vector3;

/// Running first and second moments of camera-space points.
#[derive(Clone, Debug, Default)]
pub struct MomentAccumulator {
    pub n: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_z: f64,
    pub sum_xx: f64,
    pub sum_yy: f64,
    pub sum_xy: f64,
    pub sum_yz: f64,
    pub sum_zx: f64,
}

impl MomentAccumulator {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn push(&mut self, p: &Vector3<f64>) {
        self.n += 1;
        self.sum_x += p.x;
        self.sum_y += p.y;
        self.sum_z += p.z;
        self.sum_xx += p.x * p.x;
        self.sum_yy += p.y * p.y;
        self.sum_xy += p.x * p.y;
        self.sum_yz += p.y * p.z;
        self.sum_zx += p.z * p.x;
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn centroid(&self) -> Option<Vector3<f64>> {
        if self.n == 0 {
            return None;
        }
        let inv = 1.0 / self.n as f64;
        Some(Vector3::new(
            self.sum_x * inv,
            self.sum_y * inv,
            self.sum_z * inv,
        ))
    }

    /// Least-squares `z = a + b·x + c·y` through the accumulated points.
    ///
    /// Returns `None` when empty or when the x/y spread is degenerate
    /// (collinear or single-point support).
    pub fn solve(&self) -> Option<Plane> {
        let mean = self.centroid()?;
        let inv = 1.0 / self.n as f64;
        let var_xx = self.sum_xx * inv - mean.x * mean.x;
        let var_yy = self.sum_yy * inv - mean.y * mean.y;
        let var_xy = self.sum_xy * inv - mean.x * mean.y;
        let var_yz = self.sum_yz * inv - mean.y * mean.z;
        let var_zx = self.sum_zx * inv - mean.z * mean.x;

        let det = var_xx * var_yy - var_xy * var_xy;
        let scale = var_xx.abs() * var_yy.abs();
        if !det.is_finite() || scale <= 0.0 || det <= scale * 1e-9 {
            return None;
        }
        let b = (var_zx * var_yy - var_xy * var_yz) / det;
        let c = (var_xx * var_yz - var_xy * var_zx) / det;
        let a = mean.z - b * mean.x - c * mean.y;
        Some(Plane::new(a, b, c))
    }
}

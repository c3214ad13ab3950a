//! 2-D orientation histogram over (θ, φ) of unit normals.
//!
//! `θ = atan2(z, x)` and `φ = asin(y)`. Normals facing the camera have
//! `z < 0`, so `θ ∈ (−π, 0]` maps linearly onto `[0, theta_slices)` and
//! `φ ∈ [−π/2, π/2]` onto `[0, phi_slices)`. Bin index is
//! `phi_idx · theta_slices + theta_idx`.
//!
//! Bin 0 receives undefined (zero) normals and is seeded with
//! `−theta_slices · phi_slices` so that it can never become a core.
use super::ClusterMap;
use crate::mask::Mask;
use crate::normals::NormalMap;
use nalgebra::Vector3;
use std::f32::consts::{FRAC_PI_2, PI};

#[derive(Clone, Debug)]
pub struct OrientationHistogram {
    theta_slices: usize,
    phi_slices: usize,
    counts: Vec<i32>,
}

impl OrientationHistogram {
    pub fn new(theta_slices: usize, phi_slices: usize) -> Self {
        let theta_slices = theta_slices.max(1);
        let phi_slices = phi_slices.max(1);
        let mut hist = Self {
            theta_slices,
            phi_slices,
            counts: vec![0; theta_slices * phi_slices],
        };
        hist.reset();
        hist
    }

    pub fn theta_slices(&self) -> usize {
        self.theta_slices
    }

    pub fn phi_slices(&self) -> usize {
        self.phi_slices
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &[i32] {
        &self.counts
    }

    /// Zeroes every bin and re-seeds the undefined-normal sink.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.counts[0] = -((self.theta_slices * self.phi_slices) as i32);
    }

    #[inline]
    pub fn count(&self, bin: usize) -> i32 {
        self.counts[bin]
    }

    #[inline]
    pub fn increment(&mut self, bin: usize) {
        self.counts[bin] += 1;
    }

    /// Zeroes `bin`, returning its previous count.
    #[inline]
    pub fn take(&mut self, bin: usize) -> i32 {
        std::mem::take(&mut self.counts[bin])
    }

    /// `(theta_idx, phi_idx)` of a bin.
    #[inline]
    pub fn coords(&self, bin: usize) -> (usize, usize) {
        (bin % self.theta_slices, bin / self.theta_slices)
    }

    #[inline]
    pub fn bin_at(&self, theta_idx: usize, phi_idx: usize) -> usize {
        phi_idx * self.theta_slices + theta_idx
    }

    /// Discretizes a unit normal; the zero vector maps to bin 0.
    pub fn bin_for_normal(&self, n: &Vector3<f32>) -> usize {
        if n.norm_squared() <= f32::EPSILON || !n.iter().all(|v| v.is_finite()) {
            return 0;
        }
        let theta = n.z.atan2(n.x);
        let phi = n.y.clamp(-1.0, 1.0).asin();
        let theta_idx = -((theta * self.theta_slices as f32 / PI) as i32);
        let phi_idx = ((phi + FRAC_PI_2) * self.phi_slices as f32 / PI) as i32;
        let theta_idx = theta_idx.clamp(0, self.theta_slices as i32 - 1) as usize;
        let phi_idx = phi_idx.clamp(0, self.phi_slices as i32 - 1) as usize;
        self.bin_at(theta_idx, phi_idx)
    }
}

/// Bins every non-masked normal and records its bin in `cluster_map`.
///
/// The histogram and map are expected to be freshly reset.
pub fn build_histogram_into(
    hist: &mut OrientationHistogram,
    cluster_map: &mut ClusterMap,
    normals: &NormalMap,
    mask: &Mask,
) {
    for (idx, n) in normals.data.iter().enumerate() {
        if mask.is_excluded(idx) {
            continue;
        }
        let bin = hist.bin_for_normal(n);
        hist.increment(bin);
        cluster_map.set(idx, Some(bin));
    }
}

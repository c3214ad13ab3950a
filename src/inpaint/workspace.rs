//! Per-frame scratch buffers reused across inpaint calls.
//!
//! Buffers are sized for the depth resolution once and cleared, not
//! reallocated, at the start of every call.
use crate::cluster::{ClusterMap, ClusterParams, OrientationHistogram};
use crate::mask::Mask;
use crate::normals::NormalMap;
use log::debug;

/// Scratch state shared by the inpainting stages.
pub struct InpaintWorkspace {
    pub mask: Mask,
    pub normals: NormalMap,
    pub histogram: OrientationHistogram,
    pub cluster_map: ClusterMap,
}

impl InpaintWorkspace {
    pub fn new(width: usize, height: usize, params: &ClusterParams) -> Self {
        Self {
            mask: Mask::new(width, height),
            normals: NormalMap::new(width, height),
            histogram: OrientationHistogram::new(params.theta_slices, params.phi_slices),
            cluster_map: ClusterMap::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.mask.w
    }

    pub fn height(&self) -> usize {
        self.mask.h
    }

    /// Clears every buffer, first re-sizing any whose shape no longer
    /// matches the frame or histogram parameters.
    pub fn reset(&mut self, width: usize, height: usize, params: &ClusterParams) {
        if self.width() != width || self.height() != height {
            debug!(
                "InpaintWorkspace: resize {}x{} -> {}x{}",
                self.width(),
                self.height(),
                width,
                height
            );
            self.mask.resize(width, height);
            self.normals.resize(width, height);
            self.cluster_map.resize(width, height);
        } else {
            self.mask.clear();
            self.normals.clear();
            self.cluster_map.clear();
        }
        if self.histogram.theta_slices() != params.theta_slices.max(1)
            || self.histogram.phi_slices() != params.phi_slices.max(1)
        {
            self.histogram = OrientationHistogram::new(params.theta_slices, params.phi_slices);
        } else {
            self.histogram.reset();
        }
    }
}

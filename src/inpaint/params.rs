//! Parameter types configuring the inpainting stages.
//!
//! Every struct deserializes with per-field defaults so a JSON configuration
//! only needs to name the knobs it changes.
use crate::cluster::ClusterParams;
use crate::error::InpaintError;
use crate::normals::NormalParams;
use crate::plane::PlaneParams;
use crate::types::Region;
use serde::Deserialize;

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct InpaintParams {
    /// Pixels with confidence strictly below this value are masked.
    pub confidence_threshold: u8,
    /// Neighbourhood used by the normal estimator.
    pub normals: NormalParams,
    /// Orientation histogram and core-merging knobs.
    pub cluster: ClusterParams,
    /// Plane fitting support rules.
    pub plane: PlaneParams,
    /// Plane selection tolerance and fallback depth.
    pub depth_fill: DepthFillParams,
    /// Relation between depth and color pixel grids.
    pub color: ColorMapping,
}

impl Default for InpaintParams {
    fn default() -> Self {
        Self {
            confidence_threshold: 128,
            normals: NormalParams::default(),
            cluster: ClusterParams::default(),
            plane: PlaneParams::default(),
            depth_fill: DepthFillParams::default(),
            color: ColorMapping::default(),
        }
    }
}

/// Plane selection during depth inpainting.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepthFillParams {
    /// A plane may predict at most this much nearer than the observed depth.
    pub error_margin_mm: f32,
    /// Depth written to region pixels that no plane accepts.
    pub far_depth_mm: i16,
}

impl Default for DepthFillParams {
    fn default() -> Self {
        Self {
            error_margin_mm: 300.0,
            far_depth_mm: 8000,
        }
    }
}

/// Nearest-neighbour mapping between the depth grid and the color grid.
///
/// Color pixel `(round(x·scale), round(y·scale) + row_offset)` corresponds
/// to depth pixel `(x, y)`; `row_offset` accounts for color rows cropped
/// above the depth field of view.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorMapping {
    /// Color pixels per depth pixel.
    pub scale: f32,
    /// Color row of depth row 0.
    pub row_offset: i32,
}

impl Default for ColorMapping {
    fn default() -> Self {
        Self {
            scale: 4.0,
            row_offset: 60,
        }
    }
}

#[inline]
fn clamp_index(v: f32, len: usize) -> usize {
    if len == 0 || !(v > 0.0) {
        return 0;
    }
    (v as usize).min(len - 1)
}

impl ColorMapping {
    /// Identity mapping for color images sharing the depth grid.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            row_offset: 0,
        }
    }

    pub fn validate(&self) -> Result<(), InpaintError> {
        if self.scale.is_finite() && self.scale > 0.0 {
            Ok(())
        } else {
            Err(InpaintError::InvalidColorScale(self.scale))
        }
    }

    /// Color pixel for depth pixel `(x, y)`, clamped to a `w × h` color image.
    #[inline]
    pub fn depth_to_color(&self, x: usize, y: usize, w: usize, h: usize) -> (usize, usize) {
        let cx = (x as f32 * self.scale).round();
        let cy = (y as f32 * self.scale).round() + self.row_offset as f32;
        (clamp_index(cx, w), clamp_index(cy, h))
    }

    /// Depth pixel for color pixel `(x, y)`, clamped to a `w × h` depth image.
    #[inline]
    pub fn color_to_depth(&self, x: usize, y: usize, w: usize, h: usize) -> (usize, usize) {
        let dx = (x as f32 / self.scale).round();
        let dy = ((y as f32 - self.row_offset as f32) / self.scale).round();
        (clamp_index(dx, w), clamp_index(dy, h))
    }

    /// Color rectangle covering every color pixel of a depth region.
    pub fn depth_region_to_color(&self, region: &Region, w: usize, h: usize) -> Option<Region> {
        if w == 0 || h == 0 {
            return None;
        }
        let s = self.scale;
        let off = self.row_offset as f32;
        let top = region.top as f32 * s + off;
        let bottom = (region.bottom + 1) as f32 * s + off - 1.0;
        let left = (region.left as f32 * s).round();
        let right = ((region.right + 1) as f32 * s - 1.0).round();
        if bottom < 0.0 || top > (h - 1) as f32 || left > (w - 1) as f32 {
            return None;
        }
        Region::new(
            clamp_index(left, w),
            clamp_index(top.round(), h),
            clamp_index(right, w),
            clamp_index(bottom.round(), h),
        )
        .clamped(w, h)
    }

    /// Depth rectangle containing a color region, clamped to a `w × h` depth image.
    pub fn color_region_to_depth(&self, region: &Region, w: usize, h: usize) -> Option<Region> {
        if w == 0 || h == 0 {
            return None;
        }
        let s = self.scale;
        let off = self.row_offset as f32;
        let left = (region.left as f32 / s).floor();
        let right = (region.right as f32 / s).floor();
        let top = ((region.top as f32 - off) / s).floor();
        let bottom = ((region.bottom as f32 - off) / s).floor();
        if bottom < 0.0 || top > (h - 1) as f32 || left > (w - 1) as f32 {
            return None;
        }
        Region::new(
            clamp_index(left, w),
            clamp_index(top, h),
            clamp_index(right, w),
            clamp_index(bottom, h),
        )
        .clamped(w, h)
    }
}

//! Exclusion mask for plane statistics.
//!
//! A pixel is excluded when its depth confidence is strictly below the
//! threshold or when it lies inside the hole (inclusive bounds). Excluded
//! pixels never feed the normal histogram or the plane fits.
use crate::image::{ImageU8, ImageView};
use crate::types::Region;

/// Dense per-pixel exclusion flags (`true` = excluded).
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<bool>,
}

impl Mask {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    #[inline]
    pub fn is_excluded(&self, idx: usize) -> bool {
        self.data[idx]
    }

    pub fn excluded_count(&self) -> usize {
        self.data.iter().filter(|&&m| m).count()
    }

    pub fn clear(&mut self) {
        self.data.fill(false);
    }

    /// Re-sizes the mask, keeping the allocation when possible.
    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.data.clear();
        self.data.resize(w * h, false);
    }
}

/// Rebuilds `mask` from the confidence map and the hole rectangle.
///
/// `confidence` must have the mask's dimensions.
pub fn build_mask_into(mask: &mut Mask, confidence: &ImageU8<'_>, region: &Region, threshold: u8) {
    debug_assert_eq!((confidence.w, confidence.h), (mask.w, mask.h));
    let w = mask.w;
    for (y, row) in confidence.rows().enumerate().take(mask.h) {
        let out = &mut mask.data[y * w..(y + 1) * w];
        for (x, (dst, &conf)) in out.iter_mut().zip(row).enumerate() {
            *dst = conf < threshold || region.contains(x, y);
        }
    }
}

/// Allocating variant of [`build_mask_into`].
pub fn build_mask(confidence: &ImageU8<'_>, region: &Region, threshold: u8) -> Mask {
    let mut mask = Mask::new(confidence.w, confidence.h);
    build_mask_into(&mut mask, confidence, region, threshold);
    mask
}

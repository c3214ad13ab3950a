//! Owned depth frame in millimetres, row-major (stride == width).
//!
//! Samples are signed 16-bit as delivered by the depth source; zero or
//! negative values mean "no measurement".
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq)]
pub struct DepthImage {
    /// Frame width in pixels
    pub w: usize,
    /// Frame height in pixels
    pub h: usize,
    /// Depth samples in millimetres
    pub data: Vec<i16>,
}

impl DepthImage {
    /// Zero-initialized (no measurement) frame of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0)
    }

    /// Frame with every sample set to `depth_mm`.
    pub fn filled(w: usize, h: usize, depth_mm: i16) -> Self {
        Self {
            w,
            h,
            data: vec![depth_mm; w * h],
        }
    }

    /// Wraps an existing buffer, returning `None` when its length is not `w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<i16>) -> Option<Self> {
        (data.len() == w * h).then_some(Self { w, h, data })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> i16 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, depth_mm: i16) {
        let i = self.idx(x, y);
        self.data[i] = depth_mm;
    }

    /// Depth at a signed coordinate, `None` outside the frame.
    #[inline]
    pub fn get_checked(&self, x: isize, y: isize) -> Option<i16> {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }
}

impl ImageView for DepthImage {
    type Pixel = i16;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w
    }
    #[inline]
    fn row(&self, y: usize) -> &[i16] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for DepthImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [i16] {
        let start = y * self.w;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

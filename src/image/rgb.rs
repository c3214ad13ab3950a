//! Owned 8-bit RGB image in row-major layout.
use super::traits::{ImageView, ImageViewMut};
use serde::Serialize;

/// 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RgbImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<Rgb>,
}

impl RgbImage {
    pub fn filled(w: usize, h: usize, color: Rgb) -> Self {
        Self {
            w,
            h,
            data: vec![color; w * h],
        }
    }

    /// Builds an image from interleaved `RGBRGB…` bytes.
    pub fn from_rgb_bytes(w: usize, h: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != w * h * 3 {
            return None;
        }
        let data = bytes
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Some(Self { w, h, data })
    }

    /// Interleaved `RGBRGB…` bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 3);
        for px in &self.data {
            out.extend_from_slice(&[px.r, px.g, px.b]);
        }
        out
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        let i = self.idx(x, y);
        self.data[i] = color;
    }
}

impl ImageView for RgbImage {
    type Pixel = Rgb;

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
    fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for RgbImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Rgb] {
        let start = y * self.w;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}

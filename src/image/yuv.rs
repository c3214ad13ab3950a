//! YUV 4:2:0 camera frames to RGB.
//!
//! Integer BT.601 arithmetic with 10 fractional bits. Intermediate channel
//! values are clamped to `[0, 2^18 - 1]` before being narrowed to 8 bits.
use super::rgb::{Rgb, RgbImage};
use crate::error::InpaintError;

const MAX_CHANNEL_VALUE: i32 = 262_143;

/// Borrowed planes of a YUV 4:2:0 frame with camera-provided strides.
///
/// `u` and `v` may be interleaved (`uv_pixel_stride == 2`) or planar
/// (`uv_pixel_stride == 1`).
#[derive(Clone, Debug)]
pub struct Yuv420Planes<'a> {
    pub width: usize,
    pub height: usize,
    pub y: &'a [u8],
    pub u: &'a [u8],
    pub v: &'a [u8],
    pub y_row_stride: usize,
    pub uv_row_stride: usize,
    pub uv_pixel_stride: usize,
}

impl<'a> Yuv420Planes<'a> {
    fn check(&self) -> Result<(), InpaintError> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }
        let y_needed = (self.height - 1) * self.y_row_stride + self.width;
        if self.y.len() < y_needed {
            return Err(InpaintError::BufferSize {
                what: "luma plane",
                expected: y_needed,
                actual: self.y.len(),
            });
        }
        let uv_needed = ((self.height - 1) >> 1) * self.uv_row_stride
            + ((self.width - 1) >> 1) * self.uv_pixel_stride
            + 1;
        for (what, plane) in [("u plane", self.u), ("v plane", self.v)] {
            if plane.len() < uv_needed {
                return Err(InpaintError::BufferSize {
                    what,
                    expected: uv_needed,
                    actual: plane.len(),
                });
            }
        }
        Ok(())
    }
}

#[inline]
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> Rgb {
    let y = (y as i32 - 16).max(0);
    let u = u as i32 - 128;
    let v = v as i32 - 128;

    let y1192 = 1192 * y;
    let r = (y1192 + 1634 * v).clamp(0, MAX_CHANNEL_VALUE);
    let g = (y1192 - 833 * v - 400 * u).clamp(0, MAX_CHANNEL_VALUE);
    let b = (y1192 + 2066 * u).clamp(0, MAX_CHANNEL_VALUE);

    Rgb::new((r >> 10) as u8, (g >> 10) as u8, (b >> 10) as u8)
}

/// Converts `planes` into `out`, resizing it to the frame dimensions.
pub fn yuv420_to_rgb_into(
    planes: &Yuv420Planes<'_>,
    out: &mut RgbImage,
) -> Result<(), InpaintError> {
    planes.check()?;
    out.w = planes.width;
    out.h = planes.height;
    out.data.resize(planes.width * planes.height, Rgb::default());

    for j in 0..planes.height {
        let p_y = planes.y_row_stride * j;
        let p_uv = planes.uv_row_stride * (j >> 1);
        let row = &mut out.data[j * planes.width..(j + 1) * planes.width];
        for (i, dst) in row.iter_mut().enumerate() {
            let uv_offset = p_uv + (i >> 1) * planes.uv_pixel_stride;
            *dst = yuv_to_rgb(planes.y[p_y + i], planes.u[uv_offset], planes.v[uv_offset]);
        }
    }
    Ok(())
}

/// Allocating variant of [`yuv420_to_rgb_into`].
pub fn yuv420_to_rgb(planes: &Yuv420Planes<'_>) -> Result<RgbImage, InpaintError> {
    let mut out = RgbImage::filled(0, 0, Rgb::default());
    yuv420_to_rgb_into(planes, &mut out)?;
    Ok(out)
}

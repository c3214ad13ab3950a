//! I/O helpers for depth, confidence and color frames and JSON reports.
//!
//! - `load_depth_png`: read a 16-bit grayscale PNG as millimetre depth.
//! - `load_confidence_png`: read an 8-bit grayscale PNG into an owned buffer.
//! - `load_rgb_png` / `save_rgb_png`: color frames.
//! - `save_depth_png`: write a `DepthImage` as 16-bit grayscale.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{DepthImage, ImageU8, ImageView, RgbImage};
use crate::error::InpaintError;
use image::{ImageBuffer, Luma, RgbImage as RgbBuffer};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8::packed(self.width, self.height, &self.data)
    }
}

fn open_image(path: &Path) -> Result<image::DynamicImage, InpaintError> {
    image::open(path).map_err(|source| InpaintError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a 16-bit grayscale PNG as depth in millimetres.
///
/// Samples above `i16::MAX` are saturated.
pub fn load_depth_png(path: &Path) -> Result<DepthImage, InpaintError> {
    let img = open_image(path)?.into_luma16();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img
        .into_raw()
        .into_iter()
        .map(|v| v.min(i16::MAX as u16) as i16)
        .collect();
    Ok(DepthImage {
        w: width,
        h: height,
        data,
    })
}

/// Load an 8-bit grayscale PNG (confidence map).
pub fn load_confidence_png(path: &Path) -> Result<GrayImageU8, InpaintError> {
    let img = open_image(path)?.into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(GrayImageU8::new(width, height, img.into_raw()))
}

/// Load a color image and convert to 8-bit RGB.
pub fn load_rgb_png(path: &Path) -> Result<RgbImage, InpaintError> {
    let img = open_image(path)?.into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let raw = img.into_raw();
    RgbImage::from_rgb_bytes(width, height, &raw).ok_or(InpaintError::BufferSize {
        what: "decoded color image",
        expected: width * height * 3,
        actual: raw.len(),
    })
}

/// Save depth as a 16-bit grayscale PNG; missing (negative) samples become 0.
pub fn save_depth_png(depth: &DepthImage, path: &Path) -> Result<(), InpaintError> {
    ensure_parent_dir(path)?;
    let mut raw = Vec::with_capacity(depth.pixel_count());
    for row in depth.rows() {
        raw.extend(row.iter().map(|&d| d.max(0) as u16));
    }
    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(depth.w as u32, depth.h as u32, raw).ok_or(
            InpaintError::BufferSize {
                what: "depth image",
                expected: depth.w * depth.h,
                actual: depth.data.len(),
            },
        )?;
    buffer.save(path).map_err(|source| InpaintError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Save an RGB image to PNG.
pub fn save_rgb_png(color: &RgbImage, path: &Path) -> Result<(), InpaintError> {
    ensure_parent_dir(path)?;
    let buffer = RgbBuffer::from_raw(color.w as u32, color.h as u32, color.to_rgb_bytes())
        .ok_or(InpaintError::BufferSize {
            what: "color image",
            expected: color.w * color.h,
            actual: color.data.len(),
        })?;
    buffer.save(path).map_err(|source| InpaintError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), InpaintError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| InpaintError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| InpaintError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<(), InpaintError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| InpaintError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

//! Error type for caller contract violations and tool I/O.
//!
//! Degenerate geometry (empty clusters, singular fits, taps near the border)
//! is not an error: those paths return `None` or fall back to default values.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InpaintError {
    #[error("{what} buffer has {actual} elements, expected {expected}")]
    BufferSize {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{what} is {actual_w}x{actual_h}, expected {expected_w}x{expected_h}")]
    Dimensions {
        what: &'static str,
        expected_w: usize,
        expected_h: usize,
        actual_w: usize,
        actual_h: usize,
    },
    #[error("invalid camera intrinsics fx={fx} fy={fy} cx={cx} cy={cy}")]
    InvalidIntrinsics { fx: f32, fy: f32, cx: f32, cy: f32 },
    #[error("region {left},{top}..{right},{bottom} does not intersect a {width}x{height} frame")]
    InvalidRegion {
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        width: usize,
        height: usize,
    },
    #[error("invalid color mapping scale {0}")]
    InvalidColorScale(f32),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode or encode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

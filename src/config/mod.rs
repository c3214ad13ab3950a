//! JSON configuration of the `inpaint_demo` tool.
//!
//! ```json
//! {
//!   "input": { "depth": "depth.png", "confidence": "conf.png", "color": "rgb.png" },
//!   "intrinsics": { "fx": 480.0, "fy": 480.0, "cx": 320.0, "cy": 240.0 },
//!   "intrinsics_size": [640, 480],
//!   "detection": { "bbox": [120.5, 80.0, 260.0, 200.0], "source_size": [640, 480], "color_frame": true },
//!   "tap": [0.5, 0.7],
//!   "params": { "confidence_threshold": 100 },
//!   "output": { "depth": "out/depth.png", "color": "out/color.png", "report": "out/report.json" }
//! }
//! ```
use crate::camera::CameraIntrinsics;
use crate::error::InpaintError;
use crate::inpaint::InpaintParams;
use crate::placement::TapParams;
use crate::types::Region;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct InputConfig {
    /// 16-bit grayscale PNG, millimetres.
    pub depth: PathBuf,
    /// 8-bit grayscale PNG; every pixel is fully confident when absent.
    #[serde(default)]
    pub confidence: Option<PathBuf>,
    #[serde(default)]
    pub color: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub depth: Option<PathBuf>,
    pub color: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Object detector bounding box.
#[derive(Clone, Debug, Deserialize)]
pub struct DetectionConfig {
    /// `[left, top, right, bottom]` in pixels of the detection image.
    pub bbox: [f32; 4],
    /// Detection image size; the box is rescaled to the depth frame when set.
    #[serde(default)]
    pub source_size: Option<[usize; 2]>,
    /// The detector saw the frame rotated by 180°.
    #[serde(default)]
    pub half_turn: bool,
    /// `bbox` is in pixels of the color image of size `source_size`, mapped
    /// to depth pixels through `params.color`.
    #[serde(default)]
    pub color_frame: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input: InputConfig,
    pub intrinsics: CameraIntrinsics,
    /// Image size the intrinsics were calibrated for, when it differs from the depth frame.
    #[serde(default)]
    pub intrinsics_size: Option<[usize; 2]>,
    /// Hole in depth pixels; takes precedence over `detection`.
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub detection: Option<DetectionConfig>,
    /// Normalized tap to resolve after inpainting.
    #[serde(default)]
    pub tap: Option<[f32; 2]>,
    #[serde(default)]
    pub params: InpaintParams,
    #[serde(default)]
    pub tap_params: TapParams,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RuntimeConfig {
    /// Intrinsics expressed in pixels of a `width × height` depth frame.
    pub fn depth_intrinsics(&self, width: usize, height: usize) -> CameraIntrinsics {
        match self.intrinsics_size {
            Some([sw, sh]) => self.intrinsics.rescaled((sw, sh), (width, height)),
            None => self.intrinsics,
        }
    }

    /// Hole rectangle in depth pixels, or `None` when nothing is to be removed.
    pub fn depth_region(&self, width: usize, height: usize) -> Option<Region> {
        if let Some(region) = &self.region {
            return region.clamped(width, height);
        }
        let det = self.detection.as_ref()?;
        let region = if det.color_frame {
            let [cw, ch] = det.source_size?;
            let color = Region::from_bounding_box(det.bbox, cw, ch)?;
            self.params
                .color
                .color_region_to_depth(&color, width, height)?
        } else {
            let bbox = match det.source_size {
                Some([sw, sh]) if sw > 0 && sh > 0 => {
                    let sx = width as f32 / sw as f32;
                    let sy = height as f32 / sh as f32;
                    [det.bbox[0] * sx, det.bbox[1] * sy, det.bbox[2] * sx, det.bbox[3] * sy]
                }
                _ => det.bbox,
            };
            Region::from_bounding_box(bbox, width, height)?
        };
        if det.half_turn {
            region.rotated_half_turn(width, height)
        } else {
            Some(region)
        }
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, InpaintError> {
    let contents = fs::read_to_string(path).map_err(|source| InpaintError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| InpaintError::Json {
        path: path.to_path_buf(),
        source,
    })
}

//! Inpainter pipeline driving the stages end-to-end.
//!
//! [`Inpainter`] owns the parameters and a reusable workspace. Each call to
//! [`Inpainter::process`] validates the frame, rebuilds mask, normals and
//! orientation clusters, fits planes around the hole and fills depth and
//! color in place.
//!
//! ```no_run
//! use depth_inpaint::prelude::*;
//!
//! # fn example(depth: &mut DepthImage, conf: &[u8]) -> Result<(), depth_inpaint::InpaintError> {
//! let (w, h) = (depth.w, depth.h);
//! let mut inpainter = Inpainter::new(w, h, InpaintParams::default());
//! let report = inpainter.process(InpaintFrame {
//!     depth,
//!     confidence: ImageU8::packed(w, h, conf),
//!     color: None,
//!     intrinsics: CameraIntrinsics::new(200.0, 200.0, w as f32 / 2.0, h as f32 / 2.0),
//!     region: Region::new(10, 10, 20, 20),
//! })?;
//! println!("{:?} filled={}", report.outcome, report.filled_pixels);
//! # Ok(())
//! # }
//! ```
use super::color::{paint_hole, plane_average_colors};
use super::depth::fill_depth;
use super::params::InpaintParams;
use super::workspace::InpaintWorkspace;
use crate::camera::CameraIntrinsics;
use crate::cluster::{build_histogram_into, cluster_histogram};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    ClusterSummary, InpaintOutcome, InpaintReport, InputDescriptor, PlaneSummary,
};
use crate::error::InpaintError;
use crate::image::{DepthImage, ImageU8, RgbImage};
use crate::mask::build_mask_into;
use crate::normals::build_normal_map_into;
use crate::plane::fit_planes;
use crate::types::{Plane, Region};
use log::{debug, info};
use std::time::Instant;

/// One depth/confidence/color frame plus the hole to remove.
pub struct InpaintFrame<'a> {
    /// Depth in millimetres; region pixels are overwritten.
    pub depth: &'a mut DepthImage,
    /// Per-pixel confidence, same dimensions as `depth`.
    pub confidence: ImageU8<'a>,
    /// Optional color image related to `depth` by the configured mapping.
    pub color: Option<&'a mut RgbImage>,
    /// Pinhole intrinsics in depth pixel units.
    pub intrinsics: CameraIntrinsics,
    /// Hole rectangle in depth pixels (inclusive).
    pub region: Region,
}

/// Plane-based depth and color inpainter with reusable scratch buffers.
pub struct Inpainter {
    params: InpaintParams,
    workspace: InpaintWorkspace,
}

impl Inpainter {
    /// Creates an inpainter whose buffers are sized for `width × height` depth frames.
    pub fn new(width: usize, height: usize, params: InpaintParams) -> Self {
        let workspace = InpaintWorkspace::new(width, height, &params.cluster);
        Self { params, workspace }
    }

    pub fn params(&self) -> &InpaintParams {
        &self.params
    }

    pub fn set_params(&mut self, params: InpaintParams) {
        self.params = params;
    }

    /// Scratch state of the last call. After a successful fill the cluster
    /// map holds the selected plane index per pixel.
    pub fn workspace(&self) -> &InpaintWorkspace {
        &self.workspace
    }

    /// Runs the full pipeline on `frame`.
    ///
    /// Returns an error only when the frame violates the buffer contract.
    /// Frames without usable planes come back as [`InpaintOutcome::NoPlanes`]
    /// with depth and color untouched.
    pub fn process(&mut self, frame: InpaintFrame<'_>) -> Result<InpaintReport, InpaintError> {
        let InpaintFrame {
            depth,
            confidence,
            mut color,
            intrinsics,
            region,
        } = frame;
        let (width, height) = (depth.w, depth.h);
        let region = validate_frame(depth, &confidence, color.as_deref(), &intrinsics, &region)?;
        let params = &self.params;
        params.color.validate()?;

        let color_region = color.as_deref().and_then(|img| {
            params
                .color
                .depth_region_to_color(&region, img.w, img.h)
        });
        let mut report = InpaintReport::new(InputDescriptor {
            width,
            height,
            color_size: color.as_deref().map(|img| [img.w, img.h]),
            region,
            color_region,
            intrinsics,
        });
        debug!(
            "Inpainter::process start w={} h={} region=({},{})-({},{})",
            width, height, region.left, region.top, region.right, region.bottom
        );
        let total_start = Instant::now();

        let ws = &mut self.workspace;
        ws.reset(width, height, &params.cluster);

        let stage_start = Instant::now();
        build_mask_into(&mut ws.mask, &confidence, &region, params.confidence_threshold);
        report.masked_pixels = ws.mask.excluded_count();
        report.timings.push("mask", elapsed_ms(stage_start));
        debug!("Stage: mask excluded={}", report.masked_pixels);

        let stage_start = Instant::now();
        build_normal_map_into(
            &mut ws.normals,
            depth,
            &ws.mask,
            &intrinsics,
            &params.normals,
        );
        report.defined_normals = ws.normals.defined_count();
        report.timings.push("normals", elapsed_ms(stage_start));
        debug!("Stage: normals defined={}", report.defined_normals);

        let stage_start = Instant::now();
        build_histogram_into(&mut ws.histogram, &mut ws.cluster_map, &ws.normals, &ws.mask);
        let clustering = cluster_histogram(&mut ws.histogram, &params.cluster);
        report.candidate_bins = clustering.candidate_count;
        report.core_bins = clustering.cores.len();
        report.clusters = clustering.clusters.iter().map(ClusterSummary::from).collect();
        report.timings.push("clusters", elapsed_ms(stage_start));

        if clustering.clusters.is_empty() {
            report.timings.total_ms = elapsed_ms(total_start);
            info!(
                "Inpainter: no plane candidates ({:.2} ms)",
                report.timings.total_ms
            );
            return Ok(report);
        }

        let stage_start = Instant::now();
        let fitted = fit_planes(
            &clustering.clusters,
            depth,
            &ws.mask,
            &ws.cluster_map,
            &region,
            &intrinsics,
            &params.plane,
        );
        report.planes = fitted.iter().map(PlaneSummary::from).collect();
        report.timings.push("planes", elapsed_ms(stage_start));
        debug!(
            "Stage: planes fitted={} of {} clusters",
            fitted.len(),
            clustering.clusters.len()
        );

        if fitted.is_empty() {
            report.timings.total_ms = elapsed_ms(total_start);
            info!(
                "Inpainter: every cluster was degenerate ({:.2} ms)",
                report.timings.total_ms
            );
            return Ok(report);
        }

        let planes: Vec<Plane> = fitted.iter().map(|f| f.plane).collect();
        let stage_start = Instant::now();
        let stats = fill_depth(
            depth,
            &mut ws.cluster_map,
            &planes,
            &region,
            &intrinsics,
            &params.depth_fill,
        );
        report.filled_pixels = stats.filled;
        report.fallback_pixels = stats.fallback;
        report.assigned_pixels = stats.assigned;
        report.timings.push("depth", elapsed_ms(stage_start));
        debug!(
            "Stage: depth filled={} fallback={} assigned={}",
            stats.filled, stats.fallback, stats.assigned
        );

        if let (Some(img), Some(color_region)) = (color.as_deref_mut(), color_region) {
            let stage_start = Instant::now();
            let averages = plane_average_colors(
                img,
                &ws.cluster_map,
                &region,
                planes.len(),
                &params.color,
            );
            report.painted_pixels = paint_hole(
                img,
                &ws.cluster_map,
                &color_region,
                &averages,
                &params.color,
            );
            for (summary, avg) in report.planes.iter_mut().zip(&averages) {
                summary.average_color = Some(*avg);
            }
            report.timings.push("color", elapsed_ms(stage_start));
            debug!("Stage: color painted={}", report.painted_pixels);
        }

        report.outcome = InpaintOutcome::Inpainted;
        report.timings.total_ms = elapsed_ms(total_start);
        info!(
            "Inpainter: planes={} filled={} fallback={} painted={} ({:.2} ms)",
            report.planes.len(),
            report.filled_pixels,
            report.fallback_pixels,
            report.painted_pixels,
            report.timings.total_ms
        );
        Ok(report)
    }
}

/// Checks buffer sizes and intrinsics, returning the region clamped to the frame.
fn validate_frame(
    depth: &DepthImage,
    confidence: &ImageU8<'_>,
    color: Option<&RgbImage>,
    intrinsics: &CameraIntrinsics,
    region: &Region,
) -> Result<Region, InpaintError> {
    let (w, h) = (depth.w, depth.h);
    if depth.data.len() != w * h {
        return Err(InpaintError::BufferSize {
            what: "depth",
            expected: w * h,
            actual: depth.data.len(),
        });
    }
    if (confidence.w, confidence.h) != (w, h) {
        return Err(InpaintError::Dimensions {
            what: "confidence",
            expected_w: w,
            expected_h: h,
            actual_w: confidence.w,
            actual_h: confidence.h,
        });
    }
    if !confidence.is_complete() {
        return Err(InpaintError::BufferSize {
            what: "confidence",
            expected: h.saturating_sub(1) * confidence.stride + w,
            actual: confidence.data.len(),
        });
    }
    if let Some(img) = color {
        if img.w == 0 || img.h == 0 || img.data.len() != img.w * img.h {
            return Err(InpaintError::BufferSize {
                what: "color",
                expected: img.w * img.h,
                actual: img.data.len(),
            });
        }
    }
    intrinsics.validate()?;
    region.clamped(w, h).ok_or(InpaintError::InvalidRegion {
        left: region.left,
        top: region.top,
        right: region.right,
        bottom: region.bottom,
        width: w,
        height: h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Rgb;

    fn floor_frame(w: usize, h: usize) -> (DepthImage, Vec<u8>) {
        (DepthImage::filled(w, h, 2000), vec![255u8; w * h])
    }

    #[test]
    fn mismatched_confidence_is_rejected() {
        let (mut depth, conf) = floor_frame(20, 10);
        let mut inpainter = Inpainter::new(20, 10, InpaintParams::default());
        let err = inpainter
            .process(InpaintFrame {
                depth: &mut depth,
                confidence: ImageU8::packed(10, 10, &conf[..100]),
                color: None,
                intrinsics: CameraIntrinsics::new(20.0, 20.0, 10.0, 5.0),
                region: Region::new(2, 2, 4, 4),
            })
            .unwrap_err();
        assert!(matches!(err, InpaintError::Dimensions { what: "confidence", .. }));
    }

    #[test]
    fn invalid_intrinsics_are_rejected() {
        let (mut depth, conf) = floor_frame(20, 10);
        let mut inpainter = Inpainter::new(20, 10, InpaintParams::default());
        let err = inpainter
            .process(InpaintFrame {
                depth: &mut depth,
                confidence: ImageU8::packed(20, 10, &conf),
                color: None,
                intrinsics: CameraIntrinsics::new(0.0, 20.0, 10.0, 5.0),
                region: Region::new(2, 2, 4, 4),
            })
            .unwrap_err();
        assert!(matches!(err, InpaintError::InvalidIntrinsics { .. }));
    }

    #[test]
    fn inverted_region_is_rejected() {
        let (mut depth, conf) = floor_frame(20, 10);
        let mut inpainter = Inpainter::new(20, 10, InpaintParams::default());
        let err = inpainter
            .process(InpaintFrame {
                depth: &mut depth,
                confidence: ImageU8::packed(20, 10, &conf),
                color: None,
                intrinsics: CameraIntrinsics::new(20.0, 20.0, 10.0, 5.0),
                region: Region::new(5, 2, 4, 4),
            })
            .unwrap_err();
        assert!(matches!(err, InpaintError::InvalidRegion { .. }));
    }

    #[test]
    fn region_outside_frame_is_rejected_untouched() {
        let (mut depth, conf) = floor_frame(100, 100);
        depth.set(99, 99, 1000);
        let mut inpainter = Inpainter::new(100, 100, InpaintParams::default());
        let err = inpainter
            .process(InpaintFrame {
                depth: &mut depth,
                confidence: ImageU8::packed(100, 100, &conf),
                color: None,
                intrinsics: CameraIntrinsics::new(100.0, 100.0, 50.0, 50.0),
                region: Region::new(200, 200, 300, 300),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            InpaintError::InvalidRegion {
                left: 200,
                width: 100,
                ..
            }
        ));
        assert_eq!(depth.get(99, 99), 1000);
    }

    #[test]
    fn all_masked_frame_reports_no_planes() {
        let (w, h) = (30, 20);
        let mut depth = DepthImage::filled(w, h, 1500);
        let conf = vec![0u8; w * h];
        let mut color = RgbImage::filled(w, h, Rgb::new(5, 6, 7));
        let before_color = color.clone();
        let mut params = InpaintParams::default();
        params.color = crate::inpaint::ColorMapping::identity();
        let mut inpainter = Inpainter::new(w, h, params);
        let report = inpainter
            .process(InpaintFrame {
                depth: &mut depth,
                confidence: ImageU8::packed(w, h, &conf),
                color: Some(&mut color),
                intrinsics: CameraIntrinsics::new(30.0, 30.0, 15.0, 10.0),
                region: Region::new(10, 5, 15, 10),
            })
            .unwrap();
        assert_eq!(report.outcome, InpaintOutcome::NoPlanes);
        assert_eq!(report.masked_pixels, w * h);
        assert!(depth.data.iter().all(|&d| d == 1500));
        assert_eq!(color, before_color);
    }

    #[test]
    fn workspace_follows_frame_size() {
        let (mut depth, conf) = floor_frame(24, 16);
        let mut inpainter = Inpainter::new(8, 8, InpaintParams::default());
        inpainter
            .process(InpaintFrame {
                depth: &mut depth,
                confidence: ImageU8::packed(24, 16, &conf),
                color: None,
                intrinsics: CameraIntrinsics::new(20.0, 20.0, 12.0, 8.0),
                region: Region::new(8, 4, 12, 8),
            })
            .unwrap();
        assert_eq!(inpainter.workspace().width(), 24);
        assert_eq!(inpainter.workspace().cluster_map.labels.len(), 24 * 16);
    }
}

#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod camera;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod inpaint;
pub mod placement;
pub mod types;

// Stage modules – public for tools and tests, considered internals.
pub mod cluster;
pub mod mask;
pub mod normals;
pub mod plane;

// Demo tool configuration.
pub mod config;

// --- High-level re-exports -------------------------------------------------

// Main entry points: inpainter + frame + parameters.
pub use crate::error::InpaintError;
pub use crate::inpaint::{InpaintFrame, InpaintParams, Inpainter};
pub use crate::types::{Plane, Region};

// Diagnostics returned by the inpainter.
pub use crate::diagnostics::{InpaintOutcome, InpaintReport};

// Tap-to-pose resolver.
pub use crate::placement::{resolve_tap, PlacementPose, TapParams};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use depth_inpaint::prelude::*;
///
/// # fn main() -> Result<(), depth_inpaint::InpaintError> {
/// let (w, h) = (64usize, 48usize);
/// let mut depth = DepthImage::filled(w, h, 1800);
/// let conf = vec![255u8; w * h];
///
/// let mut inpainter = Inpainter::new(w, h, InpaintParams::default());
/// let report = inpainter.process(InpaintFrame {
///     depth: &mut depth,
///     confidence: ImageU8 { w, h, stride: w, data: &conf },
///     color: None,
///     intrinsics: CameraIntrinsics::new(60.0, 60.0, 32.0, 24.0),
///     region: Region::new(20, 15, 40, 30),
/// })?;
/// println!("outcome={:?} latency_ms={:.3}", report.outcome, report.timings.total_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::camera::{CameraIntrinsics, CameraPose};
    pub use crate::image::{DepthImage, ImageU8, Rgb, RgbImage};
    pub use crate::{
        resolve_tap, InpaintFrame, InpaintOutcome, InpaintParams, InpaintReport, Inpainter,
        PlacementPose, Region, TapParams,
    };
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    // Stage runners.
    pub use crate::cluster::{build_histogram_into, cluster_histogram, ClusterResult};
    pub use crate::inpaint::color::{paint_hole, plane_average_colors};
    pub use crate::inpaint::depth::{fill_depth, select_plane};
    pub use crate::mask::{build_mask, build_mask_into};
    pub use crate::normals::{build_normal_map_into, depth_gradient, estimate_normal};
    pub use crate::plane::fit_planes;

    // Stage buffers and parameters.
    pub use crate::cluster::{Cluster, ClusterMap, ClusterParams, OrientationHistogram};
    pub use crate::inpaint::{ColorMapping, DepthFillParams, DepthFillStats, InpaintWorkspace};
    pub use crate::mask::Mask;
    pub use crate::normals::{NormalMap, NormalParams};
    pub use crate::plane::{FittedPlane, MomentAccumulator, PlaneParams};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        ClusterSummary, InputDescriptor, PlaneSummary, StageTiming, TimingBreakdown,
    };
}

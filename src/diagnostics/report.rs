use super::TimingBreakdown;
use crate::camera::CameraIntrinsics;
use crate::cluster::Cluster;
use crate::image::Rgb;
use crate::plane::FittedPlane;
use crate::types::Region;
use serde::Serialize;

/// Whether the frame was inpainted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InpaintOutcome {
    /// At least one plane was fitted and the hole was filled.
    Inpainted,
    /// No plane candidates were found; depth and color are untouched.
    NoPlanes,
}

/// Result of [`Inpainter::process`](crate::Inpainter::process).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InpaintReport {
    pub outcome: InpaintOutcome,
    pub input: InputDescriptor,
    pub masked_pixels: usize,
    pub defined_normals: usize,
    pub candidate_bins: usize,
    pub core_bins: usize,
    pub clusters: Vec<ClusterSummary>,
    pub planes: Vec<PlaneSummary>,
    pub filled_pixels: usize,
    pub fallback_pixels: usize,
    pub assigned_pixels: usize,
    pub painted_pixels: usize,
    pub timings: TimingBreakdown,
}

impl InpaintReport {
    pub(crate) fn new(input: InputDescriptor) -> Self {
        Self {
            outcome: InpaintOutcome::NoPlanes,
            input,
            masked_pixels: 0,
            defined_normals: 0,
            candidate_bins: 0,
            core_bins: 0,
            clusters: Vec::new(),
            planes: Vec::new(),
            filled_pixels: 0,
            fallback_pixels: 0,
            assigned_pixels: 0,
            painted_pixels: 0,
            timings: TimingBreakdown::default(),
        }
    }

    pub fn inpainted(&self) -> bool {
        self.outcome == InpaintOutcome::Inpainted
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_size: Option<[usize; 2]>,
    pub region: Region,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_region: Option<Region>,
    pub intrinsics: CameraIntrinsics,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub bins: Vec<usize>,
    pub cores: Vec<usize>,
    pub population: i64,
}

impl From<&Cluster> for ClusterSummary {
    fn from(c: &Cluster) -> Self {
        Self {
            bins: c.bins.clone(),
            cores: c.cores.clone(),
            population: c.population,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneSummary {
    pub cluster: usize,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub support: usize,
    pub centroid: [f64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_color: Option<Rgb>,
}

impl From<&FittedPlane> for PlaneSummary {
    fn from(p: &FittedPlane) -> Self {
        Self {
            cluster: p.cluster,
            a: p.plane.a,
            b: p.plane.b,
            c: p.plane.c,
            support: p.support,
            centroid: [p.centroid.x, p.centroid.y, p.centroid.z],
            average_color: None,
        }
    }
}

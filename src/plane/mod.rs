//! Least-squares plane fitting per orientation cluster.
mod accumulator;

pub use accumulator::MomentAccumulator;

use crate::camera::CameraIntrinsics;
use crate::cluster::{find_cluster, Cluster, ClusterMap};
use crate::image::DepthImage;
use crate::mask::Mask;
use crate::types::{Plane, Region};
use log::{debug, warn};
use nalgebra::Vector3;
use serde::Deserialize;

/// Parameters for plane fitting.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaneParams {
    /// Pixels within this margin of the region are left out of the fit.
    pub region_expand: usize,
    /// Minimum number of supporting pixels for a plane to be kept.
    pub min_support: usize,
}

impl Default for PlaneParams {
    fn default() -> Self {
        Self {
            region_expand: 4,
            min_support: 3,
        }
    }
}

/// A plane fitted to one cluster.
#[derive(Clone, Debug)]
pub struct FittedPlane {
    pub plane: Plane,
    /// Index of the source cluster.
    pub cluster: usize,
    /// Number of pixels contributing to the fit.
    pub support: usize,
    /// Mean of the supporting camera-space points.
    pub centroid: Vector3<f64>,
}

/// Fits one plane per cluster from non-masked pixels outside the dilated region.
///
/// Clusters with too little support or a degenerate spread produce no plane,
/// so the returned list may be shorter than `clusters`.
pub fn fit_planes(
    clusters: &[Cluster],
    depth: &DepthImage,
    mask: &Mask,
    cluster_map: &ClusterMap,
    region: &Region,
    intrinsics: &CameraIntrinsics,
    params: &PlaneParams,
) -> Vec<FittedPlane> {
    if clusters.is_empty() {
        return Vec::new();
    }
    let mut accumulators = vec![MomentAccumulator::default(); clusters.len()];
    let excluded = region.dilated(params.region_expand, depth.w, depth.h);

    for y in 0..depth.h {
        for x in 0..depth.w {
            if excluded.contains(x, y) {
                continue;
            }
            let idx = depth.idx(x, y);
            if mask.is_excluded(idx) {
                continue;
            }
            let Some(bin) = cluster_map.get(idx) else {
                continue;
            };
            let Some(cluster) = find_cluster(clusters, bin) else {
                continue;
            };
            let d = depth.data[idx];
            if d <= 0 {
                continue;
            }
            let p = intrinsics.back_project(x as f64, y as f64, d as f64);
            accumulators[cluster].push(&p);
        }
    }

    let mut planes = Vec::with_capacity(clusters.len());
    for (cluster, acc) in accumulators.iter().enumerate() {
        if acc.len() < params.min_support.max(1) {
            warn!(
                "Plane fit: cluster {} skipped, support {} below {}",
                cluster,
                acc.len(),
                params.min_support
            );
            continue;
        }
        let (Some(plane), Some(centroid)) = (acc.solve(), acc.centroid()) else {
            warn!(
                "Plane fit: cluster {} skipped, degenerate spread over {} px",
                cluster,
                acc.len()
            );
            continue;
        };
        debug!(
            "Plane fit: cluster {} a={:.2} b={:.4} c={:.4} support={}",
            cluster,
            plane.a,
            plane.b,
            plane.c,
            acc.len()
        );
        planes.push(FittedPlane {
            plane,
            cluster,
            support: acc.len(),
            centroid,
        });
    }
    planes
}

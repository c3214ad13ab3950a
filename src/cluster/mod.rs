//! Orientation clustering of surface normals.
//!
//! Normals are binned into a (θ, φ) histogram, dense bins become cores that
//! absorb their dense neighbours, and cores close in bin space are merged
//! into clusters. Each cluster is the sorted list of histogram bins that
//! describe one dominant planar orientation.
pub mod cores;
pub mod histogram;
pub mod merge;

pub use histogram::{build_histogram_into, OrientationHistogram};

use log::debug;
use serde::Deserialize;

/// Parameters for the orientation clusterer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClusterParams {
    /// Number of histogram slices along θ.
    pub theta_slices: usize,
    /// Number of histogram slices along φ.
    pub phi_slices: usize,
    /// Half-width of the square neighbourhood absorbed by a core, in bins.
    pub core_point_radius: usize,
    /// Minimum count for a bin to be absorbed into a core.
    pub frequency_threshold: i32,
    /// Cores closer than this (Euclidean, in bins) are merged.
    pub core_point_dist: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            theta_slices: 36,
            phi_slices: 18,
            core_point_radius: 2,
            frequency_threshold: 30,
            core_point_dist: 4,
        }
    }
}

/// Merged group of histogram bins representing one physical plane.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cluster {
    /// Member bins, sorted ascending.
    pub bins: Vec<usize>,
    /// Core bins merged into this cluster, sorted ascending.
    pub cores: Vec<usize>,
    /// Number of pixels whose normal fell into a member bin.
    pub population: i64,
}

impl Cluster {
    #[inline]
    pub fn contains(&self, bin: usize) -> bool {
        self.bins.binary_search(&bin).is_ok()
    }
}

/// Index of the cluster owning `bin`, if any.
pub fn find_cluster(clusters: &[Cluster], bin: usize) -> Option<usize> {
    clusters.iter().position(|c| c.contains(bin))
}

/// Per-pixel label buffer.
///
/// After histogram construction a label is the pixel's histogram bin; after
/// depth filling it is the index of the selected plane. `-1` means none.
#[derive(Clone, Debug)]
pub struct ClusterMap {
    pub w: usize,
    pub h: usize,
    pub labels: Vec<i32>,
}

impl ClusterMap {
    pub const NONE: i32 = -1;

    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            labels: vec![Self::NONE; w * h],
        }
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<usize> {
        let label = self.labels[idx];
        (label >= 0).then_some(label as usize)
    }

    #[inline]
    pub fn get_xy(&self, x: usize, y: usize) -> Option<usize> {
        self.get(y * self.w + x)
    }

    #[inline]
    pub fn set(&mut self, idx: usize, label: Option<usize>) {
        self.labels[idx] = label.map_or(Self::NONE, |l| l as i32);
    }

    pub fn clear(&mut self) {
        self.labels.fill(Self::NONE);
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.labels.clear();
        self.labels.resize(w * h, Self::NONE);
    }

    pub fn assigned_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l >= 0).count()
    }
}

/// Result of clustering a populated histogram.
#[derive(Clone, Debug, Default)]
pub struct ClusterResult {
    pub candidate_count: usize,
    pub cores: Vec<cores::Core>,
    pub clusters: Vec<Cluster>,
}

/// Runs candidate ranking, core expansion and merging on `hist`.
///
/// Consumes the counts of every absorbed bin.
pub fn cluster_histogram(hist: &mut OrientationHistogram, params: &ClusterParams) -> ClusterResult {
    let candidates = cores::rank_candidates(hist, params.frequency_threshold);
    let expanded = cores::expand_cores(
        hist,
        &candidates,
        params.core_point_radius,
        params.frequency_threshold,
    );
    let clusters = merge::merge_cores(&expanded, hist.theta_slices(), params.core_point_dist);
    debug!(
        "Clusterer: candidates={} cores={} clusters={}",
        candidates.len(),
        expanded.len(),
        clusters.len()
    );
    ClusterResult {
        candidate_count: candidates.len(),
        cores: expanded,
        clusters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Mask;
    use crate::normals::NormalMap;
    use nalgebra::Vector3;

    fn two_orientation_normals(w: usize, h: usize) -> NormalMap {
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let mut normals = NormalMap::new(w, h);
        for y in 0..h {
            for x in 0..w {
                normals.data[y * w + x] = if x < w / 2 {
                    Vector3::new(s, 0.0, -s)
                } else {
                    Vector3::new(-s, 0.0, -s)
                };
            }
        }
        normals
    }

    #[test]
    fn two_perpendicular_orientations_give_two_clusters() {
        let (w, h) = (40, 20);
        let params = ClusterParams::default();
        let normals = two_orientation_normals(w, h);
        let mask = Mask::new(w, h);
        let mut hist = OrientationHistogram::new(params.theta_slices, params.phi_slices);
        let mut map = ClusterMap::new(w, h);
        build_histogram_into(&mut hist, &mut map, &normals, &mask);

        let left_bin = map.get_xy(0, 0).unwrap();
        let right_bin = map.get_xy(w - 1, 0).unwrap();
        assert_ne!(left_bin, right_bin);

        let result = cluster_histogram(&mut hist, &params);
        assert_eq!(result.clusters.len(), 2);
        assert_eq!(find_cluster(&result.clusters, left_bin), Some(0));
        assert_eq!(find_cluster(&result.clusters, right_bin), Some(1));
        for cluster in &result.clusters {
            assert_eq!(cluster.population, (w * h / 2) as i64);
            assert_eq!(cluster.bins.len(), 1);
        }
    }

    #[test]
    fn masked_pixels_are_not_binned() {
        let (w, h) = (8, 8);
        let normals = two_orientation_normals(w, h);
        let mut mask = Mask::new(w, h);
        mask.data[3] = true;
        let mut hist = OrientationHistogram::new(36, 18);
        let mut map = ClusterMap::new(w, h);
        build_histogram_into(&mut hist, &mut map, &normals, &mask);
        assert_eq!(map.get(3), None);
        assert_eq!(map.assigned_count(), w * h - 1);
        let total: i32 = hist.counts().iter().skip(1).sum();
        assert_eq!(total, (w * h - 1) as i32);
    }

    #[test]
    fn sparse_histogram_yields_no_clusters() {
        let (w, h) = (4, 4);
        let normals = two_orientation_normals(w, h);
        let mut hist = OrientationHistogram::new(36, 18);
        let mut map = ClusterMap::new(w, h);
        build_histogram_into(&mut hist, &mut map, &normals, &Mask::new(w, h));
        let result = cluster_histogram(&mut hist, &ClusterParams::default());
        assert_eq!(result.candidate_count, 0);
        assert!(result.clusters.is_empty());
    }
}

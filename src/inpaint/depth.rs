//! Nearest accepted plane per pixel and depth filling inside the hole.
use super::params::DepthFillParams;
use crate::camera::CameraIntrinsics;
use crate::cluster::ClusterMap;
use crate::image::DepthImage;
use crate::types::{Plane, Region};

/// Counters produced by [`fill_depth`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepthFillStats {
    /// Region pixels that received a plane depth.
    pub filled: usize,
    /// Region pixels that fell back to the far depth.
    pub fallback: usize,
    /// Pixels anywhere in the frame with a selected plane.
    pub assigned: usize,
}

/// Nearest plane at pixel `(x, y)` that does not predict a depth more than
/// `error_margin` nearer than `observed`, with its predicted depth.
#[inline]
pub fn select_plane(
    planes: &[Plane],
    intrinsics: &CameraIntrinsics,
    x: usize,
    y: usize,
    observed: f64,
    error_margin: f64,
) -> Option<(usize, f64)> {
    let floor = observed - error_margin;
    let mut best: Option<(usize, f64)> = None;
    for (i, plane) in planes.iter().enumerate() {
        let Some(z) = plane.depth_at_pixel(intrinsics, x as f64, y as f64) else {
            continue;
        };
        if z > floor && best.map_or(true, |(_, bz)| z < bz) {
            best = Some((i, z));
        }
    }
    best
}

/// Labels every pixel of `cluster_map` with its selected plane (or none) and
/// overwrites the depth of region pixels.
///
/// Pixels outside `region` keep their depth. Region pixels with no accepted
/// plane receive `params.far_depth_mm`.
pub fn fill_depth(
    depth: &mut DepthImage,
    cluster_map: &mut ClusterMap,
    planes: &[Plane],
    region: &Region,
    intrinsics: &CameraIntrinsics,
    params: &DepthFillParams,
) -> DepthFillStats {
    let margin = params.error_margin_mm as f64;
    let mut stats = DepthFillStats::default();
    for y in 0..depth.h {
        for x in 0..depth.w {
            let idx = depth.idx(x, y);
            let observed = depth.data[idx] as f64;
            let choice = select_plane(planes, intrinsics, x, y, observed, margin);
            cluster_map.set(idx, choice.map(|(i, _)| i));
            if choice.is_some() {
                stats.assigned += 1;
            }
            if !region.contains(x, y) {
                continue;
            }
            match choice {
                Some((_, z)) => {
                    depth.data[idx] = z.round().min(i16::MAX as f64) as i16;
                    stats.filled += 1;
                }
                None => {
                    depth.data[idx] = params.far_depth_mm;
                    stats.fallback += 1;
                }
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageViewMut;

    fn intr() -> CameraIntrinsics {
        CameraIntrinsics::new(50.0, 50.0, 20.0, 15.0)
    }

    #[test]
    fn hole_is_filled_from_background_plane() {
        let (w, h) = (40, 30);
        let mut depth = DepthImage::filled(w, h, 2000);
        let region = Region::new(15, 10, 24, 19);
        depth.fill_region(&region, 1200);
        let mut map = ClusterMap::new(w, h);
        let planes = [Plane::new(2000.0, 0.0, 0.0)];
        let stats = fill_depth(
            &mut depth,
            &mut map,
            &planes,
            &region,
            &intr(),
            &DepthFillParams::default(),
        );
        assert_eq!(stats.filled, region.width() * region.height());
        assert_eq!(stats.fallback, 0);
        assert_eq!(stats.assigned, w * h);
        assert!(depth.data.iter().all(|&d| d == 2000));
    }

    #[test]
    fn foreground_piercing_plane_is_rejected() {
        // The near plane lies 500 mm in front of the observed surface.
        let planes = [Plane::new(1500.0, 0.0, 0.0), Plane::new(2100.0, 0.0, 0.0)];
        let choice = select_plane(&planes, &intr(), 3, 4, 2000.0, 300.0);
        assert_eq!(choice.map(|(i, _)| i), Some(1));
        let choice = select_plane(&planes, &intr(), 3, 4, 1700.0, 300.0);
        assert_eq!(choice.map(|(i, _)| i), Some(0));
    }

    #[test]
    fn no_accepted_plane_falls_back_to_far_depth() {
        let (w, h) = (10, 10);
        let mut depth = DepthImage::filled(w, h, 5000);
        let mut map = ClusterMap::new(w, h);
        let region = Region::new(2, 2, 3, 3);
        let stats = fill_depth(
            &mut depth,
            &mut map,
            &[Plane::new(1000.0, 0.0, 0.0)],
            &region,
            &intr(),
            &DepthFillParams::default(),
        );
        assert_eq!(stats.fallback, 4);
        assert_eq!(depth.get(2, 2), 8000);
        assert_eq!(depth.get(0, 0), 5000);
        assert_eq!(map.get_xy(0, 0), None);
    }

    #[test]
    fn refilling_is_idempotent() {
        let (w, h) = (40, 30);
        let intr = intr();
        let tilted = Plane::new(2400.0, 0.1, -0.15);
        let mut depth = DepthImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let z = tilted.depth_at_pixel(&intr, x as f64, y as f64).unwrap();
                depth.set(x, y, z.round() as i16);
            }
        }
        let region = Region::new(10, 8, 25, 20);
        depth.fill_region(&region, 900);
        let planes = [tilted, Plane::new(6000.0, 0.0, 0.0)];
        let params = DepthFillParams::default();
        let mut map = ClusterMap::new(w, h);
        fill_depth(&mut depth, &mut map, &planes, &region, &intr, &params);
        let first = depth.clone();
        let first_labels = map.labels.clone();
        fill_depth(&mut depth, &mut map, &planes, &region, &intr, &params);
        assert_eq!(depth, first);
        assert_eq!(map.labels, first_labels);
    }
}

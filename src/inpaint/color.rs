//! Per-plane average color and hole painting.
use super::params::ColorMapping;
use crate::cluster::ClusterMap;
use crate::image::{Rgb, RgbImage};
use crate::types::Region;

/// Average color of every plane over depth pixels outside `region`.
///
/// Each labelled depth pixel samples its nearest color pixel. Planes without
/// samples default to white.
pub fn plane_average_colors(
    color: &RgbImage,
    cluster_map: &ClusterMap,
    region: &Region,
    plane_count: usize,
    mapping: &ColorMapping,
) -> Vec<Rgb> {
    let mut sums = vec![[0u64; 3]; plane_count];
    let mut counts = vec![0u64; plane_count];
    for y in 0..cluster_map.h {
        for x in 0..cluster_map.w {
            if region.contains(x, y) {
                continue;
            }
            let Some(plane) = cluster_map.get_xy(x, y) else {
                continue;
            };
            if plane >= plane_count {
                continue;
            }
            let (cx, cy) = mapping.depth_to_color(x, y, color.w, color.h);
            let px = color.get(cx, cy);
            let sum = &mut sums[plane];
            sum[0] += px.r as u64;
            sum[1] += px.g as u64;
            sum[2] += px.b as u64;
            counts[plane] += 1;
        }
    }
    sums.iter()
        .zip(&counts)
        .map(|(sum, &n)| {
            if n == 0 {
                Rgb::WHITE
            } else {
                Rgb::new((sum[0] / n) as u8, (sum[1] / n) as u8, (sum[2] / n) as u8)
            }
        })
        .collect()
}

/// Paints every color pixel of `color_region` with the average color of the
/// plane assigned to its nearest depth pixel, or white when unassigned.
///
/// Returns the number of painted pixels.
pub fn paint_hole(
    color: &mut RgbImage,
    cluster_map: &ClusterMap,
    color_region: &Region,
    averages: &[Rgb],
    mapping: &ColorMapping,
) -> usize {
    let Some(region) = color_region.clamped(color.w, color.h) else {
        return 0;
    };
    let mut painted = 0;
    for y in region.top..=region.bottom {
        for x in region.left..=region.right {
            let (dx, dy) = mapping.color_to_depth(x, y, cluster_map.w, cluster_map.h);
            let px = cluster_map
                .get_xy(dx, dy)
                .and_then(|plane| averages.get(plane).copied())
                .unwrap_or(Rgb::WHITE);
            color.set(x, y, px);
            painted += 1;
        }
    }
    painted
}

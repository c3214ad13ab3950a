//! Connected-component merge of nearby cores.
use super::cores::Core;
use super::Cluster;

/// Groups cores whose bin coordinates lie closer than `core_point_dist`.
///
/// Components are discovered in core order, so the first cluster is the one
/// containing the densest core.
pub fn merge_cores(cores: &[Core], theta_slices: usize, core_point_dist: usize) -> Vec<Cluster> {
    let theta_slices = theta_slices.max(1);
    let dist_sq = (core_point_dist * core_point_dist) as i64;
    let coords: Vec<(i64, i64)> = cores
        .iter()
        .map(|c| ((c.bin % theta_slices) as i64, (c.bin / theta_slices) as i64))
        .collect();
    let adjacent = |a: usize, b: usize| {
        let dt = coords[a].0 - coords[b].0;
        let dp = coords[a].1 - coords[b].1;
        dt * dt + dp * dp < dist_sq
    };

    let mut visited = vec![false; cores.len()];
    let mut stack = Vec::new();
    let mut clusters = Vec::new();

    for seed in 0..cores.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        stack.push(seed);
        let mut cluster = Cluster::default();
        while let Some(i) = stack.pop() {
            let core = &cores[i];
            cluster.cores.push(core.bin);
            cluster.bins.extend_from_slice(&core.members);
            cluster.population += core.population;
            for j in 0..cores.len() {
                if !visited[j] && adjacent(i, j) {
                    visited[j] = true;
                    stack.push(j);
                }
            }
        }
        cluster.bins.sort_unstable();
        cluster.cores.sort_unstable();
        clusters.push(cluster);
    }
    clusters
}

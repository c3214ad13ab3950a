//! Core-bin ranking and neighbourhood expansion.
use super::histogram::OrientationHistogram;

/// A dense histogram bin together with the neighbouring bins it absorbed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Core {
    pub bin: usize,
    /// Absorbed bins in scan order; always contains `bin` itself.
    pub members: Vec<usize>,
    /// Sum of the absorbed bin counts at the time of expansion.
    pub population: i64,
}

/// Bins whose count exceeds `frequency_threshold + 2`, highest count first.
///
/// Ties are broken toward the lower bin index. The sink bin 0 is never a
/// candidate.
pub fn rank_candidates(hist: &OrientationHistogram, frequency_threshold: i32) -> Vec<usize> {
    let cutoff = frequency_threshold.saturating_add(2);
    let mut candidates: Vec<usize> = hist
        .counts()
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(_, &count)| count > cutoff)
        .map(|(bin, _)| bin)
        .collect();
    // Stable sort keeps ascending bin order among equal counts.
    candidates.sort_by(|&a, &b| hist.count(b).cmp(&hist.count(a)));
    candidates
}

/// Expands candidates in rank order, consuming every neighbour bin within a
/// square of `radius` whose count reaches `frequency_threshold`.
///
/// Consumed bins are zeroed in `hist`, so a later candidate that was already
/// absorbed is skipped.
pub fn expand_cores(
    hist: &mut OrientationHistogram,
    candidates: &[usize],
    radius: usize,
    frequency_threshold: i32,
) -> Vec<Core> {
    let theta_slices = hist.theta_slices();
    let phi_slices = hist.phi_slices();
    let mut cores = Vec::new();

    for &bin in candidates {
        if hist.count(bin) == 0 {
            continue;
        }
        let (t0, p0) = hist.coords(bin);
        let t_lo = t0.saturating_sub(radius);
        let t_hi = (t0 + radius).min(theta_slices - 1);
        let p_lo = p0.saturating_sub(radius);
        let p_hi = (p0 + radius).min(phi_slices - 1);

        let mut members = Vec::new();
        let mut population = 0i64;
        for p in p_lo..=p_hi {
            for t in t_lo..=t_hi {
                let neighbour = hist.bin_at(t, p);
                if neighbour == 0 || hist.count(neighbour) < frequency_threshold {
                    continue;
                }
                population += hist.take(neighbour) as i64;
                members.push(neighbour);
            }
        }
        if members.is_empty() {
            continue;
        }
        cores.push(Core {
            bin,
            members,
            population,
        });
    }
    cores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist_with(counts: &[(usize, i32)]) -> OrientationHistogram {
        let mut hist = OrientationHistogram::new(10, 10);
        for &(bin, count) in counts {
            for _ in 0..count {
                hist.increment(bin);
            }
        }
        hist
    }

    #[test]
    fn candidates_ranked_by_count_then_index() {
        let hist = hist_with(&[(40, 50), (12, 80), (7, 50), (90, 32), (91, 33)]);
        let ranked = rank_candidates(&hist, 30);
        assert_eq!(ranked, vec![12, 7, 40, 91]);
    }

    #[test]
    fn expansion_consumes_neighbours() {
        let mut hist = hist_with(&[(55, 100), (56, 40), (66, 31), (77, 60), (57, 10)]);
        let ranked = rank_candidates(&hist, 30);
        assert_eq!(ranked, vec![55, 77, 56]);
        let cores = expand_cores(&mut hist, &ranked, 2, 30);
        assert_eq!(cores.len(), 1);
        let core = &cores[0];
        assert_eq!(core.bin, 55);
        assert_eq!(core.members, vec![55, 56, 66, 77]);
        assert_eq!(core.population, 100 + 40 + 31 + 60);
        assert_eq!(hist.count(57), 10);
        assert_eq!(hist.count(56), 0);
    }

    #[test]
    fn neighbourhood_clipped_at_edges() {
        let mut hist = hist_with(&[(99, 40), (9, 40)]);
        let ranked = rank_candidates(&hist, 30);
        let cores = expand_cores(&mut hist, &ranked, 3, 30);
        assert_eq!(cores.len(), 2);
        assert_eq!(cores[0].members, vec![9]);
        assert_eq!(cores[1].members, vec![99]);
    }

    #[test]
    fn sink_bin_never_ranked() {
        let mut hist = OrientationHistogram::new(4, 4);
        for _ in 0..200 {
            hist.increment(0);
        }
        assert!(rank_candidates(&hist, 30).is_empty());
    }
}

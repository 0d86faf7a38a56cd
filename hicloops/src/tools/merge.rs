use anyhow::ensure;
use itertools::Itertools;
use log::{
    debug,
    info,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::spatial::GridIndex;
use crate::data_structs::typedef::PosType;
use crate::data_structs::{
    LoopCall,
    LoopSet,
    MergedLoopSet,
};
use crate::with_field_fn;

/// Greedy cross-resolution deduplication of loop calls.
///
/// Tiers are visited from the finest to the coarsest resolution. The finest
/// tier is accepted in full. Every later candidate is accepted only if no
/// already accepted call has its centroid within `tolerance` bp (Euclidean,
/// inclusive), so a coarse call never replaces a finer one. The spatial
/// index is rebuilt from all accepted calls before each tier, which lets
/// accepted coarse calls suppress duplicates in even coarser tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionMerger {
    /// Maximum centroid distance (bp) at which two calls are duplicates
    pub tolerance: PosType,
}

impl Default for ResolutionMerger {
    fn default() -> Self {
        Self { tolerance: 20_000 }
    }
}

impl ResolutionMerger {
    with_field_fn!(tolerance, PosType);

    pub fn new(tolerance: PosType) -> Self {
        Self { tolerance }
    }

    /// Merges per-resolution loop sets into one [`MergedLoopSet`].
    ///
    /// Input order does not matter; tiers are sorted by resolution (stable
    /// for equal resolutions). All non-empty tiers must belong to the same
    /// chromosome.
    pub fn merge(
        &self,
        mut tiers: Vec<LoopSet>,
    ) -> anyhow::Result<MergedLoopSet> {
        let chr = tiers
            .iter()
            .find(|t| !t.is_empty())
            .map(|t| t.chr().to_owned())
            .unwrap_or_default();
        let other_chrs = tiers
            .iter()
            .filter(|t| !t.is_empty() && t.chr() != chr)
            .map(|t| t.chr())
            .unique()
            .collect_vec();
        ensure!(
            other_chrs.is_empty(),
            "All loop sets must belong to one chromosome, found {} and {}",
            chr,
            other_chrs.join(", ")
        );

        tiers.sort_by_key(LoopSet::resolution);

        let tolerance = self.tolerance as f64;
        let cell_size = tolerance.max(1.0);
        let mut accepted: Vec<LoopCall> = Vec::new();

        for (i, tier) in tiers.into_iter().enumerate() {
            let resolution = tier.resolution();
            if i == 0 {
                info!(
                    "Base loops (from {}bp): {}",
                    resolution,
                    tier.len()
                );
                accepted.extend(
                    tier.into_loops()
                        .into_iter()
                        .map(|l| l.with_provenance(resolution)),
                );
                continue;
            }
            if tier.is_empty() {
                debug!("No loops at {}bp", resolution);
                continue;
            }

            let index =
                GridIndex::from_points(cell_size, accepted.iter().map(LoopCall::centroid))?;
            let n_candidates = tier.len();
            let unique = tier
                .into_loops()
                .into_iter()
                .filter(|call| {
                    index
                        .nearest_within(call.centroid(), tolerance)
                        .is_none()
                })
                .map(|call| call.with_provenance(resolution))
                .collect_vec();

            info!(
                "Adding {} of {} loops from {}bp",
                unique.len(),
                n_candidates,
                resolution
            );
            accepted.extend(unique);
        }

        info!("Total merged loops: {}", accepted.len());
        Ok(MergedLoopSet::new(chr, accepted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(
        resolution: u64,
        anchors: &[(u32, u32)],
    ) -> LoopSet {
        LoopSet::new(
            "chr1",
            resolution,
            anchors
                .iter()
                .map(|(a, b)| LoopCall::new(*a, *b, 1.0, resolution))
                .collect(),
        )
    }

    #[test]
    fn test_coarse_duplicate_excluded_and_unique_included() {
        let fine = set(5000, &[(20, 40)]);
        let coarse = set(10_000, &[(10, 20), (50, 90)]);
        let merged = ResolutionMerger::new(20_000).merge(vec![coarse, fine]).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.loops()[0].provenance(), Some(5000));
        assert_eq!(merged.loops()[0].anchor1(), 20);
        assert_eq!(merged.loops()[1].provenance(), Some(10_000));
        assert_eq!(merged.loops()[1].anchor1(), 50);
    }

    #[test]
    fn test_tolerance_boundary_excludes() {
        // centroids (15000, 55000) and (15000, 75000) are exactly 20kb apart
        let fine = set(10_000, &[(1, 5)]);
        let coarse = set(30_000, &[(0, 2), (0, 3)]);
        let merged = ResolutionMerger::new(20_000).merge(vec![fine, coarse]).unwrap();
        let anchors = merged
            .iter()
            .map(|l| (l.resolution(), l.anchor2()))
            .collect_vec();
        assert_eq!(anchors, vec![(30_000, 3), (10_000, 5)]);
    }

    #[test]
    fn test_accepted_coarse_loops_suppress_coarser() {
        let merged = ResolutionMerger::default()
            .merge(vec![
                set(25_000, &[(4, 8), (40, 80)]),
                set(5000, &[(100, 200)]),
                set(10_000, &[(10, 20)]),
            ])
            .unwrap();
        assert_eq!(merged.provenance_counts(), vec![
            (5000, 1),
            (10_000, 1),
            (25_000, 1)
        ]);
        assert!(merged
            .iter()
            .all(|l| !(l.resolution() == 25_000 && l.anchor1() == 4)));
    }

    #[test]
    fn test_same_tier_candidates_do_not_suppress_each_other() {
        let merged = ResolutionMerger::default()
            .merge(vec![set(5000, &[]), set(10_000, &[(10, 20), (10, 21)])])
            .unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.chr(), "chr1");
    }

    #[test]
    fn test_single_tier_is_unchanged() {
        let tier = set(5000, &[(30, 60), (10, 20), (10, 15)]);
        let merged = ResolutionMerger::default().merge(vec![tier.clone()]).unwrap();
        assert_eq!(merged.len(), tier.len());
        for (m, t) in merged.iter().zip(tier.iter()) {
            assert_eq!(m.clone(), t.clone().with_provenance(5000));
        }
    }

    #[test]
    fn test_empty_inputs() {
        let merged = ResolutionMerger::default().merge(vec![]).unwrap();
        assert!(merged.is_empty());

        let merged = ResolutionMerger::default()
            .merge(vec![
                LoopSet::empty("chr1", 5000),
                LoopSet::empty("chr1", 10_000),
            ])
            .unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_mixed_chromosomes_rejected() {
        let a = set(5000, &[(1, 10)]);
        let b = LoopSet::new("chr2", 10_000, vec![LoopCall::new(1, 10, 1.0, 10_000)]);
        assert!(ResolutionMerger::default().merge(vec![a, b]).is_err());
    }
}

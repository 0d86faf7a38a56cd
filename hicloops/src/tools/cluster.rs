use itertools::Itertools;
use log::{
    debug,
    info,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::dbscan::{
    self,
    Classification,
};
use crate::data_structs::typedef::{
    BinIdx,
    ResType,
    ScoreType,
};
use crate::data_structs::{
    InteractionRecord,
    LoopCall,
};
use crate::utils::truncated_mean;
use crate::with_field_fn;

/// Reduces significant bin pairs to one [`LoopCall`] per DBSCAN cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityClusterer {
    /// Neighbourhood radius in bins (Euclidean, inclusive)
    pub eps:         f64,
    /// Minimum neighbourhood size (point itself included) of a core point
    pub min_samples: usize,
}

impl Default for DensityClusterer {
    fn default() -> Self {
        Self {
            eps:         2.0,
            min_samples: 3,
        }
    }
}

#[derive(Debug, Default)]
struct ClusterAcc {
    bin1:  Vec<u64>,
    bin2:  Vec<u64>,
    score: Option<ScoreType>,
}

impl ClusterAcc {
    fn push(
        &mut self,
        record: &InteractionRecord,
    ) {
        self.bin1.push(u64::from(record.bin1()));
        self.bin2.push(u64::from(record.bin2()));
        self.score = Some(match self.score {
            Some(s) => s.max(record.score()),
            None => record.score(),
        });
    }

    fn finish(
        self,
        resolution: ResType,
    ) -> Option<LoopCall> {
        let anchor1 = truncated_mean(self.bin1)?;
        let anchor2 = truncated_mean(self.bin2)?;
        // Means of u32 values always fit back into u32
        Some(LoopCall::new(
            anchor1 as BinIdx,
            anchor2 as BinIdx,
            self.score?,
            resolution,
        ))
    }
}

impl DensityClusterer {
    with_field_fn!(eps, f64);
    with_field_fn!(min_samples, usize);

    pub fn new(
        eps: f64,
        min_samples: usize,
    ) -> Self {
        Self { eps, min_samples }
    }

    /// Classifies `records` as core, edge or noise points.
    pub fn classify(
        &self,
        records: &[InteractionRecord],
    ) -> anyhow::Result<Vec<Classification>> {
        let points = records
            .iter()
            .map(|r| (r.bin1(), r.bin2()))
            .collect_vec();
        dbscan::Model::new(self.eps, self.min_samples)?.run(&points)
    }

    /// Clusters `records` and returns one call per cluster, sorted by
    /// `(anchor1, anchor2)`.
    ///
    /// Anchors are the member means truncated toward zero, the score is the
    /// maximum member score. Noise points contribute nothing.
    pub fn cluster(
        &self,
        records: &[InteractionRecord],
        resolution: ResType,
    ) -> anyhow::Result<Vec<LoopCall>> {
        let labels = self.classify(records)?;

        let n_clusters = labels
            .iter()
            .filter_map(Classification::cluster)
            .max()
            .map_or(0, |id| id + 1);
        let mut clusters = (0..n_clusters)
            .map(|_| ClusterAcc::default())
            .collect_vec();
        let mut n_noise = 0usize;
        for (record, label) in records.iter().zip(labels.iter()) {
            match label.cluster() {
                Some(id) => clusters[id].push(record),
                None => n_noise += 1,
            }
        }
        debug!(
            "DBSCAN(eps={}, min_samples={}): {} clusters, {} noise points",
            self.eps,
            self.min_samples,
            clusters.len(),
            n_noise
        );

        let calls = clusters
            .into_iter()
            .filter_map(|acc| acc.finish(resolution))
            .sorted_by_key(|c| (c.anchor1(), c.anchor2()))
            .collect_vec();
        info!("Clustered {} points into {} loops", records.len(), calls.len());
        Ok(calls)
    }
}

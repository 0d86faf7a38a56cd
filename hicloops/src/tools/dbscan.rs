//! Two-dimensional DBSCAN over integer bin pairs.
//!
//! Neighbourhoods are answered by a [`GridIndex`] with cell size `eps`, so no
//! pairwise distance matrix is ever built. Clusters grow breadth-first from
//! unvisited core points in input order; neighbours are visited in ascending
//! input order, which makes border assignment deterministic.

use std::collections::VecDeque;

use anyhow::ensure;
use Classification::{
    Core,
    Edge,
    Noise,
};

use super::spatial::GridIndex;
use crate::data_structs::typedef::BinIdx;

/// Label of one bin pair after clustering, carrying its cluster id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Classification {
    /// Dense point: its `eps` neighbourhood holds `mpt` or more points
    Core(usize),
    /// Sparse point reached from a core point's neighbourhood
    Edge(usize),
    /// Sparse point outside every core neighbourhood
    Noise,
}

impl Classification {
    /// Cluster id, `None` for noise.
    pub fn cluster(&self) -> Option<usize> {
        match *self {
            Core(c) | Edge(c) => Some(c),
            Noise => None,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, Noise)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Neighbourhood radius in bins, boundary included
    pub eps: f64,
    /// Neighbourhood size, the point itself counted, that makes it core
    pub mpt: usize,
}

impl Model {
    /// Fails unless `eps` is finite and positive and `min_points` is not 0.
    pub fn new(
        eps: f64,
        min_points: usize,
    ) -> anyhow::Result<Model> {
        ensure!(
            eps.is_finite() && eps > 0.0,
            "eps must be positive and finite, got {}",
            eps
        );
        ensure!(min_points > 0, "min_points must be at least 1");
        Ok(Model {
            eps,
            mpt: min_points,
        })
    }

    /// Classifies every point of `population`. The returned vector is aligned
    /// with the input; cluster ids are assigned in discovery order starting
    /// from 0.
    pub fn run(
        &self,
        population: &[(BinIdx, BinIdx)],
    ) -> anyhow::Result<Vec<Classification>> {
        let index = GridIndex::from_points(
            self.eps,
            population.iter().map(|(x, y)| (*x as f64, *y as f64)),
        )?;

        let neighbours = |idx: usize| index.within(index.point(idx), self.eps);
        let is_core = (0..population.len())
            .map(|idx| neighbours(idx).len() >= self.mpt)
            .collect::<Vec<_>>();

        let mut labels = vec![Noise; population.len()];
        let mut visited = vec![false; population.len()];
        let mut queue = VecDeque::new();
        let mut cluster = 0;

        for idx in 0..population.len() {
            if visited[idx] || !is_core[idx] {
                continue;
            }
            visited[idx] = true;
            labels[idx] = Core(cluster);
            queue.push_back(idx);

            while let Some(current) = queue.pop_front() {
                for n_idx in neighbours(current) {
                    if visited[n_idx] {
                        continue;
                    }
                    visited[n_idx] = true;
                    if is_core[n_idx] {
                        labels[n_idx] = Core(cluster);
                        queue.push_back(n_idx);
                    }
                    else {
                        labels[n_idx] = Edge(cluster);
                    }
                }
            }
            cluster += 1;
        }
        Ok(labels)
    }
}

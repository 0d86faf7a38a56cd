#![allow(dead_code)]
use hicloops::data_structs::{
    InteractionRecord,
    LoopCall,
    LoopSet,
};

/// A dense `size x size` block of records around `(bin1, bin2)` with scores
/// increasing toward the block's last element.
pub fn dense_block(
    bin1: u32,
    bin2: u32,
    size: u32,
    base_score: f64,
) -> Vec<InteractionRecord> {
    let mut records = Vec::new();
    for i in 0..size {
        for j in 0..size {
            let score = base_score + (i * size + j) as f64 * 1e-3;
            records.push(InteractionRecord::new(bin1 + i, bin2 + j, score));
        }
    }
    records
}

pub fn loop_set(
    chr: &str,
    resolution: u64,
    anchors: &[(u32, u32)],
) -> LoopSet {
    LoopSet::new(
        chr,
        resolution,
        anchors
            .iter()
            .map(|(a, b)| LoopCall::new(*a, *b, 0.5, resolution))
            .collect(),
    )
}

pub fn centroid_dist(
    a: &LoopCall,
    b: &LoopCall,
) -> f64 {
    let (ax, ay) = a.centroid();
    let (bx, by) = b.centroid();
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

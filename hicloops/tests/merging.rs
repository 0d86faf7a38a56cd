use std::fs::File;

use hicloops::io::{
    read_tiers,
    write_loop_set_file,
    write_merged,
};
use hicloops::prelude::*;
use rstest::{
    fixture,
    rstest,
};
use tempfile::TempDir;

mod common;
use common::{
    centroid_dist,
    loop_set,
};

#[fixture]
fn tiers() -> Vec<LoopSet> {
    let fine = loop_set("chr1", 5000, &[(20, 40), (200, 400), (1000, 1300)]);
    // Near (20, 40) and (200, 400) at 5kb, plus two new loops
    let mid = loop_set("chr1", 10_000, &[(10, 20), (100, 200), (300, 420), (700, 900)]);
    // Near (300, 420) at 10kb, near (1000, 1300) at 5kb, plus one new loop
    let coarse = loop_set("chr1", 25_000, &[(120, 168), (200, 260), (2000, 2400)]);
    vec![coarse, fine, mid]
}

#[rstest]
fn test_merge_counts(tiers: Vec<LoopSet>) {
    let merged = ResolutionMerger::new(20_000).merge(tiers.clone()).unwrap();
    assert_eq!(merged.provenance_counts(), vec![
        (5000, 3),
        (10_000, 2),
        (25_000, 1)
    ]);

    let max_tier = tiers.iter().map(LoopSet::len).max().unwrap();
    let sum_tier = tiers.iter().map(LoopSet::len).sum::<usize>();
    assert!(max_tier <= merged.len() && merged.len() <= sum_tier);
}

#[rstest]
fn test_priority_invariant(tiers: Vec<LoopSet>) {
    let tolerance = 20_000u64;
    let merged = ResolutionMerger::new(tolerance).merge(tiers).unwrap();
    for a in merged.iter() {
        for b in merged.iter() {
            let (pa, pb) = (a.provenance().unwrap(), b.provenance().unwrap());
            if pa < pb {
                assert!(centroid_dist(a, b) > tolerance as f64);
            }
        }
    }
}

#[rstest]
fn test_output_is_sorted(tiers: Vec<LoopSet>) {
    let merged = ResolutionMerger::default().merge(tiers).unwrap();
    let keys = merged
        .iter()
        .map(|l| (l.x_interval().start(), l.x_interval().end()))
        .collect::<Vec<_>>();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_zero_tolerance_only_drops_identical_centroids() {
    // centroid (12500, 37500) in both tiers
    let a = loop_set("chr1", 5000, &[(2, 7)]);
    let b = loop_set("chr1", 25_000, &[(0, 1), (0, 2)]);
    let merged = ResolutionMerger::new(0).merge(vec![a, b]).unwrap();
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_merge_from_files() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let fine_path = dir.path().join("chr1.5k.bedpe");
    let coarse_path = dir.path().join("chr1.10k.bedpe");
    let empty_path = dir.path().join("chr1.2k.bedpe");

    write_loop_set_file(&fine_path, &loop_set("chr1", 5000, &[(20, 40)]))?;
    write_loop_set_file(
        &coarse_path,
        &loop_set("chr1", 10_000, &[(10, 20), (50, 90)]),
    )?;
    write_loop_set_file(&empty_path, &LoopSet::empty("chr1", 2000))?;

    let tiers = read_tiers(&[&coarse_path, &fine_path, &empty_path], &[10_000, 5000, 2000])?;
    assert_eq!(tiers.iter().map(LoopSet::len).collect::<Vec<_>>(), vec![2, 1, 0]);

    let merged = ResolutionMerger::new(20_000).merge(tiers)?;
    let out_path = dir.path().join("merged.bedpe");
    write_merged(File::create(&out_path)?, &merged)?;

    let text = std::fs::read_to_string(&out_path)?;
    assert_eq!(
        text,
        "#chr1\tx1\tx2\tchr2\ty1\ty2\tname\tscore\tcolor\tsource_res\n\
         chr1\t100000\t105000\tchr1\t200000\t205000\t.\t0.5\t0,0,0\t5000\n\
         chr1\t500000\t510000\tchr1\t900000\t910000\t.\t0.5\t0,0,0\t10000\n"
    );
    Ok(())
}

#[test]
fn test_mismatched_inputs_abort_before_reading() {
    // The files do not exist, so only the cardinality check can fail first
    let err = read_tiers(&["missing_a.bedpe", "missing_b.bedpe"], &[5000]).unwrap_err();
    assert!(err.to_string().contains("must match"));
}

#[test]
fn test_merge_loops_wider_than_one_bin() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let fine_path = dir.path().join("fine.bedpe");
    let coarse_path = dir.path().join("coarse.bedpe");
    std::fs::write(
        &fine_path,
        "#chr1\tx1\tx2\tchr2\ty1\ty2\tname\tscore\tcolor\n\
         chr1\t100000\t120000\tchr1\t200000\t220000\tfine_a\t0.9\t255,0,0\n",
    )?;
    // First centroid (115000, 215000) is 7071bp from (110000, 210000)
    std::fs::write(
        &coarse_path,
        "chr1\t100000\t130000\tchr1\t200000\t230000\tcoarse_a\t0.8\t0,0,255\n\
         chr1\t500000\t525000\tchr1\t900000\t925000\tcoarse_b\t0.7\t0,0,255\n",
    )?;

    let tiers = read_tiers(&[&coarse_path, &fine_path], &[25_000, 10_000])?;
    let merged = ResolutionMerger::new(20_000).merge(tiers)?;

    let mut buf = Vec::new();
    write_merged(&mut buf, &merged)?;
    assert_eq!(
        String::from_utf8(buf)?,
        "#chr1\tx1\tx2\tchr2\ty1\ty2\tname\tscore\tcolor\tsource_res\n\
         chr1\t100000\t120000\tchr1\t200000\t220000\tfine_a\t0.9\t255,0,0\t10000\n\
         chr1\t500000\t525000\tchr1\t900000\t925000\tcoarse_b\t0.7\t0,0,255\t25000\n"
    );
    Ok(())
}

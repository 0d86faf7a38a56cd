use std::io::Write;

use hicloops::io::{
    read_interactions,
    read_interactions_file,
    write_loop_set,
};
use hicloops::prelude::*;
use rstest::{
    fixture,
    rstest,
};

mod common;
use common::dense_block;

#[fixture]
fn records() -> Vec<InteractionRecord> {
    let mut records = Vec::new();
    // Diagonal noise with very high scores
    for i in 0..50 {
        records.push(InteractionRecord::new(i, i + 1, 50.0));
    }
    // Background
    for i in 0..40 {
        records.push(InteractionRecord::new(i, i + 30, 0.01 * (i % 7) as f64));
    }
    records.extend(dense_block(100, 140, 3, 0.9));
    records.extend(dense_block(10, 60, 3, 0.8));
    records.push(InteractionRecord::new(200, 260, 0.95));
    records
}

#[test]
fn test_scenario_single_record_conversion() {
    let records = vec![InteractionRecord::new(10, 20, 0.99)];
    let caller = LoopCaller::new(
        CallConfig::default()
            .with_resolution(5000)
            .with_min_dist(5)
            .with_strategy(CallStrategy::Percentile(98.0)),
    );
    let (set, _) = caller.call("chr1", &records).unwrap();
    assert_eq!(set.len(), 1);
    let call = &set.loops()[0];
    assert_eq!(call.x_interval().start(), 50_000);
    assert_eq!(call.x_interval().end(), 55_000);
    assert_eq!(call.y_interval().start(), 100_000);
    assert_eq!(call.y_interval().end(), 105_000);
}

#[test]
fn test_scenario_everything_near_diagonal() {
    let records = (0..20)
        .map(|i| InteractionRecord::new(i, i + 2, 1.0))
        .collect::<Vec<_>>();
    let caller = LoopCaller::new(CallConfig::default().with_resolution(10_000));
    let (set, summary) = caller.call("chr3", &records).unwrap();
    assert!(set.is_empty());
    assert_eq!(summary.threshold, None);

    let mut buf = Vec::new();
    write_loop_set(&mut buf, &set).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "#chr1\tx1\tx2\tchr2\ty1\ty2\tname\tscore\tcolor\n"
    );
}

#[rstest]
#[case(0.0)]
#[case(50.0)]
#[case(90.0)]
#[case(98.0)]
#[case(100.0)]
fn test_percentile_filter_invariants(
    records: Vec<InteractionRecord>,
    #[case] p: f64,
) {
    let min_dist = 5;
    let out = ScoreFilter::new(min_dist, ThresholdMode::Percentile(p))
        .apply(&records)
        .unwrap();
    let threshold = out.threshold.unwrap();
    assert!(out.records.iter().all(|r| r.distance() >= min_dist));
    assert!(out.records.iter().all(|r| r.score() >= threshold));

    // Every distance-passing record at or above the cutoff is kept
    let expected = records
        .iter()
        .filter(|r| r.distance() >= min_dist && r.score() >= threshold)
        .count();
    assert_eq!(out.records.len(), expected);

    // At least (100 - p)% of the population lies at or above the cutoff
    let min_expected = ((1.0 - p / 100.0) * out.n_distance_pass as f64).floor() as usize;
    assert!(out.records.len() >= min_expected.max(1));
}

#[rstest]
fn test_absolute_filter_invariants(records: Vec<InteractionRecord>) {
    let out = ScoreFilter::new(5, ThresholdMode::Absolute(0.85))
        .apply(&records)
        .unwrap();
    assert!(out.records.iter().all(|r| r.score() >= 0.85 && r.distance() >= 5));
    // 9 block records + one isolated record
    assert_eq!(out.records.len(), 10);
}

#[rstest]
fn test_cluster_strategy(records: Vec<InteractionRecord>) {
    let caller = LoopCaller::new(
        CallConfig::default()
            .with_resolution(5000)
            .with_strategy(CallStrategy::Cluster {
                threshold:   0.5,
                eps:         1.5,
                min_samples: 4,
            }),
    );
    let (set, summary) = caller.call("chr1", &records).unwrap();

    // Two dense blocks survive, the isolated record is noise
    assert_eq!(summary.n_significant, 19);
    let anchors = set
        .iter()
        .map(|l| (l.anchor1(), l.anchor2()))
        .collect::<Vec<_>>();
    assert_eq!(anchors, vec![(11, 61), (101, 141)]);
    assert_eq!(set.loops()[1].score(), 0.9 + 8.0 * 1e-3);
}

#[test]
fn test_call_many_preserves_order() {
    let inputs = vec![
        ("chr2".to_string(), dense_block(10, 30, 2, 1.0)),
        ("chr1".to_string(), vec![]),
        ("chrX".to_string(), dense_block(5, 50, 1, 1.0)),
    ];
    let caller = LoopCaller::new(
        CallConfig::default()
            .with_resolution(1000)
            .with_strategy(CallStrategy::Percentile(0.0)),
    );
    let results = caller.call_many(inputs).unwrap();
    let chrs = results
        .iter()
        .map(|(set, _)| set.chr().to_string())
        .collect::<Vec<_>>();
    assert_eq!(chrs, vec!["chr2", "chr1", "chrX"]);
    assert_eq!(results[0].0.len(), 4);
    assert!(results[1].0.is_empty());
    assert_eq!(results[2].0.len(), 1);
}

#[test]
fn test_read_interactions_from_file() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "10 20 0.99")?;
    writeln!(file, "# skipped")?;
    writeln!(file)?;
    writeln!(file, "11\t21\t0.5")?;
    let records = read_interactions_file(file.path())?;
    assert_eq!(records, vec![
        InteractionRecord::new(10, 20, 0.99),
        InteractionRecord::new(11, 21, 0.5),
    ]);
    Ok(())
}

#[test]
fn test_malformed_line_reports_line_number() {
    let err = read_interactions("1 2 0.5\n1 2\n".as_bytes()).unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));
}

//! Preparation of Juicer `dump` output for the interaction-scoring model.
//!
//! Observed and observed/expected dumps of one chromosome are joined on their
//! positions, expected counts are reconstructed as `observed / oe` and
//! positions are converted to bin indices. An anchor reference BED covering
//! every bin (plus padding) is produced alongside.

use std::io::{
    BufRead,
    BufReader,
    Read,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    bail,
    ensure,
};
use csv::WriterBuilder;
use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::{
    BinIdx,
    PosType,
    ResType,
};
use crate::data_structs::{
    bin_to_interval,
    pos_to_bin,
};

/// Extra bins appended after the largest observed anchor in the anchor BED.
pub const ANCHOR_PADDING_BINS: BinIdx = 200;
pub const PREPARED_HEADER: [&str; 4] = ["anchor1", "anchor2", "observed", "expected"];

/// One `pos1 pos2 value` entry of a Juicer dump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DumpRecord {
    pub pos1:  PosType,
    pub pos2:  PosType,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DumpLayout {
    /// `pos1 pos2 value`
    Short,
    /// Long format, `pos1`, `pos2` and `value` in columns 1, 3 and 4
    Long,
}

impl DumpLayout {
    fn detect(n_fields: usize) -> anyhow::Result<Self> {
        match n_fields {
            3 => Ok(Self::Short),
            n if n >= 5 => Ok(Self::Long),
            n => bail!("Unknown dump format (number of columns: {})", n),
        }
    }

    fn columns(&self) -> (usize, usize, usize) {
        match self {
            Self::Short => (0, 1, 2),
            Self::Long => (1, 3, 4),
        }
    }
}

/// Reads a whitespace-delimited Juicer dump.
///
/// The column layout is detected from the first data line. Lines with a
/// different number of fields or with unparseable values are skipped.
pub fn read_dump<R: Read>(reader: R) -> anyhow::Result<Vec<DumpRecord>> {
    let mut layout: Option<(DumpLayout, usize)> = None;
    let mut records = Vec::new();
    let mut n_skipped = 0usize;

    for line in BufReader::new(reader).lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields = trimmed.split_whitespace().collect_vec();
        let (current, width) = match layout {
            Some(l) => l,
            None => {
                let detected = (DumpLayout::detect(fields.len())?, fields.len());
                layout = Some(detected);
                detected
            },
        };
        if fields.len() != width {
            n_skipped += 1;
            continue;
        }

        let (c1, c2, cv) = current.columns();
        let parsed = (
            fields[c1].parse::<PosType>(),
            fields[c2].parse::<PosType>(),
            fields[cv].parse::<f64>(),
        );
        match parsed {
            (Ok(pos1), Ok(pos2), Ok(value)) if !value.is_nan() => {
                records.push(DumpRecord { pos1, pos2, value })
            },
            _ => {
                debug!("Skipping unparseable dump line: {}", trimmed);
                n_skipped += 1;
            },
        }
    }
    if n_skipped > 0 {
        warn!("Skipped {} malformed dump lines", n_skipped);
    }
    Ok(records)
}

/// A joined, binned interaction ready for the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreparedInteraction {
    pub anchor1:  BinIdx,
    pub anchor2:  BinIdx,
    pub observed: f64,
    pub expected: f64,
}

/// Inner-joins observed and O/E dumps on `(pos1, pos2)`.
///
/// `expected = observed / oe`; infinite or undefined ratios become 0.
/// Output is sorted by `(anchor1, anchor2)`, ties keep the order of the
/// observed dump.
pub fn prepare_interactions(
    observed: &[DumpRecord],
    oe: &[DumpRecord],
    resolution: ResType,
) -> anyhow::Result<Vec<PreparedInteraction>> {
    ensure!(resolution > 0, "Resolution must be positive");

    let mut oe_lookup: HashMap<(PosType, PosType), Vec<f64>> = HashMap::new();
    for r in oe {
        oe_lookup.entry((r.pos1, r.pos2)).or_default().push(r.value);
    }

    let mut joined = Vec::with_capacity(observed.len());
    for obs in observed {
        let Some(ratios) = oe_lookup.get(&(obs.pos1, obs.pos2)) else {
            continue;
        };
        let anchor1 = pos_to_bin(obs.pos1, resolution)?;
        let anchor2 = pos_to_bin(obs.pos2, resolution)?;
        for ratio in ratios {
            joined.push(PreparedInteraction {
                anchor1,
                anchor2,
                observed: finite_or_zero(obs.value),
                expected: finite_or_zero(obs.value / ratio),
            });
        }
    }
    info!("Number of interactions after merge: {}", joined.len());

    joined.sort_by_key(|r| (r.anchor1, r.anchor2));
    Ok(joined)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    }
    else {
        0.0
    }
}

/// Writes prepared interactions as a tab-separated table with header.
pub fn write_prepared<W: Write>(
    sink: W,
    rows: &[PreparedInteraction],
) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(sink);
    writer.write_record(PREPARED_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Largest anchor among prepared interactions.
pub fn max_anchor(rows: &[PreparedInteraction]) -> Option<BinIdx> {
    rows.iter().map(|r| r.anchor1.max(r.anchor2)).max()
}

/// Writes `chrom start end index` lines for bins `0 .. max_anchor + padding`.
/// Without any anchor only the padding bins are written.
pub fn write_anchor_bed<W: Write>(
    sink: W,
    chrom: &str,
    resolution: ResType,
    max_anchor: Option<BinIdx>,
) -> anyhow::Result<BinIdx> {
    ensure!(resolution > 0, "Resolution must be positive");
    let n_bins = max_anchor
        .unwrap_or(0)
        .saturating_add(ANCHOR_PADDING_BINS);

    let mut writer = bio::io::bed::Writer::new(sink);
    for idx in 0..n_bins {
        let interval = bin_to_interval(idx, resolution);
        let mut record = bio::io::bed::Record::new();
        record.set_chrom(chrom);
        record.set_start(interval.start());
        record.set_end(interval.end());
        record.set_name(&idx.to_string());
        writer.write(&record)?;
    }
    debug!("Wrote {} anchor bins for {}", n_bins, chrom);
    Ok(n_bins)
}

/// Path of the anchor BED of `chrom` inside `dir`.
pub fn anchor_bed_path<P: AsRef<Path>>(
    dir: P,
    chrom: &str,
) -> PathBuf {
    dir.as_ref().join(format!("{}.bed", chrom))
}

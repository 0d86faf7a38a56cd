//! BEDPE adapters for loop sets.
//!
//! Rows carry nine tab-separated fields
//! `chr1 x1 x2 chr2 y1 y2 name score color`, merged output adds a tenth
//! `source_res` column. Scores are written rounded to 5 decimals. Rows read
//! back keep their base-pair intervals, name and color, so loops of any
//! width can be merged.

use std::fs::File;
use std::io::{
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
    Context,
};
use csv::{
    ReaderBuilder,
    StringRecord,
    WriterBuilder,
};
use log::{
    debug,
    info,
};
use rayon::prelude::*;
use serde::Serialize;

use crate::data_structs::typedef::{
    PosType,
    ResType,
    ScoreType,
};
use crate::data_structs::{
    BinInterval,
    LoopCall,
    LoopSet,
    MergedLoopSet,
    DEFAULT_COLOR,
    DEFAULT_NAME,
};
use crate::utils::{
    round_to,
    THREAD_POOL,
};

pub const BEDPE_HEADER: [&str; 9] =
    ["#chr1", "x1", "x2", "chr2", "y1", "y2", "name", "score", "color"];
pub const SOURCE_RES_COLUMN: &str = "source_res";
pub const SCORE_DECIMALS: u32 = 5;

/// A single BEDPE row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedpeRecord {
    pub chr1:       String,
    pub x1:         PosType,
    pub x2:         PosType,
    pub chr2:       String,
    pub y1:         PosType,
    pub y2:         PosType,
    pub name:       String,
    pub score:      ScoreType,
    pub color:      String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_res: Option<ResType>,
}

impl BedpeRecord {
    /// Converts a call to base-pair coordinates. The provenance, if any,
    /// becomes `source_res`.
    pub fn from_call(
        chr: &str,
        call: &LoopCall,
    ) -> Self {
        let x = call.x_interval();
        let y = call.y_interval();
        Self {
            chr1:       chr.to_owned(),
            x1:         x.start(),
            x2:         x.end(),
            chr2:       chr.to_owned(),
            y1:         y.start(),
            y2:         y.end(),
            name:       call.name().to_owned(),
            score:      round_to(call.score(), SCORE_DECIMALS),
            color:      call.color().to_owned(),
            source_res: call.provenance(),
        }
    }

    /// Converts the row back to a call at `resolution`. The base-pair
    /// intervals, name and color are kept as written; both intervals must be
    /// non-empty and lie on the same chromosome.
    pub fn to_call(
        &self,
        resolution: ResType,
    ) -> anyhow::Result<LoopCall> {
        ensure!(
            self.chr1 == self.chr2,
            "Trans-chromosomal loop {}/{} is not supported",
            self.chr1,
            self.chr2
        );
        for (start, end) in [(self.x1, self.x2), (self.y1, self.y2)] {
            ensure!(start < end, "Interval [{}, {}) is empty", start, end);
        }
        let call = LoopCall::from_intervals(
            BinInterval::new(self.x1, self.x2),
            BinInterval::new(self.y1, self.y2),
            self.score,
            resolution,
        )?
        .with_label(self.name.as_str(), self.color.as_str());
        Ok(match self.source_res {
            Some(res) => call.with_provenance(res),
            None => call,
        })
    }

    fn from_string_record(record: &StringRecord) -> anyhow::Result<Self> {
        if record.len() < 6 {
            bail!("Expected at least 6 BEDPE fields, found {}", record.len())
        }
        let field = |i: usize| record.get(i).unwrap_or_default().trim();
        let pos = |i: usize| -> anyhow::Result<PosType> {
            field(i)
                .parse::<PosType>()
                .with_context(|| format!("Invalid coordinate '{}'", field(i)))
        };
        let score = match record.get(7) {
            Some(s) => s
                .trim()
                .parse::<ScoreType>()
                .with_context(|| format!("Invalid score '{}'", s))?,
            None => 0.0,
        };
        let source_res = match record.get(9).map(str::trim) {
            Some(s) if !s.is_empty() => Some(
                s.parse::<ResType>()
                    .with_context(|| format!("Invalid source resolution '{}'", s))?,
            ),
            _ => None,
        };
        Ok(Self {
            chr1: field(0).to_owned(),
            x1: pos(1)?,
            x2: pos(2)?,
            chr2: field(3).to_owned(),
            y1: pos(4)?,
            y2: pos(5)?,
            name: record.get(6).unwrap_or(DEFAULT_NAME).to_owned(),
            score,
            color: record.get(8).unwrap_or(DEFAULT_COLOR).to_owned(),
            source_res,
        })
    }
}

/// Writes BEDPE rows with a header line, which is written even if no rows
/// follow.
pub struct BedpeWriter<W: Write> {
    writer:      csv::Writer<W>,
    with_source: bool,
}

impl<W: Write> BedpeWriter<W> {
    pub fn try_new(
        sink: W,
        with_source: bool,
    ) -> anyhow::Result<Self> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(sink);
        let mut header = BEDPE_HEADER.to_vec();
        if with_source {
            header.push(SOURCE_RES_COLUMN);
        }
        writer.write_record(&header)?;
        Ok(Self {
            writer,
            with_source,
        })
    }

    pub fn write_record(
        &mut self,
        record: &BedpeRecord,
    ) -> anyhow::Result<()> {
        ensure!(
            record.source_res.is_some() == self.with_source,
            "source_res column presence does not match the header"
        );
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn write_call(
        &mut self,
        chr: &str,
        call: &LoopCall,
    ) -> anyhow::Result<()> {
        self.write_record(&BedpeRecord::from_call(chr, call))
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a per-resolution loop set (9 columns).
pub fn write_loop_set<W: Write>(
    sink: W,
    loops: &LoopSet,
) -> anyhow::Result<()> {
    let mut writer = BedpeWriter::try_new(sink, false)?;
    for call in loops {
        // Per-resolution output never carries provenance
        let mut record = BedpeRecord::from_call(loops.chr(), call);
        record.source_res = None;
        writer.write_record(&record)?;
    }
    writer.finish()
}

/// Writes a merged loop set (9 columns plus `source_res`).
pub fn write_merged<W: Write>(
    sink: W,
    merged: &MergedLoopSet,
) -> anyhow::Result<()> {
    let mut writer = BedpeWriter::try_new(sink, true)?;
    for call in merged.iter() {
        let mut record = BedpeRecord::from_call(merged.chr(), call);
        record.source_res = record.source_res.or(Some(call.resolution()));
        writer.write_record(&record)?;
    }
    writer.finish()
}

pub fn write_loop_set_file<P: AsRef<Path>>(
    path: P,
    loops: &LoopSet,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    write_loop_set(file, loops)?;
    info!("Saved {} loops to {}", loops.len(), path.display());
    Ok(())
}

pub fn write_merged_file<P: AsRef<Path>>(
    path: P,
    merged: &MergedLoopSet,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    write_merged(file, merged)?;
    info!("Saved {} merged loops to {}", merged.len(), path.display());
    Ok(())
}

/// Reads all rows of a BEDPE file. Lines starting with `#` are skipped.
pub fn read_bedpe<R: Read>(reader: R) -> anyhow::Result<Vec<BedpeRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .records()
        .enumerate()
        .map(|(i, record)| {
            let record = record?;
            BedpeRecord::from_string_record(&record)
                .with_context(|| format!("Malformed BEDPE record #{}", i + 1))
        })
        .collect()
}

/// Reads a per-resolution BEDPE file into a [`LoopSet`].
///
/// All rows must share one chromosome. An empty file yields an empty set
/// with an empty chromosome name.
pub fn read_loop_set<R: Read>(
    reader: R,
    resolution: ResType,
) -> anyhow::Result<LoopSet> {
    ensure!(resolution > 0, "Resolution must be positive");
    let records = read_bedpe(reader)?;
    let chr = records
        .first()
        .map(|r| r.chr1.clone())
        .unwrap_or_default();

    let loops = records
        .iter()
        .map(|r| {
            ensure!(
                r.chr1 == chr,
                "Expected a single chromosome, found {} and {}",
                chr,
                r.chr1
            );
            // Provenance is reassigned by the merger
            BedpeRecord {
                source_res: None,
                ..r.clone()
            }
            .to_call(resolution)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    debug!("Read {} loops at {}bp for '{}'", loops.len(), resolution, chr);
    Ok(LoopSet::new(chr, resolution, loops))
}

/// Pairs BEDPE files with their resolutions and reads them in parallel.
///
/// A count mismatch between `files` and `resolutions` is reported before any
/// file is opened.
pub fn read_tiers<P: AsRef<Path> + Sync>(
    files: &[P],
    resolutions: &[ResType],
) -> anyhow::Result<Vec<LoopSet>> {
    ensure!(
        files.len() == resolutions.len(),
        "Number of files ({}) must match number of resolutions ({})",
        files.len(),
        resolutions.len()
    );

    THREAD_POOL.install(|| {
        files
            .par_iter()
            .zip(resolutions.par_iter())
            .map(|(path, res)| {
                let path: PathBuf = path.as_ref().to_path_buf();
                info!("Loading {}bp: {}", res, path.display());
                let file = File::open(&path)
                    .with_context(|| format!("Could not open {}", path.display()))?;
                read_loop_set(file, *res)
                    .with_context(|| format!("Could not read {}", path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })
}

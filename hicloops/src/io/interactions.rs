use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
    Read,
};
use std::path::Path;

use anyhow::Context;
use log::debug;

use crate::data_structs::InteractionRecord;

/// Reads whitespace-delimited `bin1 bin2 score` records.
///
/// Blank lines and lines starting with `#` are skipped. Any other line that
/// does not parse is an error naming its line number.
pub fn read_interactions<R: Read>(reader: R) -> anyhow::Result<Vec<InteractionRecord>> {
    let mut records = Vec::new();
    for (line_no, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record = trimmed
            .parse::<InteractionRecord>()
            .with_context(|| format!("Malformed interaction record at line {}", line_no + 1))?;
        records.push(record);
    }
    debug!("Read {} interaction records", records.len());
    Ok(records)
}

pub fn read_interactions_file<P: AsRef<Path>>(
    path: P
) -> anyhow::Result<Vec<InteractionRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Could not open interaction file {}", path.display()))?;
    read_interactions(file)
        .with_context(|| format!("Could not read interaction file {}", path.display()))
}

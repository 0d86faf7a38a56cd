use std::fs::{
    create_dir_all,
    File,
};
use std::io::BufReader;
use std::path::{
    Path,
    PathBuf,
};

use anyhow::Context;
use clap::Args;
use hicloops::io::juicer::{
    anchor_bed_path,
    max_anchor,
    prepare_interactions,
    read_dump,
    write_anchor_bed,
    write_prepared,
    DumpRecord,
};
use hicloops::prelude::*;
use log::info;

use crate::strings::prepare as strings;
use crate::utils::{
    validate_input,
    validate_output,
};
use crate::PipelineCommand;

#[derive(Args, Debug, Clone)]
pub(crate) struct PrepareArgs {
    #[arg(long, required = true, help = strings::OBS)]
    obs:        PathBuf,
    #[arg(long, required = true, help = strings::OE)]
    oe:         PathBuf,
    #[arg(short, long, required = true, help = strings::CHROM)]
    chrom:      String,
    #[arg(short, long, required = true, help = strings::RES)]
    res:        ResType,
    #[arg(short, long, required = true, help = strings::OUT)]
    out:        PathBuf,
    #[arg(short, long, default_value = "anchors", help = strings::ANCHOR_DIR)]
    anchor_dir: PathBuf,
}

fn load_dump(path: &Path) -> anyhow::Result<Vec<DumpRecord>> {
    let file = File::open(validate_input(path)?)
        .with_context(|| format!("Could not open {}", path.display()))?;
    let records = read_dump(BufReader::new(file))
        .with_context(|| format!("Could not read {}", path.display()))?;
    info!("Read {} interactions from {}", records.len(), path.display());
    Ok(records)
}

impl PipelineCommand for PrepareArgs {
    fn run(&self) -> anyhow::Result<()> {
        validate_output(&self.out)?;
        let observed = load_dump(&self.obs)?;
        let oe = load_dump(&self.oe)?;

        let rows = prepare_interactions(&observed, &oe, self.res)?;
        let file = File::create(&self.out)
            .with_context(|| format!("Could not create {}", self.out.display()))?;
        write_prepared(file, &rows)?;
        info!("Saved {} interactions to {}", rows.len(), self.out.display());

        create_dir_all(&self.anchor_dir).with_context(|| {
            format!("Could not create directory {}", self.anchor_dir.display())
        })?;
        let bed_path = anchor_bed_path(&self.anchor_dir, &self.chrom);
        let bed_file = File::create(&bed_path)
            .with_context(|| format!("Could not create {}", bed_path.display()))?;
        let n_bins = write_anchor_bed(bed_file, &self.chrom, self.res, max_anchor(&rows))?;
        info!("Saved {} anchor bins to {}", n_bins, bed_path.display());
        Ok(())
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::alto;
use crate::corpus::{
    group_paths, load_stopwords, BinConfig, BinStats, Binner, CleanerConfig, DateGroup, Mode,
    Resolution, TxtExporter,
};
use crate::discovery::{self, PageJob};
use crate::record::{NdjsonStore, RecordStore};

const CHUNK_SIZE: usize = 500;

pub struct ExtractStats {
    pub total: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub blocks: usize,
}

impl ExtractStats {
    pub fn print(&self) {
        println!(
            "Extracted {} of {} pages ({} blocks), {} already done, {} failed.",
            self.written, self.total, self.blocks, self.skipped, self.failed,
        );
    }
}

enum Outcome {
    Written(usize),
    Skipped,
    Failed,
}

/// Extract every page under `dataset` into a mirrored NDJSON tree in `outdir`.
///
/// Pages are independent, so each chunk is processed in parallel. A page that
/// fails is logged and skipped; the rest of the run continues.
pub fn extract_dataset(dataset: &Path, outdir: &Path, overwrite: bool) -> Result<ExtractStats> {
    let jobs = discovery::mirror_layout(dataset, outdir)
        .with_context(|| format!("Failed to walk dataset {}", dataset.display()))?;
    info!("Found {} pages under {}", jobs.len(), dataset.display());

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut stats = ExtractStats {
        total: jobs.len(),
        written: 0,
        skipped: 0,
        failed: 0,
        blocks: 0,
    };

    for chunk in jobs.chunks(CHUNK_SIZE) {
        let outcomes: Vec<Outcome> = chunk.par_iter().map(|job| extract_one(job, overwrite)).collect();
        for outcome in outcomes {
            match outcome {
                Outcome::Written(blocks) => {
                    stats.written += 1;
                    stats.blocks += blocks;
                }
                Outcome::Skipped => stats.skipped += 1,
                Outcome::Failed => stats.failed += 1,
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(stats)
}

fn extract_one(job: &PageJob, overwrite: bool) -> Outcome {
    if !overwrite && job.target.exists() {
        return Outcome::Skipped;
    }
    let result = alto::extract_file(&job.source).and_then(|page| {
        NdjsonStore.save(&job.target, &page)?;
        Ok(page.len())
    });
    match result {
        Ok(blocks) => Outcome::Written(blocks),
        Err(e) => {
            warn!("Skipping page {}: {}", job.source.display(), e);
            Outcome::Failed
        }
    }
}

/// Sorted record files of `dataset`, grouped by time bin.
pub fn group_dataset(dataset: &Path, resolution: Resolution) -> Result<Vec<DateGroup>> {
    let paths = discovery::record_files(dataset)
        .with_context(|| format!("Failed to list records under {}", dataset.display()))?;
    info!("Found {} page records under {}", paths.len(), dataset.display());
    Ok(group_paths(&paths, resolution)?)
}

pub fn bin_dataset(
    dataset: &Path,
    outdir: &Path,
    resolution: Resolution,
    preprocess: bool,
    stopwords: Option<&Path>,
) -> Result<BinStats> {
    let groups = group_dataset(dataset, resolution)?;

    let stopwords = stopwords
        .map(load_stopwords)
        .transpose()
        .context("Failed to load stopwords")?;
    let mode = if preprocess { Mode::Preprocessed } else { Mode::Readable };
    let config = BinConfig::new(
        mode,
        CleanerConfig {
            stopwords,
            ..Default::default()
        },
    );

    let binner = Binner::new(NdjsonStore, TxtExporter::new(outdir), config);
    Ok(binner.run(&groups))
}

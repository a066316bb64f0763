mod alto;
mod corpus;
mod discovery;
mod error;
mod filename;
mod pipeline;
mod record;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use corpus::Resolution;

#[derive(Parser)]
#[command(name = "alto_corpus", about = "Newspaper ALTO scans to time-binned text corpora")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every page of the scan archive into per-page NDJSON records
    Extract {
        /// Archive root (session/subsession/day/page.alto.xml)
        #[arg(short, long)]
        dataset: PathBuf,
        /// Where the mirrored NDJSON tree is written
        #[arg(short, long)]
        outdir: PathBuf,
        /// Re-extract pages that already have records
        #[arg(long)]
        overwrite: bool,
    },
    /// Concatenate page records into one text file per time bin
    Bin {
        /// Root of the NDJSON tree
        #[arg(short, long)]
        dataset: PathBuf,
        #[arg(short, long)]
        outdir: PathBuf,
        /// Bin width: D, M or Y
        #[arg(short, long, default_value = "D")]
        timebin: Resolution,
        /// Clean tokens and pack the text densely
        #[arg(short, long)]
        preprocess: bool,
        /// Stopword list, one per line
        #[arg(short, long, requires = "preprocess")]
        stopwords: Option<PathBuf>,
    },
    /// Extract + bin in one pipeline
    Run {
        #[arg(short, long)]
        dataset: PathBuf,
        /// Intermediate NDJSON tree
        #[arg(short, long)]
        records: PathBuf,
        #[arg(short, long)]
        outdir: PathBuf,
        #[arg(short, long, default_value = "D")]
        timebin: Resolution,
        #[arg(short, long)]
        preprocess: bool,
        #[arg(short, long, requires = "preprocess")]
        stopwords: Option<PathBuf>,
    },
    /// Page counts per time bin, nothing written
    Stats {
        #[arg(short, long)]
        dataset: PathBuf,
        #[arg(short, long, default_value = "M")]
        timebin: Resolution,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            dataset,
            outdir,
            overwrite,
        } => {
            let stats = pipeline::extract_dataset(&dataset, &outdir, overwrite)?;
            stats.print();
            Ok(())
        }
        Commands::Bin {
            dataset,
            outdir,
            timebin,
            preprocess,
            stopwords,
        } => {
            let stats =
                pipeline::bin_dataset(&dataset, &outdir, timebin, preprocess, stopwords.as_deref())?;
            println!(
                "Wrote {} of {} bins ({} pages), {} failed.",
                stats.written, stats.groups, stats.pages, stats.failed
            );
            Ok(())
        }
        Commands::Run {
            dataset,
            records,
            outdir,
            timebin,
            preprocess,
            stopwords,
        } => {
            // Phase 1: Extract
            let t_extract = Instant::now();
            let stats = pipeline::extract_dataset(&dataset, &records, false)?;
            println!("Extracted in {:.1}s", t_extract.elapsed().as_secs_f64());
            stats.print();

            // Phase 2: Bin
            let t_bin = Instant::now();
            let bins =
                pipeline::bin_dataset(&records, &outdir, timebin, preprocess, stopwords.as_deref())?;
            println!(
                "Wrote {} of {} bins ({} failed) in {:.1}s",
                bins.written,
                bins.groups,
                bins.failed,
                t_bin.elapsed().as_secs_f64()
            );
            Ok(())
        }
        Commands::Stats { dataset, timebin } => {
            let groups = pipeline::group_dataset(&dataset, timebin)?;
            if groups.is_empty() {
                println!("No page records found. Run 'extract' first.");
                return Ok(());
            }

            println!("{:<14} | {:>6}", "Bin", "Pages");
            println!("{}", "-".repeat(23));
            for g in &groups {
                println!("{:<14} | {:>6}", g.stem(), g.paths.len());
            }
            let pages: usize = groups.iter().map(|g| g.paths.len()).sum();
            println!("\n{} bins | {} pages", groups.len(), pages);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

//! CLI entry point for the accident statistics tool.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use accident_stats::charts::{plot_consequences, plot_direction, plot_visibility};
use accident_stats::data::fetch::{ensure_archive, HttpFetcher, DATA_URL};
use accident_stats::data::{cache, load_archive, Normalizer};

#[derive(Parser)]
#[command(name = "accident_stats", about = "Traffic accident descriptive statistics")]
struct Cli {
    /// Path to the dataset archive; downloaded when missing
    #[arg(long, default_value = "data/data.zip")]
    archive: PathBuf,
    /// Snapshot of the normalized table, reused between runs
    #[arg(long, default_value = "data/accidents.arrow")]
    cache: PathBuf,
    /// Directory for the rendered charts
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
    /// Re-parse the archive even when a snapshot exists
    #[arg(long)]
    refresh: bool,
    /// Open rendered charts with the system viewer
    #[arg(long)]
    show: bool,
    /// Log a before/after memory footprint summary
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let df = if cli.cache.exists() && !cli.refresh {
        log::info!("Using cached table {}", cli.cache.display());
        cache::read_cache(&cli.cache).context("failed to read cached table")?
    } else {
        ensure_archive(&cli.archive, DATA_URL, &HttpFetcher)
            .context("failed to provision dataset archive")?;
        let raw = load_archive(&cli.archive).context("failed to load archive")?;
        let mut normalized =
            Normalizer::normalize(&raw, cli.verbose).context("failed to normalize table")?;
        cache::write_cache(&mut normalized, &cli.cache)
            .context("failed to write table snapshot")?;
        normalized
    };

    plot_visibility(&df, Some(&cli.out_dir.join("01_visibility.png")), cli.show)?;
    plot_direction(&df, Some(&cli.out_dir.join("02_direction.png")), cli.show)?;
    plot_consequences(&df, Some(&cli.out_dir.join("03_consequences.png")), cli.show)?;

    Ok(())
}

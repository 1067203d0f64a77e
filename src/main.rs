//! pfplot - chart page-frame layer I/O statistics.
//!
//! Reads the counters an external PF layer run wrote to `stats.csv` and
//! renders logical/physical reads and writes plus pages accessed against the
//! workload's write percentage.

mod chart;
mod dataset;
mod error;
mod glyph;
mod plot;
mod show;

use anyhow::{Context, Result};
use chart::Chart;
use clap::Parser;
use dataset::Dataset;
use env_logger::Env;
use log::{debug, info};
use plot::ImageKind;
use std::path::PathBuf;

/// Render PF layer I/O statistics against the read/write mix
#[derive(Parser, Debug)]
#[command(name = "pfplot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file with mix, logicalReads, logicalWrites, physicalReads,
    /// physicalWrites and pagesAccessed columns
    #[arg(short, long, default_value = "stats.csv")]
    input: PathBuf,

    /// Output image (.png or .svg), overwritten if it exists
    #[arg(short, long, default_value = "pf_stats.png")]
    output: PathBuf,

    /// Resolution; the figure is 10x6 inches
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u32).range(10..=1000))]
    dpi: u32,

    /// Do not open the saved image in a viewer
    #[arg(long)]
    no_show: bool,
}

fn run(args: &Args) -> Result<()> {
    // reject the output format before touching the input
    ImageKind::from_path(&args.output)?;

    let dataset = Dataset::from_path(&args.input)
        .with_context(|| format!("Failed to load statistics from {}", args.input.display()))?;
    info!(
        "Loaded {} rows from {}",
        dataset.row_count(),
        args.input.display()
    );
    debug!("Columns: {:?}", dataset.headers());

    let chart = Chart::pf_stats(&dataset)
        .with_context(|| format!("Failed to build chart from {}", args.input.display()))?;

    info!("Plotting {}", chart.labels().join(", "));

    plot::save_chart(&chart, &args.output, args.dpi)?;

    if !args.no_show {
        show::present(&args.output);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_report_names() {
        let args = Args::parse_from(["pfplot"]);
        assert_eq!(args.input, PathBuf::from("stats.csv"));
        assert_eq!(args.output, PathBuf::from("pf_stats.png"));
        assert_eq!(args.dpi, 100);
        assert!(!args.no_show);
    }

    #[test]
    fn flags_override_paths() {
        let args = Args::parse_from(["pfplot", "-i", "in.csv", "-o", "out.svg", "--dpi", "72", "--no-show"]);
        assert_eq!(args.input, PathBuf::from("in.csv"));
        assert_eq!(args.output, PathBuf::from("out.svg"));
        assert_eq!(args.dpi, 72);
        assert!(args.no_show);
    }

    #[test]
    fn dpi_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["pfplot", "--dpi", "0"]).is_err());
    }

    #[test]
    fn failed_load_leaves_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stats.csv");
        let output = dir.path().join("pf_stats.png");
        std::fs::write(&input, "mix,logicalReads\n0,1\n").unwrap();
        std::fs::write(&output, b"previous").unwrap();

        let args = Args {
            input,
            output: output.clone(),
            dpi: 50,
            no_show: true,
        };
        let err = run(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("logicalWrites"));
        assert_eq!(std::fs::read(&output).unwrap(), b"previous");
    }
}

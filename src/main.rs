mod app;
mod chart;
mod color;
mod data;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Plot per-run, per-metric time series from simulator vector (.vec) files.
#[derive(Parser, Debug)]
#[command(name = "vecplot", version, about)]
pub struct Args {
    /// Directory scanned for *.vec files
    #[arg(long, default_value = "results")]
    pub results: PathBuf,

    /// Metric name or case-insensitive regex (repeatable, e.g. offsetFromGm, 'rateRatio.*')
    #[arg(long, required = true)]
    pub metric: Vec<String>,

    /// Output directory for PNG charts, created if missing
    #[arg(long, default_value = "figs")]
    pub outdir: PathBuf,

    /// Process at most this many files (for debugging; 0 = all)
    #[arg(long)]
    pub max_runs: Option<usize>,

    /// Chart width in pixels
    #[arg(long, default_value_t = 960, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Also write the matching samples to this CSV file
    #[arg(long, value_name = "PATH")]
    pub export_csv: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match app::run(&args) {
        Ok(summary) => {
            println!(
                "Done: {} chart(s) from {} of {} samples across {} run(s), see {}",
                summary.charts.len(),
                summary.matched,
                summary.rows,
                summary.files,
                args.outdir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

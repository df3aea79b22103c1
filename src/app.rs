use std::path::PathBuf;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::chart::{self, ChartSize};
use crate::data::export;
use crate::data::filter::MetricFilter;
use crate::data::loader;
use crate::error::VecPlotError;
use crate::Args;

// ---------------------------------------------------------------------------
// Pipeline: discover → parse → filter → group → render
// ---------------------------------------------------------------------------

/// What a successful run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: usize,
    pub rows: usize,
    pub matched: usize,
    pub charts: Vec<PathBuf>,
}

pub fn run(args: &Args) -> Result<RunSummary> {
    // Compile patterns first so a typo fails before any parsing.
    let filter = MetricFilter::new(&args.metric)?;

    let files = loader::discover_vector_files(&args.results, args.max_runs)?;
    log::info!("Reading {} .vec file(s) from {}", files.len(), args.results.display());

    let progress = progress_bar(files.len(), args.quiet);
    let all = loader::load_all(&files, &progress)?;
    if all.is_empty() {
        return Err(VecPlotError::NoData {
            dir: args.results.clone(),
        }
        .into());
    }
    log::info!("Loaded {} samples", all.len());

    let selected = filter.apply(&all);
    if selected.is_empty() {
        return Err(VecPlotError::NoMatch {
            patterns: filter.sources().to_vec(),
        }
        .into());
    }
    log::info!("{} samples match {:?}", selected.len(), filter.sources());

    if let Some(csv_path) = &args.export_csv {
        export::write_csv(csv_path, &selected)?;
    }

    std::fs::create_dir_all(&args.outdir)
        .with_context(|| format!("creating {}", args.outdir.display()))?;

    let size = ChartSize {
        width: args.width,
        height: args.height,
    };
    let mut charts = Vec::new();
    for (key, series) in selected.group_by_run_metric() {
        let path = chart::render_chart(&args.outdir, &key, &series, size)?;
        log::info!("Wrote {}", path.display());
        charts.push(path);
    }

    Ok(RunSummary {
        files: files.len(),
        rows: all.len(),
        matched: selected.len(),
        charts,
    })
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} runs {msg}")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::path::Path;

    fn args(results: &Path, outdir: &Path, metrics: &[&str]) -> Args {
        let mut argv = vec![
            "vecplot".to_string(),
            "--quiet".to_string(),
            "--results".to_string(),
            results.display().to_string(),
            "--outdir".to_string(),
            outdir.display().to_string(),
        ];
        for m in metrics {
            argv.push("--metric".to_string());
            argv.push(m.to_string());
        }
        Args::try_parse_from(argv).unwrap()
    }

    fn kind(err: &anyhow::Error) -> Option<&VecPlotError> {
        err.downcast_ref::<VecPlotError>()
    }

    #[test]
    fn no_input_files_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("figs");
        let err = run(&args(dir.path(), &out, &["x"])).unwrap_err();
        assert!(matches!(kind(&err), Some(VecPlotError::NoData { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn files_without_samples_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("r.vec"), "version 3\n1 0 0.5 1.0\n").unwrap();
        let err = run(&args(dir.path(), &dir.path().join("figs"), &["x"])).unwrap_err();
        assert!(matches!(kind(&err), Some(VecPlotError::NoData { .. })));
        assert!(err.to_string().contains("no valid data"));
    }

    #[test]
    fn unmatched_metric_is_no_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("r.vec"), "vector 1 m offsetFromGm ETV\n1 0 0.5 1.0\n").unwrap();
        let err = run(&args(dir.path(), &dir.path().join("figs"), &["rateRatio.*"])).unwrap_err();
        match kind(&err) {
            Some(VecPlotError::NoMatch { patterns }) => assert_eq!(patterns, &["rateRatio.*"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_pattern_fails_before_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args(dir.path(), &dir.path().join("figs"), &["("])).unwrap_err();
        assert!(matches!(kind(&err), Some(VecPlotError::InvalidPattern { .. })));
    }

    #[test]
    fn non_numeric_sample_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("r.vec"), "vector 1 m x ETV\n1 0 zero 1.0\n").unwrap();
        let err = run(&args(dir.path(), &dir.path().join("figs"), &["x"])).unwrap_err();
        assert!(matches!(
            kind(&err),
            Some(VecPlotError::BadNumber { field: "time", line: 2, .. })
        ));
    }

    #[test]
    fn cli_defaults() {
        let a = Args::try_parse_from(["vecplot", "--metric", "offset"]).unwrap();
        assert_eq!(a.results, PathBuf::from("results"));
        assert_eq!(a.outdir, PathBuf::from("figs"));
        assert_eq!(a.metric, vec!["offset".to_string()]);
        assert_eq!(a.max_runs, None);
        assert_eq!((a.width, a.height), (960, 720));
        assert!(a.export_csv.is_none());
    }

    #[test]
    fn metric_is_required_and_repeatable() {
        assert!(Args::try_parse_from(["vecplot"]).is_err());
        let a = Args::try_parse_from(["vecplot", "--metric", "a", "--metric", "b", "--max-runs", "3"]).unwrap();
        assert_eq!(a.metric, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(a.max_runs, Some(3));
    }

    #[test]
    fn zero_chart_size_is_rejected() {
        assert!(Args::try_parse_from(["vecplot", "--metric", "a", "--width", "0"]).is_err());
        assert!(Args::try_parse_from(["vecplot", "--metric", "a", "--height", "0"]).is_err());
        let a = Args::try_parse_from(["vecplot", "--metric", "a", "--width", "1", "--height", "1"]).unwrap();
        assert_eq!((a.width, a.height), (1, 1));
    }

    #[test]
    fn writes_one_png_per_run_metric_and_overwrites_on_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");
        fs::create_dir(&results).unwrap();
        fs::write(
            results.join("r.vec"),
            concat!(
                "vector 1 modA offsetFromGm:vector ETV\n",
                "vector 2 modB offsetFromGm:vector ETV\n",
                "vector 3 modA rateRatio:vector ETV\n",
                "1 0 0.0 1.5\n",
                "2 1 0.0 -2.0\n",
                "1 2 1.0 2.5\n",
                "2 3 1.0 -1.0\n",
                "3 4 1.0 1.0001\n",
            ),
        )
        .unwrap();
        let out = dir.path().join("figs").join("nested");
        let a = args(&results, &out, &["offsetFromGm"]);

        let first = run(&a).unwrap();
        let expected = vec![out.join("r_offsetFromGm_vector.png")];
        assert_eq!(first.charts, expected);
        assert_eq!((first.files, first.rows, first.matched), (1, 5, 4));

        let bytes = fs::read(&expected[0]).unwrap();
        assert!(bytes.len() > 8);
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let second = run(&a).unwrap();
        assert_eq!(second.charts, expected);
        let pngs = fs::read_dir(&out).unwrap().count();
        assert_eq!(pngs, 1);
    }
}

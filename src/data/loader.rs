use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use super::model::{DataPoint, VectorTable};
use crate::error::VecPlotError;

/// Extension of vector result files.
pub const VECTOR_EXTENSION: &str = "vec";

// ---------------------------------------------------------------------------
// Input discovery
// ---------------------------------------------------------------------------

/// List the `*.vec` files directly inside `dir`, sorted by path.
///
/// `max_runs` keeps only the first N files; `Some(0)` means no cap.
/// A missing directory yields an empty list.
pub fn discover_vector_files(dir: &Path, max_runs: Option<usize>) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{base}/*.{VECTOR_EXTENSION}");

    let mut files = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("bad glob pattern {pattern}"))? {
        let path = entry.context("reading results directory")?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if let Some(cap) = max_runs.filter(|&n| n > 0) {
        if files.len() > cap {
            log::warn!("--max-runs {cap}: skipping {} file(s)", files.len() - cap);
            files.truncate(cap);
        }
    }
    Ok(files)
}

/// Parse every file in order and concatenate the results.
pub fn load_all(paths: &[PathBuf], progress: &ProgressBar) -> Result<VectorTable> {
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        progress.set_message(run_name(path));
        match load_vector_file(path) {
            Ok(table) => tables.push(table),
            Err(e) => {
                progress.finish_and_clear();
                return Err(e);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(VectorTable::concat(tables))
}

// ---------------------------------------------------------------------------
// Vector file parser
// ---------------------------------------------------------------------------

/// Parse one vector result file. The run name is the file stem.
pub fn load_vector_file(path: &Path) -> Result<VectorTable> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let run = run_name(path);
    let points = parse_vector_lines(BufReader::new(file), &run, path)?;
    log::debug!("{}: {} samples", path.display(), points.len());
    Ok(VectorTable::from_points(points))
}

/// Run name for a result file: its base name without extension.
pub fn run_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// What a vector header declares about an id. Valid for one file only.
#[derive(Debug, Clone)]
struct HeaderEntry {
    module: String,
    metric: String,
}

/// Classification of a raw line.
#[derive(Debug, PartialEq)]
enum Record<'a> {
    /// `vector <id> <module> <metric> ...`
    Header {
        id: &'a str,
        module: &'a str,
        metric: &'a str,
    },
    /// `<id> <event> <time> <value> ...`
    Data {
        id: &'a str,
        time: &'a str,
        value: &'a str,
    },
    /// Blank, preamble, short, or otherwise unrecognised.
    Other,
}

fn classify(line: &str) -> Record<'_> {
    if line.starts_with("vector") {
        let mut fields = line.split_whitespace().skip(1);
        return match (fields.next(), fields.next(), fields.next()) {
            (Some(id), Some(module), Some(metric)) => Record::Header { id, module, metric },
            _ => Record::Other,
        };
    }
    if line.as_bytes().first().is_some_and(u8::is_ascii_digit) {
        let mut fields = line.split_whitespace();
        return match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(id), Some(_event), Some(time), Some(value)) => Record::Data { id, time, value },
            _ => Record::Other,
        };
    }
    Record::Other
}

/// Scan vector records line by line.
///
/// Headers must precede their data lines; samples whose id has no header
/// are dropped. A non-numeric time or value on a well-formed data line is
/// an error. `source` is only used in error messages.
pub fn parse_vector_lines<R: BufRead>(reader: R, run: &str, source: &Path) -> Result<Vec<DataPoint>> {
    let mut headers: HashMap<String, HeaderEntry> = HashMap::new();
    let mut points = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", source.display()))?;
        match classify(&line) {
            Record::Header { id, module, metric } => {
                headers.insert(
                    id.to_string(),
                    HeaderEntry {
                        module: module.to_string(),
                        metric: metric.to_string(),
                    },
                );
            }
            Record::Data { id, time, value } => {
                let Some(header) = headers.get(id) else {
                    continue;
                };
                let line_no = idx + 1;
                points.push(DataPoint {
                    time: parse_number(time, "time", source, line_no)?,
                    value: parse_number(value, "value", source, line_no)?,
                    run: run.to_string(),
                    module: header.module.clone(),
                    metric: header.metric.clone(),
                });
            }
            Record::Other => {}
        }
    }

    log::trace!("{run}: {} vector(s) declared", headers.len());
    Ok(points)
}

fn parse_number(tok: &str, field: &'static str, source: &Path, line: usize) -> Result<f64> {
    tok.parse::<f64>().map_err(|_| {
        VecPlotError::BadNumber {
            path: source.to_path_buf(),
            line,
            field,
            value: tok.to_string(),
        }
        .into()
    })
}

use std::path::PathBuf;

use thiserror::Error;

/// Failures the pipeline reports to the user by kind.
///
/// Everything else (I/O, chart drawing, PNG encoding) travels as
/// `anyhow::Error` with context attached at the call site.
#[derive(Debug, Error)]
pub enum VecPlotError {
    #[error(
        "no valid data found in .vec files under {} - check the file format or path",
        dir.display()
    )]
    NoData { dir: PathBuf },

    #[error("no samples matched the metric patterns {patterns:?}")]
    NoMatch { patterns: Vec<String> },

    #[error("invalid metric pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{}:{line}: {field} '{value}' is not a number", path.display())]
    BadNumber {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },
}

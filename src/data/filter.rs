use regex::{Regex, RegexBuilder};

use super::model::VectorTable;
use crate::error::VecPlotError;

// ---------------------------------------------------------------------------
// Metric selection
// ---------------------------------------------------------------------------

/// A set of case-insensitive metric patterns.
///
/// A metric is selected when any pattern matches anywhere in its name, so a
/// plain name such as `offsetFromGm` also selects `offsetFromGm:vector`.
#[derive(Debug, Clone)]
pub struct MetricFilter {
    sources: Vec<String>,
    patterns: Vec<Regex>,
}

impl MetricFilter {
    pub fn new<S: AsRef<str>>(exprs: &[S]) -> Result<Self, VecPlotError> {
        let mut sources = Vec::with_capacity(exprs.len());
        let mut patterns = Vec::with_capacity(exprs.len());
        for expr in exprs {
            let expr = expr.as_ref();
            let re = RegexBuilder::new(expr)
                .case_insensitive(true)
                .build()
                .map_err(|source| VecPlotError::InvalidPattern {
                    pattern: expr.to_string(),
                    source,
                })?;
            sources.push(expr.to_string());
            patterns.push(re);
        }
        Ok(MetricFilter { sources, patterns })
    }

    /// The patterns as the user wrote them.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn matches(&self, metric: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(metric))
    }

    /// Rows of `table` whose metric is selected.
    pub fn apply(&self, table: &VectorTable) -> VectorTable {
        table.retain_by(|p| self.matches(&p.metric))
    }
}

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// DataPoint – one sample of one vector
// ---------------------------------------------------------------------------

/// A single time-series sample, resolved against its vector header.
///
/// Field order doubles as the CSV column order on export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    /// Simulation time in seconds.
    pub time: f64,
    pub value: f64,
    /// Base name of the result file the sample came from.
    pub run: String,
    /// Component path that recorded the sample.
    pub module: String,
    pub metric: String,
}

// ---------------------------------------------------------------------------
// RunMetricKey – one chart
// ---------------------------------------------------------------------------

/// Identifies one chart: a metric as observed in a single run.
/// Ordered by run, then metric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunMetricKey {
    pub run: String,
    pub metric: String,
}

impl fmt::Display for RunMetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.metric, self.run)
    }
}

/// `(time, value)` pairs for one module, in file order.
pub type Series = Vec<(f64, f64)>;

/// Module path → its series, sorted by module.
pub type ModuleSeries = BTreeMap<String, Series>;

// ---------------------------------------------------------------------------
// VectorTable – the flat table of samples
// ---------------------------------------------------------------------------

/// The flat table of samples from one or more result files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorTable {
    pub points: Vec<DataPoint>,
}

impl VectorTable {
    pub fn from_points(points: Vec<DataPoint>) -> Self {
        VectorTable { points }
    }

    /// Concatenate tables, keeping each table's rows in order.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = VectorTable>,
    {
        let mut points = Vec::new();
        for table in tables {
            points.extend(table.points);
        }
        VectorTable { points }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the table holds no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keep only the rows for which `pred` holds.
    pub fn retain_by<F>(&self, mut pred: F) -> VectorTable
    where
        F: FnMut(&DataPoint) -> bool,
    {
        VectorTable {
            points: self.points.iter().filter(|p| pred(p)).cloned().collect(),
        }
    }

    /// Group samples by (run, metric), then by module.
    ///
    /// Both levels come out sorted; samples inside a series keep table order.
    pub fn group_by_run_metric(&self) -> BTreeMap<RunMetricKey, ModuleSeries> {
        let mut groups: BTreeMap<RunMetricKey, ModuleSeries> = BTreeMap::new();
        for p in &self.points {
            let key = RunMetricKey {
                run: p.run.clone(),
                metric: p.metric.clone(),
            };
            groups
                .entry(key)
                .or_default()
                .entry(p.module.clone())
                .or_default()
                .push((p.time, p.value));
        }
        groups
    }
}

//! Chart model built from a dataset before anything is drawn.

use crate::dataset::Dataset;
use crate::error::{ReportError, Result};
use log::debug;
use std::ops::Range;

/// Column holding the write percentage of each workload
pub const MIX_COLUMN: &str = "mix";

pub const PF_TITLE: &str = "PF Layer I/O Statistics vs Read/Write Mix";
pub const PF_X_LABEL: &str = "Write Percentage (%)";
pub const PF_Y_LABEL: &str = "Operation Count";

/// Which column to plot and what to call it in the legend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSpec {
    pub column: &'static str,
    pub label: &'static str,
}

/// PF layer counters, in legend order
pub const PF_COUNTERS: [SeriesSpec; 5] = [
    SeriesSpec { column: "logicalReads", label: "Logical Reads" },
    SeriesSpec { column: "logicalWrites", label: "Logical Writes" },
    SeriesSpec { column: "physicalReads", label: "Physical Reads" },
    SeriesSpec { column: "physicalWrites", label: "Physical Writes" },
    SeriesSpec { column: "pagesAccessed", label: "Pages Accessed" },
];

/// One labelled line. Points keep input row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// Runs of consecutive drawable points. A point with a missing coordinate
    /// ends the current run and is itself skipped.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for &(x, y) in &self.points {
            if x.is_finite() && y.is_finite() {
                current.push((x, y));
            } else if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// A single line chart: series sharing one x axis, drawn over a grid
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
        }
    }

    /// The PF statistics chart: every counter against `mix`
    pub fn pf_stats(dataset: &Dataset) -> Result<Self> {
        Self::new(PF_TITLE, PF_X_LABEL, PF_Y_LABEL).with_series(dataset, MIX_COLUMN, &PF_COUNTERS)
    }

    /// Add one series per [`SeriesSpec`], each plotted against `x_column`.
    ///
    /// Every column is resolved before any series is added, so a missing or
    /// malformed column leaves no half-built chart behind.
    pub fn with_series(mut self, dataset: &Dataset, x_column: &str, specs: &[SeriesSpec]) -> Result<Self> {
        let xs = dataset.numeric_column(x_column)?;
        let columns = specs
            .iter()
            .map(|spec| dataset.numeric_column(spec.column).map(|ys| (spec, ys)))
            .collect::<Result<Vec<_>>>()?;

        for (spec, ys) in columns {
            let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys).collect();
            debug!("series '{}': {} points", spec.label, points.len());
            self.series.push(Series {
                label: spec.label.to_string(),
                points,
            });
        }
        Ok(self)
    }

    /// Legend entries in the order the series were added
    pub fn labels(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn x_range(&self) -> Range<f64> {
        padded_range(self.series.iter().flat_map(|s| s.finite_points().map(|(x, _)| x)))
    }

    pub fn y_range(&self) -> Range<f64> {
        padded_range(self.series.iter().flat_map(|s| s.finite_points().map(|(_, y)| y)))
    }

    /// Both axis ranges, or an error when either span is too wide to draw
    pub fn axis_ranges(&self) -> Result<(Range<f64>, Range<f64>)> {
        Ok((
            drawable("x", self.x_range())?,
            drawable("y", self.y_range())?,
        ))
    }
}

/// The coordinate mapping needs `end - start` to be a finite number.
fn drawable(axis: &str, range: Range<f64>) -> Result<Range<f64>> {
    if (range.end - range.start).is_finite() {
        Ok(range)
    } else {
        Err(ReportError::Render(format!(
            "{} axis span {:e}..{:e} is too wide to plot",
            axis, range.start, range.end
        )))
    }
}

/// Data extent plus a 5% margin each side
fn padded_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let bounds = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    });

    match bounds {
        None => 0.0..1.0,
        Some((lo, hi)) if hi == lo => {
            let pad = (lo.abs() * 0.05).max(1.0);
            clamp_finite(lo - pad)..clamp_finite(hi + pad)
        }
        Some((lo, hi)) => {
            // scaled separately so that hi - lo cannot overflow
            let pad = hi * 0.05 - lo * 0.05;
            clamp_finite(lo - pad)..clamp_finite(hi + pad)
        }
    }
}

fn clamp_finite(v: f64) -> f64 {
    v.clamp(f64::MIN, f64::MAX)
}

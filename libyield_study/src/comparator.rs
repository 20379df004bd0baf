use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use super::error::{ComparatorError, NormalizerError};
use super::measured::{unzip, Measured};
use super::normalizer::{NormalizedSeries, YieldNormalizer};
use super::style::SeriesStyle;
use super::table::{MeasurementTable, RunSeries};

/// The quantity compared across files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    RelativeYield,
    RelativeScaler,
    LiveTime,
    Yield,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Self::RelativeYield,
        Self::RelativeScaler,
        Self::LiveTime,
        Self::Yield,
    ];

    /// Axis label for this metric
    pub fn label(&self) -> &'static str {
        match self {
            Self::RelativeYield => "Relative Yield",
            Self::RelativeScaler => "Relative T2 Scalers / Charge",
            Self::LiveTime => "EDTM Live Time",
            Self::Yield => "Charge-Normalized Yield",
        }
    }

    fn extract<'a>(&self, series: &'a NormalizedSeries) -> &'a [Measured] {
        match self {
            Self::RelativeYield => &series.relative_yield,
            Self::RelativeScaler => &series.relative_scaler,
            Self::LiveTime => &series.live_time,
            Self::Yield => &series.yield_norm,
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The data for one file of a comparison, ready to be drawn
#[derive(Debug, Clone, Default)]
pub struct ComparisonRecord {
    pub source_label: String,
    pub style: SeriesStyle,
    pub avg_current: Vec<f64>,
    pub scaler_rate: Vec<f64>,
    pub metric_nominal: Vec<f64>,
    pub metric_err: Vec<f64>,
}

/// Comparator applies the YieldNormalizer independently to several tables (one per study phase)
/// for the same target. Each file is normalized against its own reference run; nothing is
/// normalized across files.
#[derive(Debug, Clone)]
pub struct Comparator {
    files: Vec<PathBuf>,
    styles: Vec<SeriesStyle>,
}

impl Comparator {
    /// Create a new Comparator. There must be exactly one style per file.
    pub fn new(files: &[PathBuf], styles: &[SeriesStyle]) -> Result<Self, ComparatorError> {
        if files.len() != styles.len() {
            return Err(ComparatorError::ConfigurationError(format!(
                "{} files were given with {} style tags",
                files.len(),
                styles.len()
            )));
        }
        if files.is_empty() {
            return Err(ComparatorError::ConfigurationError(String::from(
                "no files to compare",
            )));
        }
        Ok(Self {
            files: files.to_vec(),
            styles: styles.to_vec(),
        })
    }

    pub fn n_files(&self) -> usize {
        self.files.len()
    }

    /// Normalize every file and collect the chosen metric.
    ///
    /// `last_runs` keeps only that many of the highest current runs of each table before
    /// normalizing. `progress` is called with (files done, total files) after each file.
    pub fn compare<F: FnMut(usize, usize)>(
        &self,
        normalizer: &YieldNormalizer,
        metric: Metric,
        last_runs: Option<usize>,
        mut progress: F,
    ) -> Result<Vec<ComparisonRecord>, ComparatorError> {
        let mut records = Vec::with_capacity(self.files.len());
        for (idx, (path, style)) in self.files.iter().zip(self.styles.iter()).enumerate() {
            let series = normalize_file(path, normalizer, last_runs).map_err(|source| {
                ComparatorError::FileFailed {
                    path: path.clone(),
                    source,
                }
            })?;
            let (metric_nominal, metric_err) = unzip(metric.extract(&series));
            let source_label = style.label.clone().unwrap_or_else(|| default_label(path));
            log::info!(
                "Normalized {} runs from {} ({source_label})",
                series.avg_current.len(),
                path.display()
            );
            records.push(ComparisonRecord {
                source_label,
                style: style.clone(),
                avg_current: series.avg_current,
                scaler_rate: series.scaler_rate,
                metric_nominal,
                metric_err,
            });
            progress(idx + 1, self.files.len());
        }
        Ok(records)
    }
}

/// Load and normalize a single summary file
pub fn normalize_file(
    path: &Path,
    normalizer: &YieldNormalizer,
    last_runs: Option<usize>,
) -> Result<NormalizedSeries, NormalizerError> {
    let mut table = MeasurementTable::from_path(path)?;
    if let Some(n) = last_runs {
        table = table.last_runs(n)?;
    }
    let runs = RunSeries::from_table(&table)?;
    normalizer.normalize(&runs)
}

/// Label a file by its parent directory (the study phase), falling back to the file stem
fn default_label(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .or_else(|| path.file_stem())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

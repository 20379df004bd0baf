use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Could not open MeasurementTable because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("MeasurementTable failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("MeasurementTable failed to read delimited data: {0}")]
    CsvError(#[from] csv::Error),
    #[error("MeasurementTable is missing the required column {0}")]
    MissingColumn(String),
    #[error("MeasurementTable failed to parse value {value:?} in column {column} (row {row}) as a finite number")]
    ParseError {
        column: String,
        row: usize,
        value: String,
    },
    #[error("MeasurementTable has a header but contains no runs")]
    EmptyTable,
}

#[derive(Debug, Error)]
pub enum NormalizerError {
    #[error("Normalization failed due to division by zero: {quantity} is zero in row {row}")]
    DivisionByZero { quantity: String, row: usize },
    #[error("Reference index {index} is out of bounds for a table with {n_rows} runs")]
    InvalidReferenceIndex { index: usize, n_rows: usize },
    #[error("Series {column} has {len} entries but the table has {n_rows} runs")]
    MisalignedSeries {
        column: String,
        len: usize,
        n_rows: usize,
    },
    #[error("Normalization produced a non-finite {quantity} in row {row}")]
    NonFinite { quantity: String, row: usize },
    #[error("Normalization failed due to MeasurementTable error: {0}")]
    TableError(#[from] TableError),
}

#[derive(Debug, Error)]
pub enum ComparatorError {
    #[error("Comparator was given an invalid configuration: {0}")]
    ConfigurationError(String),
    #[error("Comparator failed on file {path:?}: {source}")]
    FileFailed {
        path: PathBuf,
        #[source]
        source: NormalizerError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Unrecognized marker code {0:?}")]
    BadMarker(String),
    #[error("Unrecognized color {0:?}")]
    BadColor(String),
}

#[derive(Debug, Error)]
pub enum SeriesNameError {
    #[error("Unrecognized series name {0:?}")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum FigureError {
    #[error("Figure failed while drawing: {0}")]
    Drawing(String),
    #[error("Figure has no records to draw")]
    EmptyFigure,
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for FigureError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Self::Drawing(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Report failed to write CSV: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Record {label} has series of unequal length")]
    MisalignedRecord { label: String },
}

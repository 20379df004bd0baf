use serde::Serialize;
use std::path::Path;

use super::comparator::ComparisonRecord;
use super::error::ReportError;

#[derive(Debug, Serialize)]
struct PointRow<'a> {
    source: &'a str,
    avg_current: f64,
    scaler_rate: f64,
    nominal: f64,
    error: f64,
}

/// Write every point of every record as one CSV row, with headers. Overwrites the file.
pub fn write_records_csv(path: &Path, records: &[ComparisonRecord]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut n_points = 0;
    for record in records {
        let n_rows = record.avg_current.len();
        if [
            record.scaler_rate.len(),
            record.metric_nominal.len(),
            record.metric_err.len(),
        ]
        .iter()
        .any(|len| *len != n_rows)
        {
            return Err(ReportError::MisalignedRecord {
                label: record.source_label.clone(),
            });
        }
        let points = record
            .avg_current
            .iter()
            .zip(record.scaler_rate.iter())
            .zip(record.metric_nominal.iter().zip(record.metric_err.iter()));
        for ((avg_current, scaler_rate), (nominal, error)) in points {
            writer.serialize(PointRow {
                source: &record.source_label,
                avg_current: *avg_current,
                scaler_rate: *scaler_rate,
                nominal: *nominal,
                error: *error,
            })?;
            n_points += 1;
        }
    }
    writer.flush()?;
    log::info!("Wrote {n_points} points to {}", path.display());
    Ok(())
}

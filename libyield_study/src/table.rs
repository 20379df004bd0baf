use std::io::Read;
use std::path::Path;

use fxhash::FxHashMap;

use super::constants::*;
use super::error::TableError;
use super::measured::Measured;

/// MeasurementTable is one summary file: a header naming the columns and one row per run.
///
/// Lines beginning with `#` are comments. Comments of the form `# key: value` with a numeric
/// value are kept as table parameters (target areal density, transparency, etc.). Rows are
/// sorted by ascending beam current on load, so row 0 is always the lowest current run.
/// Cells are kept as text and only parsed when a column is requested.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    headers: Vec<String>,
    column_map: FxHashMap<String, usize>,
    rows: Vec<Vec<String>>,
    parameters: FxHashMap<String, f64>,
}

impl MeasurementTable {
    /// Load a table from a file
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        if !path.exists() {
            return Err(TableError::BadFilePath(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let table = Self::parse(&contents)?;
        log::debug!(
            "Loaded {} runs with {} columns from {}",
            table.n_rows(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load a table from any reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, TableError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self, TableError> {
        let mut table = Self {
            parameters: parse_parameters(contents),
            ..Default::default()
        };

        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(COMMENT_MARKER))
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        table.headers = reader.headers()?.iter().map(String::from).collect();
        for (idx, name) in table.headers.iter().enumerate() {
            // Duplicated names resolve to the first occurrence
            table.column_map.entry(name.clone()).or_insert(idx);
        }
        for record in reader.records() {
            table.rows.push(record?.iter().map(String::from).collect());
        }

        if !table.has_column(AVG_CURRENT) {
            return Err(TableError::MissingColumn(AVG_CURRENT.to_string()));
        }
        if table.rows.is_empty() {
            return Err(TableError::EmptyTable);
        }

        table.sort_by_current()?;
        Ok(table)
    }

    fn sort_by_current(&mut self) -> Result<(), TableError> {
        let current = self.column(AVG_CURRENT)?;
        let mut order: Vec<usize> = (0..current.len()).collect();
        order.sort_by(|a, b| current[*a].total_cmp(&current[*b]));
        let mut rows: Vec<Option<Vec<String>>> = self.rows.drain(..).map(Some).collect();
        self.rows = order
            .into_iter()
            .filter_map(|idx| rows[idx].take())
            .collect();
        Ok(())
    }

    /// Keep only the `n` highest current runs. Keeps everything if `n` exceeds the table length.
    pub fn last_runs(mut self, n: usize) -> Result<Self, TableError> {
        if n == 0 {
            return Err(TableError::EmptyTable);
        }
        if n < self.rows.len() {
            let drop = self.rows.len() - n;
            self.rows.drain(..drop);
        }
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_map.contains_key(name)
    }

    /// Get a named column as a series of floats, ordered by ascending beam current
    pub fn column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let idx = *self
            .column_map
            .get(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| parse_cell(name, row, &cells[idx]))
            .collect()
    }

    /// Get a pair of columns (value, absolute uncertainty) as a measured series
    pub fn measured_column(&self, value: &str, error: &str) -> Result<Vec<Measured>, TableError> {
        let values = self.column(value)?;
        let errors = self.column(error)?;
        Ok(values
            .into_iter()
            .zip(errors)
            .map(|(v, e)| Measured::new(v, e))
            .collect())
    }

    pub fn parameters(&self) -> &FxHashMap<String, f64> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<f64> {
        self.parameters.get(key).copied()
    }
}

fn parse_cell(column: &str, row: usize, cell: &str) -> Result<f64, TableError> {
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TableError::ParseError {
            column: column.to_string(),
            row,
            value: cell.to_string(),
        }),
    }
}

/// Collect `# key: value` comment lines whose value is numeric
fn parse_parameters(contents: &str) -> FxHashMap<String, f64> {
    let mut parameters = FxHashMap::default();
    for line in contents.lines() {
        let Some(body) = line.trim_start().strip_prefix(COMMENT_MARKER as char) else {
            continue;
        };
        let body = body.trim_start_matches(COMMENT_MARKER as char).trim();
        if let Some((key, value)) = body.split_once(':') {
            match value.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => {
                    parameters.insert(key.trim().to_string(), v);
                }
                _ => log::trace!("Ignoring non-numeric comment parameter: {body}"),
            }
        }
    }
    parameters
}

/// RunSeries holds every column needed for the normalization, typed and aligned row-for-row.
#[derive(Debug, Clone, Default)]
pub struct RunSeries {
    pub avg_current: Vec<f64>,
    pub charge: Vec<f64>,
    pub real_yield: Vec<Measured>,
    pub hms_tracking: Vec<Measured>,
    pub shms_tracking: Vec<Measured>,
    pub live_time: Vec<Measured>,
    pub multi_track_eff: Vec<f64>,
    pub scaler_rate: Vec<f64>,
    pub beam_time: Vec<f64>,
}

impl RunSeries {
    /// Extract the series from a table.
    ///
    /// All required columns are checked before any of them is parsed, so a table missing a
    /// column fails here and not somewhere inside the arithmetic.
    pub fn from_table(table: &MeasurementTable) -> Result<Self, TableError> {
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !table.has_column(c)) {
            return Err(TableError::MissingColumn(missing.to_string()));
        }
        Ok(Self {
            avg_current: table.column(AVG_CURRENT)?,
            charge: table.column(CHARGE)?,
            real_yield: table.measured_column(REAL_YIELD, REAL_YIELD_ERR)?,
            hms_tracking: table.measured_column(HMS_TRK_EFF, HMS_TRK_EFF_ERR)?,
            shms_tracking: table.measured_column(SHMS_TRK_EFF, SHMS_TRK_EFF_ERR)?,
            live_time: table.measured_column(TOTAL_LIVE_TIME, TOTAL_LIVE_TIME_ERR)?,
            multi_track_eff: table.column(MULTI_TRACK_EFF)?,
            scaler_rate: table.column(T2_SCALER_RATE)?,
            beam_time: table.column(BEAM_TIME)?,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.avg_current.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a complete summary table from per-row values. Efficiencies and live time are 1 +/- 0.
    pub(crate) fn make_csv(current: &[f64], charge: &[f64], yields: &[(f64, f64)]) -> String {
        let mut csv = String::from(
            "# cafe summary\n# target_areal_density: 0.4850\n\
             run,avg_current,charge,real_Yield,real_Yield_err,hTrkEff,hTrkEff_err,pTrkEff,pTrkEff_err,tLT,tLT_err_Bi,multi_track_eff,T2_scl_rate,beam_time\n",
        );
        for (idx, ((i, q), (n, n_err))) in current.iter().zip(charge).zip(yields).enumerate() {
            csv.push_str(&format!(
                "{},{i},{q},{n},{n_err},1.0,0.0,1.0,0.0,1.0,0.0,1.0,{},100.0\n",
                16000 + idx,
                i * 10.0
            ));
        }
        csv
    }

    #[test]
    fn test_rows_sorted_by_current() {
        let csv = make_csv(
            &[30.0, 10.0, 20.0],
            &[3.0, 1.0, 2.0],
            &[(300.0, 3.0), (100.0, 1.0), (200.0, 2.0)],
        );
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.column("avg_current").unwrap(), vec![10.0, 20.0, 30.0]);
        assert_eq!(table.column("charge").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(table.column("run").unwrap(), vec![16001.0, 16002.0, 16000.0]);
        let yields = table.measured_column("real_Yield", "real_Yield_err").unwrap();
        assert_eq!(yields[2], Measured::new(300.0, 3.0));
    }

    #[test]
    fn test_comments_and_parameters() {
        let csv = "# transparency: 0.56\n#free text comment\n## Z: 20\navg_current, charge\n# skipped: row\n5.0, 1.0\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.headers(), &["avg_current", "charge"]);
        assert_eq!(table.column("charge").unwrap(), vec![1.0]);
        assert_eq!(table.parameter("transparency"), Some(0.56));
        assert_eq!(table.parameter("Z"), Some(20.0));
        assert_eq!(table.parameter("skipped"), None);
    }

    #[test]
    fn test_missing_column() {
        let csv = make_csv(&[10.0], &[1.0], &[(1.0, 0.1)]);
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        match table.column("hTrkEff_err_Bi") {
            Err(TableError::MissingColumn(name)) => assert_eq!(name, "hTrkEff_err_Bi"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_sort_column() {
        let csv = "charge,real_Yield\n1.0,2.0\n";
        assert!(matches!(
            MeasurementTable::from_reader(csv.as_bytes()),
            Err(TableError::MissingColumn(name)) if name == "avg_current"
        ));
    }

    #[test]
    fn test_series_validates_columns_eagerly() {
        let csv = "avg_current,charge,real_Yield\n1.0,1.0,oops\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        // The bad real_Yield cell is never reached
        assert!(matches!(
            RunSeries::from_table(&table),
            Err(TableError::MissingColumn(name)) if name == "real_Yield_err"
        ));
    }

    #[test]
    fn test_parse_error() {
        let csv = "avg_current,charge\n1.0,abc\n2.0,nan\n";
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        match table.column("charge") {
            Err(TableError::ParseError { column, row, value }) => {
                assert_eq!(column, "charge");
                assert_eq!(row, 0);
                assert_eq!(value, "abc");
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table() {
        let csv = "# nothing\navg_current,charge\n";
        assert!(matches!(
            MeasurementTable::from_reader(csv.as_bytes()),
            Err(TableError::EmptyTable)
        ));
    }

    #[test]
    fn test_last_runs() {
        let csv = make_csv(
            &[40.0, 10.0, 30.0, 20.0],
            &[1.0; 4],
            &[(4.0, 0.0), (1.0, 0.0), (3.0, 0.0), (2.0, 0.0)],
        );
        let table = MeasurementTable::from_reader(csv.as_bytes()).unwrap();
        let tail = table.clone().last_runs(2).unwrap();
        assert_eq!(tail.column("avg_current").unwrap(), vec![30.0, 40.0]);
        assert_eq!(table.clone().last_runs(10).unwrap().n_rows(), 4);
        assert!(matches!(table.last_runs(0), Err(TableError::EmptyTable)));
    }

    #[test]
    fn test_bad_file_path() {
        let path = Path::new("/definitely/not/a/summary.csv");
        assert!(matches!(
            MeasurementTable::from_path(path),
            Err(TableError::BadFilePath(_))
        ));
    }
}

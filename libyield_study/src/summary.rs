use std::fmt::Display;

use super::error::NormalizerError;
use super::measured::Measured;
use super::table::RunSeries;

/// Aggregate quantities of a whole summary table.
///
/// Charge and yield are summed over runs (yield errors in quadrature). Tracking efficiencies
/// and live time are expected to be roughly constant for runs of the same kinematic setting,
/// so they are combined as inverse-variance weighted means.
#[derive(Debug, Clone, Default)]
pub struct TableSummary {
    pub n_runs: usize,
    pub total_charge: f64,
    pub total_yield: Measured,
    pub hms_tracking: Measured,
    pub shms_tracking: Measured,
    pub live_time: Measured,
}

impl TableSummary {
    pub fn from_series(runs: &RunSeries) -> Result<Self, NormalizerError> {
        let total_yield = runs
            .real_yield
            .iter()
            .fold(Measured::default(), |acc, y| {
                Measured::new(acc.value + y.value, acc.error.hypot(y.error))
            });
        Ok(Self {
            n_runs: runs.n_rows(),
            total_charge: runs.charge.iter().sum(),
            total_yield,
            hms_tracking: weighted_mean(&runs.hms_tracking, "hTrkEff_err")?,
            shms_tracking: weighted_mean(&runs.shms_tracking, "pTrkEff_err")?,
            live_time: weighted_mean(&runs.live_time, "tLT_err_Bi")?,
        })
    }
}

impl Display for TableSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "runs: {} -- charge: {:.4} -- yield: {:.1} +/- {:.1} -- HMS trk eff: {:.4} +/- {:.4} -- SHMS trk eff: {:.4} +/- {:.4} -- live time: {:.4} +/- {:.4}",
            self.n_runs,
            self.total_charge,
            self.total_yield.value,
            self.total_yield.error,
            self.hms_tracking.value,
            self.hms_tracking.error,
            self.shms_tracking.value,
            self.shms_tracking.error,
            self.live_time.value,
            self.live_time.error,
        )
    }
}

/// Inverse-variance weighted mean. A zero uncertainty would be an infinite weight and fails.
pub fn weighted_mean(series: &[Measured], quantity: &str) -> Result<Measured, NormalizerError> {
    let mut sum_weights = 0.0;
    let mut sum_weighted = 0.0;
    for (row, m) in series.iter().enumerate() {
        if m.error == 0.0 {
            return Err(NormalizerError::DivisionByZero {
                quantity: quantity.to_string(),
                row,
            });
        }
        let weight = 1.0 / (m.error * m.error);
        sum_weights += weight;
        sum_weighted += weight * m.value;
    }
    if sum_weights == 0.0 {
        return Err(NormalizerError::DivisionByZero {
            quantity: format!("sum of {quantity} weights"),
            row: 0,
        });
    }
    Ok(Measured::new(
        sum_weighted / sum_weights,
        1.0 / sum_weights.sqrt(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_mean() {
        let series = [Measured::new(0.90, 0.01), Measured::new(0.96, 0.02)];
        let mean = weighted_mean(&series, "tLT_err_Bi").unwrap();
        // weights 10000 and 2500
        assert!((mean.value - (0.90 * 10000.0 + 0.96 * 2500.0) / 12500.0).abs() < 1e-12);
        assert!((mean.error - 1.0 / 12500.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_uncertainty_fails() {
        let series = [Measured::new(0.90, 0.01), Measured::exact(0.96)];
        assert!(matches!(
            weighted_mean(&series, "hTrkEff_err"),
            Err(NormalizerError::DivisionByZero { row: 1, .. })
        ));
    }

    #[test]
    fn test_empty_series_fails() {
        assert!(weighted_mean(&[], "pTrkEff_err").is_err());
    }

    #[test]
    fn test_table_summary() {
        let runs = RunSeries {
            avg_current: vec![10.0, 20.0],
            charge: vec![1.5, 2.5],
            real_yield: vec![Measured::new(300.0, 3.0), Measured::new(400.0, 4.0)],
            hms_tracking: vec![Measured::new(0.98, 0.01); 2],
            shms_tracking: vec![Measured::new(0.95, 0.02); 2],
            live_time: vec![Measured::new(0.9, 0.01), Measured::new(0.9, 0.01)],
            multi_track_eff: vec![1.0; 2],
            scaler_rate: vec![100.0, 200.0],
            beam_time: vec![600.0; 2],
        };
        let summary = TableSummary::from_series(&runs).unwrap();
        assert_eq!(summary.n_runs, 2);
        assert_eq!(summary.total_charge, 4.0);
        assert_eq!(summary.total_yield.value, 700.0);
        assert!((summary.total_yield.error - 5.0).abs() < 1e-12);
        assert!((summary.hms_tracking.value - 0.98).abs() < 1e-12);
        assert!((summary.live_time.error - 0.01 / 2.0_f64.sqrt()).abs() < 1e-12);
    }
}

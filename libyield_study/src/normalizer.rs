use std::fmt::Display;
use std::str::FromStr;

use super::constants::{
    BEAM_TIME, CHARGE, HMS_TRK_EFF, KHZ_TO_HZ, MULTI_TRACK_EFF, REAL_YIELD, SHMS_TRK_EFF,
    T2_SCALER_RATE, TOTAL_LIVE_TIME,
};
use super::error::{NormalizerError, SeriesNameError};
use super::measured::{unzip, Measured};
use super::table::RunSeries;

/// The named series a NormalizedSeries can hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesName {
    RelYieldNom,
    RelYieldErr,
    RelT2Nom,
    RelT2Err,
    YieldNom,
    YieldErr,
    T2Nom,
    T2Err,
    LiveTimeNom,
    LiveTimeErr,
}

impl FromStr for SeriesName {
    type Err = SeriesNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rel_yield_nom" => Ok(Self::RelYieldNom),
            "rel_yield_err" => Ok(Self::RelYieldErr),
            "rel_T2_nom" => Ok(Self::RelT2Nom),
            "rel_T2_err" => Ok(Self::RelT2Err),
            "yield_nom" => Ok(Self::YieldNom),
            "yield_err" => Ok(Self::YieldErr),
            "T2_nom" => Ok(Self::T2Nom),
            "T2_err" => Ok(Self::T2Err),
            "live_time_nom" => Ok(Self::LiveTimeNom),
            "live_time_err" => Ok(Self::LiveTimeErr),
            _ => Err(SeriesNameError::Unknown(s.to_string())),
        }
    }
}

impl Display for SeriesName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RelYieldNom => "rel_yield_nom",
            Self::RelYieldErr => "rel_yield_err",
            Self::RelT2Nom => "rel_T2_nom",
            Self::RelT2Err => "rel_T2_err",
            Self::YieldNom => "yield_nom",
            Self::YieldErr => "yield_err",
            Self::T2Nom => "T2_nom",
            Self::T2Err => "T2_err",
            Self::LiveTimeNom => "live_time_nom",
            Self::LiveTimeErr => "live_time_err",
        };
        write!(f, "{name}")
    }
}

/// Result of normalizing one table. All series are aligned with `avg_current`.
#[derive(Debug, Clone, Default)]
pub struct NormalizedSeries {
    pub reference_index: usize,
    pub avg_current: Vec<f64>,
    /// T2 scaler rate in kHz
    pub scaler_rate: Vec<f64>,
    /// Charge and efficiency corrected yield
    pub yield_norm: Vec<Measured>,
    pub relative_yield: Vec<Measured>,
    /// T2 scaler counts per unit charge
    pub scaler_norm: Vec<Measured>,
    pub relative_scaler: Vec<Measured>,
    pub live_time: Vec<Measured>,
}

impl NormalizedSeries {
    /// Get one of the named series
    pub fn select(&self, name: SeriesName) -> Vec<f64> {
        let (series, nominal) = match name {
            SeriesName::RelYieldNom => (&self.relative_yield, true),
            SeriesName::RelYieldErr => (&self.relative_yield, false),
            SeriesName::RelT2Nom => (&self.relative_scaler, true),
            SeriesName::RelT2Err => (&self.relative_scaler, false),
            SeriesName::YieldNom => (&self.yield_norm, true),
            SeriesName::YieldErr => (&self.yield_norm, false),
            SeriesName::T2Nom => (&self.scaler_norm, true),
            SeriesName::T2Err => (&self.scaler_norm, false),
            SeriesName::LiveTimeNom => (&self.live_time, true),
            SeriesName::LiveTimeErr => (&self.live_time, false),
        };
        let (values, errors) = unzip(series);
        if nominal {
            values
        } else {
            errors
        }
    }
}

/// YieldNormalizer computes the charge and efficiency normalized yield and the charge
/// normalized T2 scaler counts of a table, each relative to a reference run.
///
/// The reference run is given as an index into the current-sorted table (0 is the lowest
/// current run). Charge and the multiplicity efficiency carry no uncertainty in the summary
/// tables and are treated as exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldNormalizer {
    reference_index: usize,
}

impl YieldNormalizer {
    pub fn new(reference_index: usize) -> Self {
        Self { reference_index }
    }

    pub fn reference_index(&self) -> usize {
        self.reference_index
    }

    pub fn normalize(&self, runs: &RunSeries) -> Result<NormalizedSeries, NormalizerError> {
        let n_rows = runs.n_rows();
        check_aligned(runs)?;
        if self.reference_index >= n_rows {
            return Err(NormalizerError::InvalidReferenceIndex {
                index: self.reference_index,
                n_rows,
            });
        }

        let mut yield_norm = Vec::with_capacity(n_rows);
        let mut scaler_norm = Vec::with_capacity(n_rows);
        for row in 0..n_rows {
            let charge = nonzero(Measured::exact(runs.charge[row]), "charge", row)?;
            let correction = charge
                * nonzero(runs.hms_tracking[row], "hTrkEff", row)?
                * nonzero(runs.shms_tracking[row], "pTrkEff", row)?
                * nonzero(runs.live_time[row], "tLT", row)?
                * nonzero(
                    Measured::exact(runs.multi_track_eff[row]),
                    "multi_track_eff",
                    row,
                )?;

            let corrected = runs.real_yield[row]
                .checked_div(&correction)
                .ok_or_else(|| division_by_zero("efficiency correction", row))?;
            yield_norm.push(finite(corrected, "yield", row)?);

            let t2_counts = runs.scaler_rate[row] * KHZ_TO_HZ * runs.beam_time[row];
            scaler_norm.push(finite(
                Measured::exact(t2_counts / charge.value),
                "T2 scaler",
                row,
            )?);
        }

        let relative_yield = relative_to(&yield_norm, self.reference_index, "reference yield")?;
        let relative_scaler =
            relative_to(&scaler_norm, self.reference_index, "reference T2 scaler")?;

        Ok(NormalizedSeries {
            reference_index: self.reference_index,
            avg_current: runs.avg_current.clone(),
            scaler_rate: runs.scaler_rate.clone(),
            yield_norm,
            relative_yield,
            scaler_norm,
            relative_scaler,
            live_time: runs.live_time.clone(),
        })
    }
}

fn division_by_zero(quantity: &str, row: usize) -> NormalizerError {
    NormalizerError::DivisionByZero {
        quantity: quantity.to_string(),
        row,
    }
}

fn nonzero(value: Measured, quantity: &str, row: usize) -> Result<Measured, NormalizerError> {
    if value.value == 0.0 {
        Err(division_by_zero(quantity, row))
    } else {
        Ok(value)
    }
}

fn finite(value: Measured, quantity: &str, row: usize) -> Result<Measured, NormalizerError> {
    if value.value.is_finite() && value.error.is_finite() {
        Ok(value)
    } else {
        Err(NormalizerError::NonFinite {
            quantity: quantity.to_string(),
            row,
        })
    }
}

/// Every series must have one entry per run
fn check_aligned(runs: &RunSeries) -> Result<(), NormalizerError> {
    let n_rows = runs.n_rows();
    let lengths = [
        (CHARGE, runs.charge.len()),
        (REAL_YIELD, runs.real_yield.len()),
        (HMS_TRK_EFF, runs.hms_tracking.len()),
        (SHMS_TRK_EFF, runs.shms_tracking.len()),
        (TOTAL_LIVE_TIME, runs.live_time.len()),
        (MULTI_TRACK_EFF, runs.multi_track_eff.len()),
        (T2_SCALER_RATE, runs.scaler_rate.len()),
        (BEAM_TIME, runs.beam_time.len()),
    ];
    match lengths.iter().find(|(_, len)| *len != n_rows) {
        Some((column, len)) => Err(NormalizerError::MisalignedSeries {
            column: column.to_string(),
            len: *len,
            n_rows,
        }),
        None => Ok(()),
    }
}

/// Divide every element by the element at `reference`.
///
/// The reference element becomes exactly 1 with no uncertainty. Other rows are independent
/// measurements, so their uncertainty combines with that of the reference.
fn relative_to(
    series: &[Measured],
    reference: usize,
    quantity: &str,
) -> Result<Vec<Measured>, NormalizerError> {
    let denominator = nonzero(series[reference], quantity, reference)?;
    series
        .iter()
        .enumerate()
        .map(|(row, value)| {
            if row == reference {
                Ok(Measured::exact(1.0))
            } else {
                value
                    .checked_div(&denominator)
                    .ok_or_else(|| division_by_zero(quantity, reference))
                    .and_then(|ratio| finite(ratio, quantity, row))
            }
        })
        .collect()
}

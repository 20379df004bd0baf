use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::Mul;

/// A measured quantity: a nominal value and its (one standard deviation) absolute uncertainty.
///
/// Arithmetic uses first-order propagation for uncorrelated quantities. For a product or
/// quotient of nonzero factors this is the usual rule that relative variances add in
/// quadrature. The absolute form is used internally so that a zero nominal value in a
/// numerator still propagates a finite uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measured {
    pub value: f64,
    pub error: f64,
}

impl Measured {
    pub fn new(value: f64, error: f64) -> Self {
        Self {
            value,
            error: error.abs(),
        }
    }

    /// A quantity with no uncertainty
    pub fn exact(value: f64) -> Self {
        Self { value, error: 0.0 }
    }

    /// Relative uncertainty (error / |value|). None if the value is zero.
    pub fn relative_error(&self) -> Option<f64> {
        if self.value == 0.0 {
            None
        } else {
            Some(self.error / self.value.abs())
        }
    }

    /// Multiply by an exact constant
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            value: self.value * factor,
            error: self.error * factor.abs(),
        }
    }

    /// Divide by another uncorrelated measured quantity.
    ///
    /// Returns None if the divisor is zero.
    pub fn checked_div(&self, rhs: &Measured) -> Option<Self> {
        if rhs.value == 0.0 {
            return None;
        }
        let value = self.value / rhs.value;
        let from_numerator = self.error / rhs.value;
        let from_denominator = self.value * rhs.error / (rhs.value * rhs.value);
        Some(Self {
            value,
            error: from_numerator.hypot(from_denominator),
        })
    }
}

impl Mul for Measured {
    type Output = Measured;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            value: self.value * rhs.value,
            error: (rhs.value * self.error).hypot(self.value * rhs.error),
        }
    }
}

impl Mul<f64> for Measured {
    type Output = Measured;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Display for Measured {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} +/- {}", self.value, self.error)
    }
}

/// Split a series of measured values into (values, errors)
pub fn unzip(series: &[Measured]) -> (Vec<f64>, Vec<f64>) {
    series.iter().map(|m| (m.value, m.error)).unzip()
}

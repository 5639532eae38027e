// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::SbdError;
use chrono::NaiveDate;

/// One observation of the clean input table.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub log_return: f64,
}

/// Validated, immutable price series.
///
/// Dates are strictly increasing with no duplicates; the vector index is the
/// canonical ordinal used by detectors and all downstream joins. The core
/// never mutates a series after construction. Numeric sanity (NaN/Inf) is the
/// responsibility of the upstream cleaning stage.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, enforcing strict date ordering.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SbdError> {
        for window in points.windows(2) {
            if window[1].date <= window[0].date {
                return Err(SbdError::invalid_input(format!(
                    "series dates must be strictly increasing; got {} followed by {}",
                    window[0].date, window[1].date
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.points.get(index).map(|p| p.date)
    }

    /// Price column as a contiguous buffer for detector input.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Log-return column as a contiguous buffer.
    pub fn log_returns(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.log_return).collect()
    }
}

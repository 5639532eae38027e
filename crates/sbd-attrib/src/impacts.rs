// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::segments::{
    MIN_SEGMENT_OBSERVATIONS, annualized_volatility_pct, mean, segment_bounds,
    validate_change_points,
};
use chrono::NaiveDate;
use sbd_core::{PriceSeries, SbdError};
use serde::{Deserialize, Serialize};

/// Before/after deltas across one change-point boundary.
///
/// `change_point_date` is the first observation date of the new regime.
/// Percentage deltas are `NaN` when the "before" value is zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeImpact {
    pub change_point_date: NaiveDate,
    pub from_price: f64,
    pub to_price: f64,
    pub from_volatility: f64,
    pub to_volatility: f64,
    pub price_change_pct: f64,
    pub volatility_change_pct: f64,
}

fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        f64::NAN
    } else {
        (to - from) / from * 100.0
    }
}

/// Computes before/after deltas for every boundary between two retained
/// segments that are contiguous in the series.
///
/// A dropped short segment breaks contiguity, so both boundaries around it
/// produce no impact row. Uses the same retention floor as
/// [`crate::segments::segment_statistics`].
pub fn change_impacts(
    series: &PriceSeries,
    change_points: &[usize],
) -> Result<Vec<ChangeImpact>, SbdError> {
    let n = series.len();
    validate_change_points(n, change_points)?;
    if n == 0 {
        return Ok(Vec::new());
    }

    let retained: Vec<(usize, usize)> = segment_bounds(n, change_points)
        .into_iter()
        .filter(|&(start, end)| end - start >= MIN_SEGMENT_OBSERVATIONS)
        .collect();

    let mut impacts = Vec::new();
    for pair in retained.windows(2) {
        let (before_start, before_end) = pair[0];
        let (after_start, after_end) = pair[1];
        if before_end != after_start {
            continue;
        }

        let date = series.date(after_start).ok_or_else(|| {
            SbdError::data_consistency(format!(
                "segment start {after_start} has no observation in a series of length {n}"
            ))
        })?;

        let before = &series.points()[before_start..before_end];
        let after = &series.points()[after_start..after_end];
        let from_price = mean(&before.iter().map(|p| p.price).collect::<Vec<f64>>());
        let to_price = mean(&after.iter().map(|p| p.price).collect::<Vec<f64>>());
        let from_volatility =
            annualized_volatility_pct(&before.iter().map(|p| p.log_return).collect::<Vec<f64>>());
        let to_volatility =
            annualized_volatility_pct(&after.iter().map(|p| p.log_return).collect::<Vec<f64>>());

        impacts.push(ChangeImpact {
            change_point_date: date,
            from_price,
            to_price,
            from_volatility,
            to_volatility,
            price_change_pct: pct_change(from_price, to_price),
            volatility_change_pct: pct_change(from_volatility, to_volatility),
        });
    }
    Ok(impacts)
}

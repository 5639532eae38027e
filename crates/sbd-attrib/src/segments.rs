// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use chrono::NaiveDate;
use sbd_core::{PriceSeries, SbdError};
use serde::{Deserialize, Serialize};

/// Segments with fewer observations than this are dropped from every
/// attribution table; statistics over shorter windows are too noisy to act on.
pub const MIN_SEGMENT_OBSERVATIONS: usize = 5;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Descriptive statistics for one retained regime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentStat {
    /// Dense 1-based rank among retained segments, in chronological order.
    pub segment_id: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    pub mean_price: f64,
    pub median_price: f64,
    /// Mean daily log return, in percent.
    pub mean_log_return_pct: f64,
    /// Sample standard deviation of daily log returns, annualized over 252
    /// trading days, in percent.
    pub annualized_volatility_pct: f64,
    pub n_observations: usize,
}

/// Half-open `[start, end)` index bounds for every segment, short ones
/// included.
pub(crate) fn segment_bounds(n: usize, change_points: &[usize]) -> Vec<(usize, usize)> {
    let mut bounds = Vec::with_capacity(change_points.len() + 1);
    let mut start = 0usize;
    for &cp in change_points {
        bounds.push((start, cp));
        start = cp;
    }
    bounds.push((start, n));
    bounds
}

pub(crate) fn validate_change_points(n: usize, change_points: &[usize]) -> Result<(), SbdError> {
    let mut previous = 0usize;
    for &cp in change_points {
        if cp == 0 || cp >= n {
            return Err(SbdError::invalid_input(format!(
                "change point {cp} outside the interior (0, {n}) of the series"
            )));
        }
        if cp <= previous {
            return Err(SbdError::invalid_input(format!(
                "change points must be strictly increasing; got {cp} after {previous}"
            )));
        }
        previous = cp;
    }
    Ok(())
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (Bessel-corrected); 0.0 for fewer than two
/// observations.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

pub(crate) fn annualized_volatility_pct(log_returns: &[f64]) -> f64 {
    sample_std(log_returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// Computes per-regime statistics for the segments induced by `change_points`.
///
/// Segments shorter than [`MIN_SEGMENT_OBSERVATIONS`] are skipped and do not
/// consume a `segment_id`. An empty series yields an empty table; an empty
/// change-point list yields one segment spanning the whole series (when long
/// enough to retain).
pub fn segment_statistics(
    series: &PriceSeries,
    change_points: &[usize],
) -> Result<Vec<SegmentStat>, SbdError> {
    let n = series.len();
    validate_change_points(n, change_points)?;
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut stats = Vec::new();
    for (start, end) in segment_bounds(n, change_points) {
        let len = end - start;
        if len < MIN_SEGMENT_OBSERVATIONS {
            continue;
        }
        let points = &series.points()[start..end];
        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        let log_returns: Vec<f64> = points.iter().map(|p| p.log_return).collect();
        let start_date = points[0].date;
        let end_date = points[len - 1].date;

        stats.push(SegmentStat {
            segment_id: stats.len() + 1,
            start_date,
            end_date,
            duration_days: (end_date - start_date).num_days(),
            mean_price: mean(&prices),
            median_price: median(&prices),
            mean_log_return_pct: mean(&log_returns) * 100.0,
            annualized_volatility_pct: annualized_volatility_pct(&log_returns),
            n_observations: len,
        });
    }
    Ok(stats)
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::model::CostModel;
use sbd_core::{
    ReproMode, SbdError, prefix_sum_squares, prefix_sum_squares_kahan, prefix_sums,
    prefix_sums_kahan,
};

/// Floor applied to the MLE variance so constant segments keep a finite
/// log-likelihood instead of collapsing to `ln(0)`.
const VARIANCE_FLOOR: f64 = 1e-12;

/// Gaussian segment cost sensitive to shifts in both mean and variance.
///
/// Segment conventions use half-open intervals: `[start, end)`.
///
/// The returned value is the concentrated negative log-likelihood up to
/// additive and multiplicative constants that are independent of the
/// segmentation: `len * ln(max(var_mle, floor))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostNormalMeanVar {
    pub repro_mode: ReproMode,
}

impl CostNormalMeanVar {
    pub const fn new(repro_mode: ReproMode) -> Self {
        Self { repro_mode }
    }
}

impl Default for CostNormalMeanVar {
    fn default() -> Self {
        Self::new(ReproMode::Balanced)
    }
}

/// Prefix-stat cache for O(1) Gaussian segment-cost queries.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalCache {
    prefix_sum: Vec<f64>,
    prefix_sum_sq: Vec<f64>,
    n: usize,
}

impl CostModel for CostNormalMeanVar {
    type Cache = NormalCache;

    fn name(&self) -> &'static str {
        "normal_mean_var"
    }

    fn validate(&self, x: &[f64]) -> Result<(), SbdError> {
        if x.is_empty() {
            return Err(SbdError::invalid_input(
                "CostNormalMeanVar requires n >= 1; got n=0",
            ));
        }

        for (t, &value) in x.iter().enumerate() {
            if !value.is_finite() {
                return Err(SbdError::invalid_input(format!(
                    "CostNormalMeanVar requires finite observations; got value={value} at t={t}"
                )));
            }
        }

        Ok(())
    }

    fn precompute(&self, x: &[f64]) -> Result<Self::Cache, SbdError> {
        let (prefix_sum, prefix_sum_sq) = if matches!(self.repro_mode, ReproMode::Strict) {
            (prefix_sums_kahan(x), prefix_sum_squares_kahan(x))
        } else {
            (prefix_sums(x), prefix_sum_squares(x))
        };

        Ok(NormalCache {
            prefix_sum,
            prefix_sum_sq,
            n: x.len(),
        })
    }

    fn segment_cost(&self, cache: &Self::Cache, start: usize, end: usize) -> f64 {
        assert!(
            start < end,
            "segment_cost requires start < end; got start={start}, end={end}"
        );
        assert!(
            end <= cache.n,
            "segment_cost requires end <= n; got end={end}, n={}",
            cache.n
        );

        let len = (end - start) as f64;
        let sum = cache.prefix_sum[end] - cache.prefix_sum[start];
        let sum_sq = cache.prefix_sum_sq[end] - cache.prefix_sum_sq[start];

        let mean = sum / len;
        let variance = (sum_sq / len - mean * mean).max(VARIANCE_FLOOR);

        len * variance.ln()
    }
}

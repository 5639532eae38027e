// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use sbd_core::SbdError;
use serde::{Deserialize, Serialize};

/// Segment cost family used by the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    /// Gaussian cost sensitive to shifts in both mean and variance.
    #[default]
    NormalMeanVar,
}

/// Search algorithm used to place change points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    #[default]
    Pelt,
}

/// Tuning knobs for one analysis run.
///
/// `penalty_values` drives the sweep table; `primary_penalty` selects the run
/// whose change points feed the downstream attribution tables. The primary
/// penalty does not have to appear in the sweep list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub cost_function: CostFunction,
    pub search_method: SearchMethod,
    pub penalty_values: Vec<f64>,
    pub min_segment_size: usize,
    pub jump: usize,
    pub primary_penalty: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            cost_function: CostFunction::NormalMeanVar,
            search_method: SearchMethod::Pelt,
            penalty_values: vec![2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 35.0],
            min_segment_size: 22,
            jump: 5,
            primary_penalty: 30.0,
        }
    }
}

impl DetectionConfig {
    /// Rejects parameter combinations that cannot drive a valid search.
    pub fn validate(&self) -> Result<(), SbdError> {
        if self.min_segment_size < 1 {
            return Err(SbdError::invalid_parameter(
                "min_segment_size must be >= 1; got 0",
            ));
        }
        if self.jump < 1 {
            return Err(SbdError::invalid_parameter("jump must be >= 1; got 0"));
        }
        for &penalty in &self.penalty_values {
            if !penalty.is_finite() || penalty <= 0.0 {
                return Err(SbdError::invalid_parameter(format!(
                    "penalty_values must be finite and > 0; got {penalty}"
                )));
            }
        }
        if !self.primary_penalty.is_finite() || self.primary_penalty <= 0.0 {
            return Err(SbdError::invalid_parameter(format!(
                "primary_penalty must be finite and > 0; got {}",
                self.primary_penalty
            )));
        }
        Ok(())
    }
}

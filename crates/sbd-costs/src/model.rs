// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use sbd_core::SbdError;

/// Segment cost contract used by offline detectors.
///
/// A model validates its input once, precomputes a prefix-statistic cache,
/// and then answers `segment_cost` queries over half-open segments
/// `[start, end)` in O(1). Lower cost means a better within-segment fit; the
/// search minimizes `sum(segment_cost) + penalty * num_change_points`.
pub trait CostModel {
    type Cache;

    fn name(&self) -> &'static str;

    /// Checks the series against the model's preconditions.
    fn validate(&self, x: &[f64]) -> Result<(), SbdError>;

    /// Builds the prefix-statistic cache for O(1) segment queries.
    fn precompute(&self, x: &[f64]) -> Result<Self::Cache, SbdError>;

    /// Cost of the half-open segment `[start, end)`.
    ///
    /// Panics on malformed bounds; bound discipline is owned by the search,
    /// which only queries segments inside `[0, n]` with `start < end`.
    fn segment_cost(&self, cache: &Self::Cache, start: usize, end: usize) -> f64;
}

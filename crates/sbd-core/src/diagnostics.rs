// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::repro::ReproMode;
use std::borrow::Cow;

/// Counters that summarize pruning effectiveness during a search.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PruningStats {
    pub candidates_considered: usize,
    pub candidates_pruned: usize,
}

/// Structured diagnostics captured from a detector run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostics {
    pub n: usize,
    pub runtime_ms: Option<u64>,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub algorithm: Cow<'static, str>,
    pub cost_model: Cow<'static, str>,
    pub repro_mode: ReproMode,
    pub pruning_stats: Option<PruningStats>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            n: 0,
            runtime_ms: None,
            notes: vec![],
            warnings: vec![],
            algorithm: Cow::Borrowed(""),
            cost_model: Cow::Borrowed(""),
            repro_mode: ReproMode::Balanced,
            pruning_stats: None,
        }
    }
}

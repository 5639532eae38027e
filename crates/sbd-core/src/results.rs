// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::SbdError;
use crate::diagnostics::Diagnostics;

/// Validates a detector's boundary list against a series of length `n`.
///
/// Boundaries must be strictly increasing, lie in `[1, n]`, and end with the
/// terminal sentinel `n`. For `n == 0` the list must be empty.
pub fn validate_breakpoints(n: usize, breakpoints: &[usize]) -> Result<(), SbdError> {
    if n == 0 {
        if breakpoints.is_empty() {
            return Ok(());
        }
        return Err(SbdError::invalid_input(format!(
            "breakpoints must be empty for an empty series; got {breakpoints:?}"
        )));
    }

    if breakpoints.last().copied() != Some(n) {
        return Err(SbdError::invalid_input(format!(
            "breakpoints must end with the terminal sentinel n={n}; got {breakpoints:?}"
        )));
    }

    let mut previous = 0usize;
    for &boundary in breakpoints {
        if boundary == 0 || boundary > n {
            return Err(SbdError::invalid_input(format!(
                "breakpoint {boundary} is outside [1, {n}]"
            )));
        }
        if boundary <= previous && previous != 0 {
            return Err(SbdError::invalid_input(format!(
                "breakpoints must be strictly increasing; got {breakpoints:?}"
            )));
        }
        previous = boundary;
    }

    Ok(())
}

/// Outcome of one offline detection run.
///
/// `breakpoints` is the full boundary list including the terminal sentinel
/// `n`; `change_points` is the interior list downstream consumers use, i.e.
/// `breakpoints` with the sentinel stripped.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ChangePointResult {
    pub n: usize,
    pub breakpoints: Vec<usize>,
    pub change_points: Vec<usize>,
    pub diagnostics: Diagnostics,
}

impl ChangePointResult {
    /// Builds a validated result from the raw boundary list.
    pub fn new(
        n: usize,
        breakpoints: Vec<usize>,
        diagnostics: Diagnostics,
    ) -> Result<Self, SbdError> {
        validate_breakpoints(n, &breakpoints)?;

        let change_points = if breakpoints.is_empty() {
            vec![]
        } else {
            breakpoints[..breakpoints.len() - 1].to_vec()
        };

        Ok(Self {
            n,
            breakpoints,
            change_points,
            diagnostics,
        })
    }

    pub fn change_count(&self) -> usize {
        self.change_points.len()
    }
}

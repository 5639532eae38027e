// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::SbdError;

/// Search constraints shared by offline detectors.
///
/// `min_segment_len` and `jump` shape the candidate space of the search
/// itself; the optional budgets bound wall time and work and are enforced by
/// the execution context during the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraints {
    /// Hard lower bound on the distance between consecutive boundaries.
    pub min_segment_len: usize,
    /// Candidate boundaries are restricted to multiples of this stride.
    pub jump: usize,
    /// Optional cap on the number of change points.
    pub max_change_points: Option<usize>,
    /// Optional wall-clock deadline for the search stage.
    pub time_budget_ms: Option<u64>,
    /// Optional cap on segment-cost evaluations.
    pub max_cost_evals: Option<usize>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_segment_len: 2,
            jump: 1,
            max_change_points: None,
            time_budget_ms: None,
            max_cost_evals: None,
        }
    }
}

/// Constraints resolved against a concrete series length.
///
/// `effective_candidates` holds the interior boundary positions the search is
/// allowed to place change points at, in increasing order: the multiples of
/// `jump` that leave at least `min_segment_len` observations on both sides,
/// i.e. positions in `[min_segment_len, n - min_segment_len]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedConstraints {
    pub min_segment_len: usize,
    pub jump: usize,
    pub max_change_points: Option<usize>,
    pub effective_candidates: Vec<usize>,
}

/// Validates raw constraints against a series of length `n`.
pub fn validate_constraints(
    constraints: &Constraints,
    n: usize,
) -> Result<ValidatedConstraints, SbdError> {
    if constraints.min_segment_len < 1 {
        return Err(SbdError::invalid_parameter(format!(
            "constraints.min_segment_len must be >= 1; got {}",
            constraints.min_segment_len
        )));
    }
    if constraints.jump < 1 {
        return Err(SbdError::invalid_parameter(format!(
            "constraints.jump must be >= 1; got {}",
            constraints.jump
        )));
    }
    if let Some(max_change_points) = constraints.max_change_points
        && max_change_points == 0
    {
        return Err(SbdError::invalid_parameter(
            "constraints.max_change_points must be >= 1 when set; got 0",
        ));
    }

    let mut effective_candidates = Vec::new();
    if let Some(upper) = n.checked_sub(constraints.min_segment_len) {
        let mut position = constraints.jump;
        while position <= upper && position < n {
            if position >= constraints.min_segment_len {
                effective_candidates.push(position);
            }
            position += constraints.jump;
        }
    }

    Ok(ValidatedConstraints {
        min_segment_len: constraints.min_segment_len,
        jump: constraints.jump,
        max_change_points: constraints.max_change_points,
        effective_candidates,
    })
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::pelt::{Pelt, PeltConfig};
use sbd_core::{ChangePointResult, ExecutionContext, OfflineDetector, SbdError};
use sbd_costs::CostModel;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Outcome of one penalty's detection run inside a sweep.
///
/// Failures stay attached to their penalty: one penalty failing never aborts
/// its siblings.
#[derive(Debug)]
pub struct PenaltyRun {
    pub penalty: f64,
    pub outcome: Result<ChangePointResult, SbdError>,
}

fn run_single<C: CostModel + Clone>(
    cost_model: &C,
    x: &[f64],
    penalty: f64,
    cancel_check_every: usize,
    ctx: &ExecutionContext<'_>,
) -> PenaltyRun {
    let outcome = Pelt::new(
        cost_model.clone(),
        PeltConfig {
            penalty,
            cancel_check_every,
        },
    )
    .and_then(|detector| detector.detect(x, ctx));

    PenaltyRun { penalty, outcome }
}

/// The parallel path drops runtime hooks, so it is only taken when none are
/// configured; each run still validates and precomputes independently.
#[cfg(feature = "rayon")]
fn can_use_parallel(ctx: &ExecutionContext<'_>) -> bool {
    ctx.cancel.is_none()
        && ctx.progress.is_none()
        && ctx.telemetry.is_none()
        && ctx.constraints.time_budget_ms.is_none()
        && ctx.constraints.max_cost_evals.is_none()
}

/// Runs one independent detection per candidate penalty, in input order.
///
/// Runs share no mutable state and are reproducible individually; with the
/// `rayon` feature they execute concurrently when no cancellation, budget, or
/// sink hooks are configured, and the returned order is still the input
/// penalty order.
pub fn sweep_penalties<C: CostModel + Clone + Sync>(
    cost_model: &C,
    x: &[f64],
    penalties: &[f64],
    cancel_check_every: usize,
    ctx: &ExecutionContext<'_>,
) -> Vec<PenaltyRun> {
    #[cfg(feature = "rayon")]
    if can_use_parallel(ctx) {
        let constraints = ctx.constraints;
        let budget_mode = ctx.budget_mode;
        let repro_mode = ctx.repro_mode;
        return penalties
            .par_iter()
            .map(|&penalty| {
                let local_ctx = ExecutionContext::new(constraints)
                    .with_budget_mode(budget_mode)
                    .with_repro_mode(repro_mode);
                run_single(cost_model, x, penalty, cancel_check_every, &local_ctx)
            })
            .collect();
    }

    penalties
        .iter()
        .map(|&penalty| run_single(cost_model, x, penalty, cancel_check_every, ctx))
        .collect()
}

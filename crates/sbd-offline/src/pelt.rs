// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use sbd_core::{
    BudgetStatus, ChangePointResult, Diagnostics, ExecutionContext, OfflineDetector, PruningStats,
    SbdError, ValidatedConstraints, validate_constraints,
};
use sbd_costs::CostModel;
use std::borrow::Cow;
use std::time::Instant;

const DEFAULT_CANCEL_CHECK_EVERY: usize = 1000;
const DEFAULT_PENALTY: f64 = 30.0;

/// Configuration for [`Pelt`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeltConfig {
    /// Cost charged per change point in the penalized objective.
    pub penalty: f64,
    /// Cancellation/deadline polling cadence, in processed positions.
    pub cancel_check_every: usize,
}

impl Default for PeltConfig {
    fn default() -> Self {
        Self {
            penalty: DEFAULT_PENALTY,
            cancel_check_every: DEFAULT_CANCEL_CHECK_EVERY,
        }
    }
}

impl PeltConfig {
    fn validate(&self) -> Result<(), SbdError> {
        if !self.penalty.is_finite() || self.penalty <= 0.0 {
            return Err(SbdError::invalid_parameter(format!(
                "PeltConfig.penalty must be finite and > 0; got {}",
                self.penalty
            )));
        }
        Ok(())
    }

    fn normalized_cancel_check_every(&self) -> usize {
        self.cancel_check_every.max(1)
    }
}

/// Pruned Exact Linear Time offline detector.
///
/// Minimizes `sum(segment_cost) + penalty * num_change_points` exactly over
/// the candidate positions admitted by the constraints (multiples of `jump`
/// keeping every segment at least `min_segment_len` long), using cost-based
/// pruning of the predecessor set for tractability.
#[derive(Debug)]
pub struct Pelt<C: CostModel> {
    cost_model: C,
    config: PeltConfig,
}

impl<C: CostModel> Pelt<C> {
    pub fn new(cost_model: C, config: PeltConfig) -> Result<Self, SbdError> {
        config.validate()?;
        Ok(Self { cost_model, config })
    }

    pub fn cost_model(&self) -> &C {
        &self.cost_model
    }

    pub fn config(&self) -> &PeltConfig {
        &self.config
    }
}

#[derive(Clone, Debug)]
struct KernelResult {
    breakpoints: Vec<usize>,
    change_count: usize,
    objective: f64,
    cost_evals: usize,
    candidates_considered: usize,
    candidates_pruned: usize,
}

#[derive(Default, Clone, Copy, Debug)]
struct RuntimeStats {
    cost_evals: usize,
    candidates_considered: usize,
    candidates_pruned: usize,
    soft_budget_exceeded: bool,
}

fn checked_counter_increment(counter: &mut usize, name: &str) -> Result<(), SbdError> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| SbdError::resource_limit(format!("{name} counter overflow")))?;
    Ok(())
}

fn evaluate_segment_cost<C: CostModel>(
    model: &C,
    cache: &C::Cache,
    start: usize,
    end: usize,
    ctx: &ExecutionContext<'_>,
    runtime: &mut RuntimeStats,
) -> Result<f64, SbdError> {
    checked_counter_increment(&mut runtime.cost_evals, "cost_evals")?;

    match ctx.check_cost_eval_budget(runtime.cost_evals)? {
        BudgetStatus::WithinBudget => {}
        BudgetStatus::ExceededSoftDegrade => {
            runtime.soft_budget_exceeded = true;
        }
    }

    let segment_cost = model.segment_cost(cache, start, end);
    if !segment_cost.is_finite() {
        return Err(SbdError::numerical_issue(format!(
            "non-finite segment cost at [{start}, {end}): {segment_cost}"
        )));
    }
    Ok(segment_cost)
}

fn build_targets(validated: &ValidatedConstraints, n: usize) -> Vec<usize> {
    let mut targets = validated.effective_candidates.clone();
    if targets.last().copied() != Some(n) {
        targets.push(n);
    }
    targets
}

fn reconstruct_breakpoints(n: usize, last_cp: &[usize]) -> Result<(Vec<usize>, usize), SbdError> {
    let mut reverse = vec![n];
    let mut cursor = n;
    let mut hops = 0usize;

    while cursor > 0 {
        hops = hops
            .checked_add(1)
            .ok_or_else(|| SbdError::resource_limit("breakpoint backtrack hop overflow"))?;
        if hops > n + 1 {
            return Err(SbdError::invalid_input(
                "invalid DP backtrack state: cycle detected",
            ));
        }

        let tau = last_cp[cursor];
        if tau == usize::MAX {
            return Err(SbdError::invalid_input(format!(
                "invalid DP backtrack state: missing predecessor at t={cursor}"
            )));
        }
        if tau >= cursor {
            return Err(SbdError::invalid_input(format!(
                "invalid DP backtrack state: predecessor tau={tau} is not < t={cursor}"
            )));
        }
        if tau == 0 {
            break;
        }
        reverse.push(tau);
        cursor = tau;
    }

    reverse.reverse();
    let change_count = reverse.len().saturating_sub(1);
    Ok((reverse, change_count))
}

#[allow(clippy::too_many_arguments)]
fn run_pelt_penalized<C: CostModel>(
    model: &C,
    cache: &C::Cache,
    n: usize,
    validated: &ValidatedConstraints,
    beta: f64,
    cancel_check_every: usize,
    ctx: &ExecutionContext<'_>,
    started_at: Instant,
    runtime: &mut RuntimeStats,
) -> Result<KernelResult, SbdError> {
    let targets = build_targets(validated, n);
    let total_targets = targets.len().max(1);
    let min_segment_len = validated.min_segment_len;

    // f[t] is the optimal penalized objective for the prefix [0, t);
    // last_cp[t] the predecessor boundary realizing it.
    let mut f = vec![f64::INFINITY; n + 1];
    let mut last_cp = vec![usize::MAX; n + 1];
    let mut changes = vec![usize::MAX; n + 1];

    f[0] = -beta;
    last_cp[0] = 0;
    changes[0] = 0;

    let mut candidate_set = vec![0usize];
    let mut run_cost_evals = 0usize;
    let mut run_considered = 0usize;
    let mut run_pruned = 0usize;

    for (target_idx, &t) in targets.iter().enumerate() {
        if target_idx % cancel_check_every == 0 {
            ctx.check_cancelled_every(target_idx, 1)?;
            match ctx.check_time_budget(started_at)? {
                BudgetStatus::WithinBudget => {}
                BudgetStatus::ExceededSoftDegrade => {
                    runtime.soft_budget_exceeded = true;
                }
            }
        }

        let mut scored = vec![None; candidate_set.len()];
        let mut best_cost = f64::INFINITY;
        let mut best_tau = usize::MAX;
        let mut best_changes = usize::MAX;

        for (idx, &tau) in candidate_set.iter().enumerate() {
            if t <= tau || t - tau < min_segment_len {
                continue;
            }
            if !f[tau].is_finite() {
                continue;
            }

            let proposed_changes = if tau == 0 {
                changes[tau]
            } else {
                changes[tau].saturating_add(1)
            };

            if let Some(max_change_points) = validated.max_change_points
                && proposed_changes > max_change_points
            {
                continue;
            }

            let segment_cost = evaluate_segment_cost(model, cache, tau, t, ctx, runtime)?;
            checked_counter_increment(&mut run_cost_evals, "run_cost_evals")?;
            checked_counter_increment(&mut runtime.candidates_considered, "candidates_considered")?;
            checked_counter_increment(&mut run_considered, "run_candidates_considered")?;

            let score_no_penalty = f[tau] + segment_cost;
            let candidate = score_no_penalty + beta;
            if !candidate.is_finite() {
                return Err(SbdError::numerical_issue(format!(
                    "non-finite objective at t={t}, tau={tau}: F(tau)={}, segment_cost={segment_cost}, beta={beta}",
                    f[tau]
                )));
            }

            scored[idx] = Some((score_no_penalty, proposed_changes));

            // Deterministic tie-break: the earlier predecessor wins.
            if candidate < best_cost || (candidate == best_cost && tau < best_tau) {
                best_cost = candidate;
                best_tau = tau;
                best_changes = proposed_changes;
            }
        }

        if best_tau == usize::MAX {
            return Err(SbdError::invalid_input(format!(
                "no feasible segmentation under constraints at t={t}; check min_segment_len, jump, and max_change_points"
            )));
        }

        f[t] = best_cost;
        last_cp[t] = best_tau;
        changes[t] = best_changes;

        // PELT pruning: a predecessor whose unpenalized score already exceeds
        // the new optimum can never participate in a future optimum.
        let mut next_candidate_set = Vec::with_capacity(candidate_set.len() + 1);
        for (idx, &tau) in candidate_set.iter().enumerate() {
            if let Some((score_no_penalty, _)) = scored[idx] {
                if score_no_penalty < best_cost {
                    next_candidate_set.push(tau);
                } else {
                    checked_counter_increment(&mut runtime.candidates_pruned, "candidates_pruned")?;
                    checked_counter_increment(&mut run_pruned, "run_candidates_pruned")?;
                }
            } else {
                next_candidate_set.push(tau);
            }
        }

        if t < n {
            next_candidate_set.push(t);
        }
        candidate_set = next_candidate_set;

        ctx.report_progress((target_idx + 1) as f32 / total_targets as f32);
    }

    if !f[n].is_finite() {
        return Err(SbdError::invalid_input(
            "no feasible segmentation reached terminal index n",
        ));
    }

    let (breakpoints, change_count) = reconstruct_breakpoints(n, &last_cp)?;
    Ok(KernelResult {
        breakpoints,
        change_count,
        objective: f[n],
        cost_evals: run_cost_evals,
        candidates_considered: run_considered,
        candidates_pruned: run_pruned,
    })
}

impl<C: CostModel> Pelt<C> {
    fn base_diagnostics(&self, n: usize, ctx: &ExecutionContext<'_>) -> Diagnostics {
        Diagnostics {
            n,
            algorithm: Cow::Borrowed("pelt"),
            cost_model: Cow::Borrowed(self.cost_model.name()),
            repro_mode: ctx.repro_mode,
            ..Diagnostics::default()
        }
    }
}

impl<C: CostModel> OfflineDetector for Pelt<C> {
    fn detect(
        &self,
        x: &[f64],
        ctx: &ExecutionContext<'_>,
    ) -> Result<ChangePointResult, SbdError> {
        self.config.validate()?;

        let n = x.len();
        let validated = validate_constraints(ctx.constraints, n)?;

        if n == 0 {
            let mut diagnostics = self.base_diagnostics(0, ctx);
            diagnostics.notes.push("empty series; nothing to detect".to_string());
            return ChangePointResult::new(0, vec![], diagnostics);
        }

        if n < 2 * validated.min_segment_len {
            let mut diagnostics = self.base_diagnostics(n, ctx);
            diagnostics.notes.push(format!(
                "series too short to split: n={n}, min_segment_len={}",
                validated.min_segment_len
            ));
            return ChangePointResult::new(n, vec![n], diagnostics);
        }

        self.cost_model.validate(x)?;
        let cache = self.cost_model.precompute(x)?;

        let started_at = Instant::now();
        let cancel_check_every = self.config.normalized_cancel_check_every();
        let mut runtime = RuntimeStats::default();

        let kernel = run_pelt_penalized(
            &self.cost_model,
            &cache,
            n,
            &validated,
            self.config.penalty,
            cancel_check_every,
            ctx,
            started_at,
            &mut runtime,
        )?;

        let runtime_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        ctx.record_scalar("offline.pelt.cost_evals", runtime.cost_evals as f64);
        ctx.record_scalar(
            "offline.pelt.candidates_considered",
            runtime.candidates_considered as f64,
        );
        ctx.record_scalar(
            "offline.pelt.candidates_pruned",
            runtime.candidates_pruned as f64,
        );
        ctx.record_scalar("offline.pelt.runtime_ms", runtime_ms as f64);
        ctx.report_progress(1.0);

        let mut diagnostics = self.base_diagnostics(n, ctx);
        diagnostics.runtime_ms = Some(runtime_ms);
        diagnostics.notes.push(format!("penalty={}", self.config.penalty));
        diagnostics.notes.push(format!(
            "final_objective={}, change_count={}",
            kernel.objective, kernel.change_count
        ));
        diagnostics.notes.push(format!(
            "run_cost_evals={}, run_candidates_considered={}, run_candidates_pruned={}",
            kernel.cost_evals, kernel.candidates_considered, kernel.candidates_pruned
        ));
        if runtime.soft_budget_exceeded {
            diagnostics.warnings.push(
                "budget exceeded under SoftDegrade mode; run continued to completion".to_string(),
            );
        }
        diagnostics.pruning_stats = Some(PruningStats {
            candidates_considered: runtime.candidates_considered,
            candidates_pruned: runtime.candidates_pruned,
        });

        ChangePointResult::new(n, kernel.breakpoints, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::{Pelt, PeltConfig};
    use sbd_core::{
        BudgetMode, CancelToken, Constraints, ExecutionContext, OfflineDetector, SbdError,
    };
    use sbd_costs::CostNormalMeanVar;

    fn constraints(min_segment_len: usize, jump: usize) -> Constraints {
        Constraints {
            min_segment_len,
            jump,
            ..Constraints::default()
        }
    }

    fn detector(penalty: f64) -> Pelt<CostNormalMeanVar> {
        Pelt::new(
            CostNormalMeanVar::default(),
            PeltConfig {
                penalty,
                cancel_check_every: 8,
            },
        )
        .expect("config should be valid")
    }

    fn step_series(levels: &[(f64, usize)]) -> Vec<f64> {
        let mut values = Vec::new();
        for &(level, count) in levels {
            values.extend(std::iter::repeat_n(level, count));
        }
        values
    }

    #[test]
    fn config_defaults_and_validation() {
        let default_cfg = PeltConfig::default();
        assert_eq!(default_cfg.penalty, 30.0);
        assert_eq!(default_cfg.cancel_check_every, 1000);

        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = Pelt::new(
                CostNormalMeanVar::default(),
                PeltConfig {
                    penalty: bad,
                    ..default_cfg
                },
            )
            .expect_err("non-positive or non-finite penalty must fail");
            assert!(matches!(err, SbdError::InvalidParameter(_)), "got {err}");
        }
    }

    #[test]
    fn single_mean_shift_is_found_exactly() {
        let values = step_series(&[(0.0, 5), (10.0, 5)]);
        let constraints = constraints(2, 1);
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&values, &ctx).expect("detect succeeds");
        assert_eq!(result.breakpoints, vec![5, 10]);
        assert_eq!(result.change_points, vec![5]);
    }

    #[test]
    fn two_mean_shifts_are_found_exactly() {
        let values = step_series(&[(0.0, 5), (10.0, 5), (0.0, 5)]);
        let constraints = constraints(2, 1);
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&values, &ctx).expect("detect succeeds");
        assert_eq!(result.breakpoints, vec![5, 10, 15]);
        assert_eq!(result.change_points, vec![5, 10]);
    }

    #[test]
    fn variance_shift_without_mean_shift_is_found() {
        let mut values = Vec::new();
        for _ in 0..5 {
            values.push(-1.0);
            values.push(1.0);
        }
        for _ in 0..5 {
            values.push(-5.0);
            values.push(5.0);
        }
        let constraints = constraints(2, 1);
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&values, &ctx).expect("detect succeeds");
        assert_eq!(result.change_points, vec![10]);
    }

    #[test]
    fn larger_penalty_is_more_conservative() {
        let values = step_series(&[(0.0, 8), (4.0, 8), (8.0, 8)]);
        let constraints = constraints(2, 1);
        let ctx = ExecutionContext::new(&constraints);

        let loose = detector(1.0).detect(&values, &ctx).expect("loose detect");
        let tight = detector(500.0).detect(&values, &ctx).expect("tight detect");
        assert!(tight.change_count() <= loose.change_count());
    }

    #[test]
    fn min_segment_len_spacing_holds() {
        let values = step_series(&[(0.0, 5), (10.0, 15)]);
        let constraints = constraints(6, 1);
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&values, &ctx).expect("detect succeeds");
        let mut previous = 0usize;
        for &boundary in &result.breakpoints {
            assert!(
                boundary - previous >= 6,
                "segment [{previous}, {boundary}) shorter than min_segment_len"
            );
            previous = boundary;
        }
    }

    #[test]
    fn jump_restricts_change_points_to_stride_multiples() {
        let values = step_series(&[(0.0, 5), (10.0, 7)]);
        let constraints = constraints(2, 2);
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&values, &ctx).expect("detect succeeds");
        assert!(!result.change_points.is_empty());
        for &cp in &result.change_points {
            assert_eq!(cp % 2, 0, "change point {cp} is not on the jump grid");
        }
    }

    #[test]
    fn max_change_points_caps_the_segmentation() {
        let values = step_series(&[(0.0, 5), (10.0, 5), (0.0, 5)]);
        let constraints = Constraints {
            min_segment_len: 2,
            max_change_points: Some(1),
            ..Constraints::default()
        };
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&values, &ctx).expect("detect succeeds");
        assert!(result.change_count() <= 1);
    }

    #[test]
    fn too_short_series_yields_no_change_points() {
        let values = [1.0, 2.0, 3.0];
        let constraints = constraints(2, 1);
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&values, &ctx).expect("detect succeeds");
        assert_eq!(result.breakpoints, vec![3]);
        assert!(result.change_points.is_empty());
        assert!(
            result
                .diagnostics
                .notes
                .iter()
                .any(|note| note.contains("too short")),
            "expected a short-series note, got {:?}",
            result.diagnostics.notes
        );
    }

    #[test]
    fn empty_series_yields_empty_result() {
        let constraints = constraints(2, 1);
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&[], &ctx).expect("detect succeeds");
        assert_eq!(result.n, 0);
        assert!(result.breakpoints.is_empty());
        assert!(result.change_points.is_empty());
    }

    #[test]
    fn invalid_constraints_are_rejected_at_entry() {
        let values = step_series(&[(0.0, 5), (10.0, 5)]);
        let constraints = constraints(2, 0);
        let ctx = ExecutionContext::new(&constraints);

        let err = detector(1.0)
            .detect(&values, &ctx)
            .expect_err("jump=0 must fail");
        assert!(matches!(err, SbdError::InvalidParameter(_)), "got {err}");
    }

    #[test]
    fn cancellation_aborts_the_search() {
        let values = step_series(&[(0.0, 50), (10.0, 50)]);
        let constraints = constraints(2, 1);
        let cancel = CancelToken::new();
        let ctx = ExecutionContext::new(&constraints).with_cancel(&cancel);

        cancel.cancel();
        let err = Pelt::new(
            CostNormalMeanVar::default(),
            PeltConfig {
                penalty: 1.0,
                cancel_check_every: 1,
            },
        )
        .expect("config should be valid")
        .detect(&values, &ctx)
        .expect_err("cancelled run must fail");
        assert_eq!(err.to_string(), "cancelled");
    }

    #[test]
    fn cost_eval_budget_hard_fail_and_soft_degrade() {
        let values = step_series(&[(0.0, 10), (10.0, 10)]);
        let constraints = Constraints {
            min_segment_len: 2,
            max_cost_evals: Some(3),
            ..Constraints::default()
        };

        let hard_ctx = ExecutionContext::new(&constraints);
        let err = detector(1.0)
            .detect(&values, &hard_ctx)
            .expect_err("exhausted budget must fail in HardFail mode");
        assert!(matches!(err, SbdError::ResourceLimit(_)), "got {err}");

        let soft_ctx = ExecutionContext::new(&constraints).with_budget_mode(BudgetMode::SoftDegrade);
        let result = detector(1.0)
            .detect(&values, &soft_ctx)
            .expect("soft degrade completes");
        assert!(
            result
                .diagnostics
                .warnings
                .iter()
                .any(|warning| warning.contains("budget exceeded")),
            "expected a budget warning, got {:?}",
            result.diagnostics.warnings
        );
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let values = step_series(&[(0.0, 12), (7.5, 12), (2.5, 12)]);
        let constraints = constraints(3, 1);
        let ctx = ExecutionContext::new(&constraints);
        let pelt = detector(2.0);

        let first = pelt.detect(&values, &ctx).expect("first run");
        let second = pelt.detect(&values, &ctx).expect("second run");
        assert_eq!(first.breakpoints, second.breakpoints);
        assert_eq!(first.change_points, second.change_points);
    }

    #[test]
    fn pruning_stats_are_reported() {
        let values = step_series(&[(0.0, 20), (10.0, 20)]);
        let constraints = constraints(2, 1);
        let ctx = ExecutionContext::new(&constraints);

        let result = detector(1.0).detect(&values, &ctx).expect("detect succeeds");
        let stats = result
            .diagnostics
            .pruning_stats
            .expect("pruning stats should be present");
        assert!(stats.candidates_considered > 0);
    }
}

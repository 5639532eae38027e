// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::SbdError;
use crate::constraints::Constraints;
use crate::control::{BudgetMode, BudgetStatus, CancelToken};
use crate::observability::{ProgressSink, TelemetrySink};
use crate::repro::ReproMode;
use std::time::Instant;

/// Unified execution context passed through detector calls.
///
/// Bundles the search constraints with the optional runtime hooks: a
/// cancellation token, budget enforcement mode, reproducibility mode, and
/// progress/telemetry sinks.
pub struct ExecutionContext<'a> {
    pub constraints: &'a Constraints,
    pub cancel: Option<&'a CancelToken>,
    pub budget_mode: BudgetMode,
    pub repro_mode: ReproMode,
    pub progress: Option<&'a dyn ProgressSink>,
    pub telemetry: Option<&'a dyn TelemetrySink>,
}

impl<'a> ExecutionContext<'a> {
    /// Context with hard-fail budgets, balanced reproducibility, no hooks.
    pub fn new(constraints: &'a Constraints) -> Self {
        Self {
            constraints,
            cancel: None,
            budget_mode: BudgetMode::HardFail,
            repro_mode: ReproMode::Balanced,
            progress: None,
            telemetry: None,
        }
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_budget_mode(mut self, budget_mode: BudgetMode) -> Self {
        self.budget_mode = budget_mode;
        self
    }

    pub fn with_repro_mode(mut self, repro_mode: ReproMode) -> Self {
        self.repro_mode = repro_mode;
        self
    }

    pub fn with_progress_sink(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_telemetry_sink(mut self, telemetry: &'a dyn TelemetrySink) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }

    /// Fails with [`SbdError::Cancelled`] once cancellation is requested.
    pub fn check_cancelled(&self) -> Result<(), SbdError> {
        if self.is_cancelled() {
            return Err(SbdError::cancelled());
        }
        Ok(())
    }

    /// Polls cancellation every `every` iterations; `every == 0` polls always.
    pub fn check_cancelled_every(&self, iteration: usize, every: usize) -> Result<(), SbdError> {
        let every = every.max(1);
        if iteration % every != 0 {
            return Ok(());
        }
        self.check_cancelled()
    }

    /// Checks the cost-evaluation budget under the configured mode.
    pub fn check_cost_eval_budget(&self, cost_evals: usize) -> Result<BudgetStatus, SbdError> {
        let Some(limit) = self.constraints.max_cost_evals else {
            return Ok(BudgetStatus::WithinBudget);
        };

        if cost_evals <= limit {
            return Ok(BudgetStatus::WithinBudget);
        }

        match self.budget_mode {
            BudgetMode::HardFail => Err(SbdError::resource_limit(format!(
                "constraints.max_cost_evals exceeded: used={cost_evals}, limit={limit}, budget_mode=HardFail"
            ))),
            BudgetMode::SoftDegrade => Ok(BudgetStatus::ExceededSoftDegrade),
        }
    }

    /// Checks the wall-clock budget under the configured mode.
    pub fn check_time_budget(&self, started_at: Instant) -> Result<BudgetStatus, SbdError> {
        let Some(limit_ms) = self.constraints.time_budget_ms else {
            return Ok(BudgetStatus::WithinBudget);
        };

        let elapsed_ms = started_at.elapsed().as_millis();
        if elapsed_ms <= u128::from(limit_ms) {
            return Ok(BudgetStatus::WithinBudget);
        }

        match self.budget_mode {
            BudgetMode::HardFail => Err(SbdError::resource_limit(format!(
                "constraints.time_budget_ms exceeded: elapsed_ms={elapsed_ms}, limit_ms={limit_ms}, budget_mode=HardFail"
            ))),
            BudgetMode::SoftDegrade => Ok(BudgetStatus::ExceededSoftDegrade),
        }
    }

    /// Emits clamped progress to the sink, if one is configured.
    pub fn report_progress(&self, fraction: f32) {
        if !fraction.is_finite() {
            return;
        }

        if let Some(sink) = self.progress {
            sink.on_progress(fraction.clamp(0.0, 1.0));
        }
    }

    /// Emits a scalar telemetry value to the sink, if one is configured.
    pub fn record_scalar(&self, key: &'static str, value: f64) {
        if let Some(sink) = self.telemetry {
            sink.record_scalar(key, value);
        }
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::config::{CostFunction, DetectionConfig, SearchMethod};
use crate::enrich::{StrongMatchAnalysis, enrich_strong_matches};
use crate::events::{DEFAULT_MAX_WINDOW_DAYS, Event, EventMatch, match_events};
use crate::impacts::{ChangeImpact, change_impacts};
use crate::segments::{SegmentStat, segment_statistics};
use chrono::NaiveDate;
use sbd_core::{
    BudgetMode, CancelToken, ChangePointResult, Constraints, ExecutionContext, OfflineDetector,
    PriceSeries, ReproMode, SbdError,
};
use sbd_costs::CostNormalMeanVar;
use sbd_offline::{Pelt, PeltConfig, sweep_penalties};
use serde::{Deserialize, Serialize};

/// One change point of the primary run, located in the series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangePointRecord {
    /// Index of the first observation of the new regime.
    pub breakpoint_index: usize,
    pub date: NaiveDate,
    /// Penalty of the run that produced this change point.
    pub penalty: f64,
    pub price: f64,
}

/// Outcome of one sweep penalty, flattened for reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRunSummary {
    pub penalty: f64,
    pub change_point_count: Option<usize>,
    pub error: Option<String>,
}

/// All attribution tables of one analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub change_points: Vec<ChangePointRecord>,
    pub segments: Vec<SegmentStat>,
    pub impacts: Vec<ChangeImpact>,
    pub event_matches: Vec<EventMatch>,
    pub strong_matches: Vec<StrongMatchAnalysis>,
    pub penalty_sweep: Vec<PenaltyRunSummary>,
}

/// Runtime hooks for one analysis run.
#[derive(Clone, Copy, Debug)]
pub struct AnalysisOptions<'a> {
    pub cancel: Option<&'a CancelToken>,
    pub time_budget_ms: Option<u64>,
    pub budget_mode: BudgetMode,
    pub repro_mode: ReproMode,
}

impl Default for AnalysisOptions<'_> {
    fn default() -> Self {
        Self {
            cancel: None,
            time_budget_ms: None,
            budget_mode: BudgetMode::HardFail,
            repro_mode: ReproMode::default(),
        }
    }
}

/// Runs detection, the penalty sweep, and every attribution table.
///
/// The sweep covers `config.penalty_values` with per-penalty failures
/// captured in the summary table; the primary run (at
/// `config.primary_penalty`) must succeed or the whole analysis fails, since
/// every downstream table derives from it. The event catalog must be
/// non-empty.
pub fn run_analysis(
    series: &PriceSeries,
    events: &[Event],
    config: &DetectionConfig,
    options: &AnalysisOptions<'_>,
) -> Result<AnalysisSnapshot, SbdError> {
    config.validate()?;

    let constraints = Constraints {
        min_segment_len: config.min_segment_size,
        jump: config.jump,
        time_budget_ms: options.time_budget_ms,
        ..Constraints::default()
    };
    let mut ctx = ExecutionContext::new(&constraints)
        .with_budget_mode(options.budget_mode)
        .with_repro_mode(options.repro_mode);
    if let Some(cancel) = options.cancel {
        ctx = ctx.with_cancel(cancel);
    }

    let prices = series.prices();
    let cost_model = match config.cost_function {
        CostFunction::NormalMeanVar => CostNormalMeanVar::new(options.repro_mode),
    };
    let cancel_check_every = PeltConfig::default().cancel_check_every;

    let mut sweep = match config.search_method {
        SearchMethod::Pelt => sweep_penalties(
            &cost_model,
            &prices,
            &config.penalty_values,
            cancel_check_every,
            &ctx,
        ),
    };

    let penalty_sweep: Vec<PenaltyRunSummary> = sweep
        .iter()
        .map(|run| match &run.outcome {
            Ok(result) => PenaltyRunSummary {
                penalty: run.penalty,
                change_point_count: Some(result.change_points.len()),
                error: None,
            },
            Err(err) => PenaltyRunSummary {
                penalty: run.penalty,
                change_point_count: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    // Reuse the sweep's run for the primary penalty when it is in the list;
    // otherwise run it separately.
    let primary: ChangePointResult = match sweep
        .iter()
        .position(|run| run.penalty == config.primary_penalty)
    {
        Some(index) => sweep.swap_remove(index).outcome?,
        None => {
            let detector = Pelt::new(
                cost_model,
                PeltConfig {
                    penalty: config.primary_penalty,
                    cancel_check_every,
                },
            )?;
            detector.detect(&prices, &ctx)?
        }
    };

    let change_points = primary.change_points;
    let mut records = Vec::with_capacity(change_points.len());
    for &index in &change_points {
        let point = series.get(index).ok_or_else(|| {
            SbdError::data_consistency(format!(
                "change point index {index} outside a series of length {}",
                series.len()
            ))
        })?;
        records.push(ChangePointRecord {
            breakpoint_index: index,
            date: point.date,
            penalty: config.primary_penalty,
            price: point.price,
        });
    }

    let segments = segment_statistics(series, &change_points)?;
    let impacts = change_impacts(series, &change_points)?;
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    let event_matches = match_events(&dates, events, DEFAULT_MAX_WINDOW_DAYS)?;
    let strong_matches = enrich_strong_matches(&event_matches, &impacts, events)?;

    Ok(AnalysisSnapshot {
        change_points: records,
        segments,
        impacts,
        event_matches,
        strong_matches,
        penalty_sweep,
    })
}

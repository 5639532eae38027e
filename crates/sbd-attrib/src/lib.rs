// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Regime characterization and event attribution.
//!
//! Takes the change points produced by the offline search and turns them into
//! analyst-facing tables: per-regime statistics, boundary impact deltas,
//! nearest-event matches with a strength tier, and the enriched view of the
//! strong matches. [`snapshot::run_analysis`] runs the whole pipeline.

pub mod config;
pub mod enrich;
pub mod events;
pub mod impacts;
pub mod segments;
pub mod snapshot;

pub use config::{CostFunction, DetectionConfig, SearchMethod};
pub use enrich::{StrongMatchAnalysis, enrich_strong_matches};
pub use events::{
    DEFAULT_MAX_WINDOW_DAYS, Event, EventMatch, MatchStatus, STRONG_MATCH_MAX_DAYS, match_events,
};
pub use impacts::{ChangeImpact, change_impacts};
pub use segments::{MIN_SEGMENT_OBSERVATIONS, SegmentStat, segment_statistics};
pub use snapshot::{
    AnalysisOptions, AnalysisSnapshot, ChangePointRecord, PenaltyRunSummary, run_analysis,
};

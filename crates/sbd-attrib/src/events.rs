// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use chrono::NaiveDate;
use sbd_core::SbdError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matches within this many days of a change point are classified strong.
pub const STRONG_MATCH_MAX_DAYS: i64 = 30;

/// Default outer window for weak matches.
pub const DEFAULT_MAX_WINDOW_DAYS: i64 = 90;

/// One catalog entry a change point can be attributed to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub start_date: NaiveDate,
    pub category: String,
    pub impact_direction: String,
    pub description: String,
    pub influence_level: String,
}

/// Strength tier of a nearest-event match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "STRONG")]
    Strong,
    #[serde(rename = "WEAK")]
    Weak,
    #[serde(rename = "NONE")]
    None,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchStatus::Strong => "STRONG",
            MatchStatus::Weak => "WEAK",
            MatchStatus::None => "NONE",
        })
    }
}

/// Nearest catalog event for one change point.
///
/// Every change point gets a row even when the nearest event is far outside
/// the window; the tier records how credible the association is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventMatch {
    pub change_point_date: NaiveDate,
    pub event_title: String,
    pub event_date: NaiveDate,
    /// Absolute calendar-day distance between change point and event.
    pub days_difference: i64,
    pub event_category: String,
    pub event_impact: String,
    pub match_status: MatchStatus,
}

fn classify(days: i64, max_window_days: i64) -> MatchStatus {
    if days <= STRONG_MATCH_MAX_DAYS {
        MatchStatus::Strong
    } else if days <= max_window_days {
        MatchStatus::Weak
    } else {
        MatchStatus::None
    }
}

/// Pairs every change-point date with its nearest catalog event.
///
/// Distance is absolute calendar days; ties go to the event that appears
/// first in the catalog. The catalog must be non-empty since there is no
/// nearest event to select otherwise; an empty date list yields an empty
/// table.
pub fn match_events(
    change_point_dates: &[NaiveDate],
    events: &[Event],
    max_window_days: i64,
) -> Result<Vec<EventMatch>, SbdError> {
    if events.is_empty() {
        return Err(SbdError::invalid_input(
            "event catalog is empty; nearest-event matching needs at least one event",
        ));
    }
    if max_window_days < STRONG_MATCH_MAX_DAYS {
        return Err(SbdError::invalid_parameter(format!(
            "max_window_days must be >= {STRONG_MATCH_MAX_DAYS}; got {max_window_days}"
        )));
    }

    let matches = change_point_dates
        .iter()
        .map(|&cp_date| {
            let mut best = &events[0];
            let mut best_days = (best.start_date - cp_date).num_days().abs();
            for event in &events[1..] {
                let days = (event.start_date - cp_date).num_days().abs();
                if days < best_days {
                    best = event;
                    best_days = days;
                }
            }
            EventMatch {
                change_point_date: cp_date,
                event_title: best.title.clone(),
                event_date: best.start_date,
                days_difference: best_days,
                event_category: best.category.clone(),
                event_impact: best.impact_direction.clone(),
                match_status: classify(best_days, max_window_days),
            }
        })
        .collect();
    Ok(matches)
}

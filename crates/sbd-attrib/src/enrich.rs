// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::events::{Event, EventMatch, MatchStatus};
use crate::impacts::ChangeImpact;
use chrono::NaiveDate;
use sbd_core::SbdError;
use serde::{Deserialize, Serialize};

/// A strong match joined with its boundary impact and full event record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrongMatchAnalysis {
    pub change_point_date: NaiveDate,
    pub event_title: String,
    pub event_date: NaiveDate,
    pub days_difference: i64,
    pub event_category: String,
    pub event_impact_direction: String,
    pub price_before: f64,
    pub price_after: f64,
    pub price_change_pct: f64,
    pub volatility_before: f64,
    pub volatility_after: f64,
    pub volatility_change_pct: f64,
    pub event_description: String,
    pub influence_level: String,
}

/// Joins each strong match with its impact row (by change-point date) and its
/// catalog event (by title).
///
/// A missing impact row is expected when the boundary touched a dropped short
/// segment: the match is skipped. A missing catalog title cannot happen for
/// matches produced from the same catalog, so it is a consistency error.
pub fn enrich_strong_matches(
    matches: &[EventMatch],
    impacts: &[ChangeImpact],
    events: &[Event],
) -> Result<Vec<StrongMatchAnalysis>, SbdError> {
    let mut enriched = Vec::new();
    for m in matches {
        if m.match_status != MatchStatus::Strong {
            continue;
        }

        let Some(impact) = impacts
            .iter()
            .find(|impact| impact.change_point_date == m.change_point_date)
        else {
            continue;
        };

        let event = events
            .iter()
            .find(|event| event.title == m.event_title)
            .ok_or_else(|| {
                SbdError::data_consistency(format!(
                    "strong match at {} references event '{}' missing from the catalog",
                    m.change_point_date, m.event_title
                ))
            })?;

        enriched.push(StrongMatchAnalysis {
            change_point_date: m.change_point_date,
            event_title: m.event_title.clone(),
            event_date: m.event_date,
            days_difference: m.days_difference,
            event_category: m.event_category.clone(),
            event_impact_direction: event.impact_direction.clone(),
            price_before: impact.from_price,
            price_after: impact.to_price,
            price_change_pct: impact.price_change_pct,
            volatility_before: impact.from_volatility,
            volatility_after: impact.to_volatility,
            volatility_change_pct: impact.volatility_change_pct,
            event_description: event.description.clone(),
            influence_level: event.influence_level.clone(),
        });
    }
    Ok(enriched)
}

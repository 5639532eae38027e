// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! End-to-end run over a four-regime series with a small event catalog.

use chrono::NaiveDate;
use sbd_attrib::{
    AnalysisOptions, AnalysisSnapshot, DetectionConfig, Event, MatchStatus, run_analysis,
};
use sbd_core::{PricePoint, PriceSeries};

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date") + chrono::Days::new(offset)
}

/// 100 observations in four 25-point regimes at distinct price levels.
fn four_regime_series() -> PriceSeries {
    let levels = [100.0, 140.0, 80.0, 120.0];
    let points = (0..100)
        .map(|i| PricePoint {
            date: day(i as u64),
            price: levels[i / 25],
            log_return: if i % 2 == 0 { 0.01 } else { -0.01 },
        })
        .collect();
    PriceSeries::new(points).expect("sequential dates are valid")
}

fn event(title: &str, when: NaiveDate) -> Event {
    Event {
        title: title.to_string(),
        start_date: when,
        category: "macro".to_string(),
        impact_direction: "negative".to_string(),
        description: format!("{title} description"),
        influence_level: "high".to_string(),
    }
}

fn run_default_analysis() -> AnalysisSnapshot {
    let series = four_regime_series();
    // Regime boundaries fall on 2022-01-26, 2022-02-20, and 2022-03-17.
    let events = vec![
        event("rate hike", day(27)),
        event("supply disruption", day(48)),
    ];
    run_analysis(
        &series,
        &events,
        &DetectionConfig::default(),
        &AnalysisOptions::default(),
    )
    .expect("analysis succeeds")
}

#[test]
fn detects_the_three_regime_boundaries() {
    let snapshot = run_default_analysis();

    let indices: Vec<usize> = snapshot
        .change_points
        .iter()
        .map(|r| r.breakpoint_index)
        .collect();
    assert_eq!(indices, vec![25, 50, 75]);

    assert_eq!(snapshot.change_points[0].date, day(25));
    assert_eq!(snapshot.change_points[1].date, day(50));
    assert_eq!(snapshot.change_points[2].date, day(75));
    for record in &snapshot.change_points {
        assert_eq!(record.penalty, 30.0);
    }
    assert_eq!(snapshot.change_points[0].price, 140.0);
}

#[test]
fn segment_table_covers_all_four_regimes() {
    let snapshot = run_default_analysis();

    assert_eq!(snapshot.segments.len(), 4);
    let expected_means = [100.0, 140.0, 80.0, 120.0];
    for (rank, segment) in snapshot.segments.iter().enumerate() {
        assert_eq!(segment.segment_id, rank + 1);
        assert_eq!(segment.n_observations, 25);
        assert_eq!(segment.duration_days, 24);
        assert_eq!(segment.mean_price, expected_means[rank]);
        assert_eq!(segment.median_price, expected_means[rank]);
        assert!(segment.annualized_volatility_pct > 0.0);
    }
}

#[test]
fn impact_table_reports_boundary_deltas() {
    let snapshot = run_default_analysis();

    assert_eq!(snapshot.impacts.len(), 3);
    assert_eq!(snapshot.impacts[0].change_point_date, day(25));
    assert_eq!(snapshot.impacts[0].from_price, 100.0);
    assert_eq!(snapshot.impacts[0].to_price, 140.0);
    assert_eq!(snapshot.impacts[0].price_change_pct, 40.0);
    assert_eq!(snapshot.impacts[2].price_change_pct, 50.0);
    assert!(snapshot.impacts[1].price_change_pct < 0.0);
}

#[test]
fn every_change_point_is_matched_and_strong_ones_are_enriched() {
    let snapshot = run_default_analysis();

    assert_eq!(snapshot.event_matches.len(), 3);
    // 2022-01-28 is 2 days from the first boundary; 2022-02-18 is 2 days
    // from the second and 27 from the third, so all three land strong.
    assert_eq!(snapshot.event_matches[0].event_title, "rate hike");
    assert_eq!(snapshot.event_matches[0].days_difference, 2);
    assert_eq!(snapshot.event_matches[1].event_title, "supply disruption");
    assert_eq!(snapshot.event_matches[2].event_title, "supply disruption");
    assert_eq!(snapshot.event_matches[2].days_difference, 27);
    for m in &snapshot.event_matches {
        assert_eq!(m.match_status, MatchStatus::Strong);
    }

    assert_eq!(snapshot.strong_matches.len(), 3);
    assert_eq!(snapshot.strong_matches[0].price_before, 100.0);
    assert_eq!(snapshot.strong_matches[0].price_after, 140.0);
    assert_eq!(snapshot.strong_matches[0].price_change_pct, 40.0);
    assert_eq!(
        snapshot.strong_matches[0].event_description,
        "rate hike description"
    );
}

#[test]
fn sweep_table_covers_every_configured_penalty() {
    let snapshot = run_default_analysis();
    let config = DetectionConfig::default();

    assert_eq!(snapshot.penalty_sweep.len(), config.penalty_values.len());
    for (summary, &penalty) in snapshot
        .penalty_sweep
        .iter()
        .zip(config.penalty_values.iter())
    {
        assert_eq!(summary.penalty, penalty);
        assert_eq!(summary.change_point_count, Some(3));
        assert!(summary.error.is_none());
    }
}

#[test]
fn snapshot_round_trips_through_json() {
    let snapshot = run_default_analysis();

    let json = serde_json::to_string(&snapshot).expect("serialize");
    let back: AnalysisSnapshot = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(back.change_points, snapshot.change_points);
    assert_eq!(back.segments, snapshot.segments);
    assert_eq!(back.event_matches, snapshot.event_matches);
    assert_eq!(back.penalty_sweep.len(), snapshot.penalty_sweep.len());
}

#[test]
fn single_regime_series_yields_trivial_tables() {
    let points = (0..60)
        .map(|i| PricePoint {
            date: day(i as u64),
            price: 100.0,
            log_return: if i % 2 == 0 { 0.01 } else { -0.01 },
        })
        .collect();
    let series = PriceSeries::new(points).expect("sequential dates are valid");
    let events = vec![event("unrelated", day(500))];

    let snapshot = run_analysis(
        &series,
        &events,
        &DetectionConfig::default(),
        &AnalysisOptions::default(),
    )
    .expect("analysis succeeds");

    assert!(snapshot.change_points.is_empty());
    assert_eq!(snapshot.segments.len(), 1);
    assert_eq!(snapshot.segments[0].n_observations, 60);
    assert!(snapshot.impacts.is_empty());
    assert!(snapshot.event_matches.is_empty());
    assert!(snapshot.strong_matches.is_empty());
}

pub mod classifier;
pub mod moves;
pub mod pivots;
pub mod report;
pub mod sequencer;
pub mod stats;
pub mod window;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use classifier::classify_swings;
pub use moves::{aggregate_moves, MoveDistributions};
pub use pivots::detect_pivots;
pub use report::{build_report, StatisticsReport};
pub use sequencer::{order_swings, suppress_duplicates};
pub use window::{anchor_from_bars, build_window, covers_window, filter_to_window};

use crate::config::AnalysisSettings;
use crate::data::{AnalysisWindow, Bar, ClassifiedSwing};

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("no bars available for analysis")]
    EmptySeries,
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub window: AnalysisWindow,
    pub swings: Vec<ClassifiedSwing>,
    pub distributions: MoveDistributions,
    pub has_sufficient_history: bool,
    pub earliest_bar: Option<DateTime<Tz>>,
}

/// Run the full swing pipeline over `bars`.
///
/// `anchor` fixes the window end explicitly; when absent the date of the last
/// bar in the reference timezone is used.
pub fn analyze(
    bars: &[Bar],
    settings: &AnalysisSettings,
    anchor: Option<NaiveDate>,
) -> Result<AnalysisResult, AnalysisError> {
    let anchor = anchor
        .or_else(|| anchor_from_bars(bars, settings.reference_tz))
        .ok_or(AnalysisError::EmptySeries)?;
    let window = build_window(
        anchor,
        settings.window_days,
        settings.reference_tz,
        settings.session,
    );
    let earliest_bar = bars.first().map(|bar| bar.timestamp);

    if !covers_window(bars, &window) {
        warn!(
            start = %window.start_date,
            end = %window.end_date,
            earliest = ?earliest_bar,
            "history does not reach the start of the analysis window"
        );
        return Ok(AnalysisResult {
            window,
            swings: Vec::new(),
            distributions: MoveDistributions::default(),
            has_sufficient_history: false,
            earliest_bar,
        });
    }

    let pivots = detect_pivots(bars, settings.strength);
    let candidates = suppress_duplicates(pivots.candidates(bars));
    debug!(candidates = candidates.len(), "pivot candidates after duplicate suppression");

    let in_window = filter_to_window(candidates, &window);
    debug!(retained = in_window.len(), "candidates inside the session window");

    let swings = classify_swings(&order_swings(in_window));
    // Bars always exist here: an empty series has no anchor.
    let tick_size = bars
        .last()
        .map(|bar| bar.tick_size)
        .ok_or(AnalysisError::EmptySeries)?;
    let distributions = aggregate_moves(&swings, tick_size);
    if distributions.measured_moves.is_empty() && distributions.pullbacks.is_empty() {
        debug!("no measured moves or pullbacks inside the window");
    }

    info!(
        start = %window.start_date,
        end = %window.end_date,
        swings = swings.len(),
        pairs = distributions.pair_count(),
        measured_moves = distributions.measured_moves.len(),
        pullbacks = distributions.pullbacks.len(),
        "swing analysis complete"
    );

    Ok(AnalysisResult {
        window,
        swings,
        distributions,
        has_sufficient_history: true,
        earliest_bar,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SessionHours, SwingLabel, SwingType};
    use chrono::{Duration, TimeZone};
    use chrono_tz::America::New_York;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// One bar per hour from 09:00 to 15:00 on every calendar day from `first_day`.
    fn session_bars(
        first_day: NaiveDate,
        days: i64,
        shape: impl Fn(usize) -> (Decimal, Decimal),
    ) -> Vec<Bar> {
        let mut bars = Vec::new();
        for day in 0..days {
            let date = first_day + Duration::days(day);
            for hour in 9..16 {
                let naive = date.and_hms_opt(hour, 0, 0).unwrap();
                let timestamp = New_York.from_local_datetime(&naive).unwrap();
                let (high, low) = shape(bars.len());
                bars.push(Bar {
                    timestamp,
                    open: low,
                    high,
                    low,
                    close: high,
                    volume: Decimal::ZERO,
                    tick_size: dec!(0.25),
                });
            }
        }
        bars
    }

    fn zigzag(idx: usize) -> (Decimal, Decimal) {
        // Period-6 oscillation with a slow upward drift.
        let phase = [0, 1, 2, 3, 2, 1][idx % 6];
        let base = Decimal::from(100 + idx / 6) + Decimal::from(phase * 2);
        (base + dec!(1), base)
    }

    fn settings(strength: usize) -> AnalysisSettings {
        AnalysisSettings {
            strength,
            ..AnalysisSettings::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_series_is_an_error() {
        assert_eq!(
            analyze(&[], &settings(2), None).unwrap_err(),
            AnalysisError::EmptySeries
        );
    }

    #[test]
    fn short_history_is_flagged_without_distributions() {
        // Anchor Friday 2024-03-15 gives a window starting 2024-03-02.
        let bars = session_bars(date(2024, 3, 3), 13, zigzag);
        let result = analyze(&bars, &settings(2), Some(date(2024, 3, 15))).unwrap();
        assert_eq!(result.window.start_date, date(2024, 3, 2));
        assert!(!result.has_sufficient_history);
        assert!(result.swings.is_empty());
        assert_eq!(result.distributions, MoveDistributions::default());
        assert!(matches!(
            build_report(&result),
            StatisticsReport::InsufficientHistory { .. }
        ));
    }

    #[test]
    fn history_starting_on_window_start_is_sufficient() {
        let bars = session_bars(date(2024, 3, 2), 14, zigzag);
        let result = analyze(&bars, &settings(2), Some(date(2024, 3, 15))).unwrap();
        assert!(result.has_sufficient_history);
    }

    #[test]
    fn full_run_produces_ordered_labelled_swings() {
        let bars = session_bars(date(2024, 2, 26), 25, zigzag);
        let result = analyze(&bars, &settings(2), None).unwrap();
        // Last bar is Thursday 2024-03-21; the window ends on the prior Friday.
        assert_eq!(result.window.end_date, date(2024, 3, 15));
        assert!(result.has_sufficient_history);
        assert!(!result.swings.is_empty());

        assert!(result
            .swings
            .windows(2)
            .all(|pair| pair[0].swing.timestamp <= pair[1].swing.timestamp));
        for swing in &result.swings {
            let local = swing.swing.timestamp.with_timezone(&New_York).date_naive();
            assert!(result.window.contains_date(local));
        }

        // Only the first swing of each type is unlabelled.
        let unlabelled: Vec<SwingType> = result
            .swings
            .iter()
            .filter(|s| s.label.is_none())
            .map(|s| s.swing_type())
            .collect();
        assert!(unlabelled.len() <= 2);

        // The drift makes every later swing higher than the previous one.
        assert!(result
            .swings
            .iter()
            .filter_map(|s| s.label)
            .all(|label| matches!(label, SwingLabel::HigherHigh | SwingLabel::HigherLow)));

        let moves = &result.distributions;
        assert_eq!(moves.pair_count(), result.swings.len() - 1);
        assert_eq!(
            moves.measured_moves.len() + moves.pullbacks.len() + moves.unrecognized_pairs,
            moves.pair_count()
        );
        assert!(!moves.bullish_measured_moves.is_empty());
        assert!(moves.bearish_measured_moves.is_empty());
    }

    #[test]
    fn plateau_repeat_is_dropped_even_when_its_twin_is_outside_the_session() {
        // Tuesday 2024-03-05 carries two equal high pivots at 10:00 and 13:00;
        // Wednesday 2024-03-06 carries a distinct one at 13:00.
        let shape = |idx: usize| match idx {
            29 | 32 => (dec!(105), dec!(90)),
            39 => (dec!(107), dec!(90)),
            _ => (dec!(100), dec!(90)),
        };
        let bars = session_bars(date(2024, 3, 1), 15, shape);
        let settings = AnalysisSettings {
            strength: 1,
            session: SessionHours {
                start_hour: 12,
                end_hour: 16,
            },
            ..AnalysisSettings::default()
        };
        let result = analyze(&bars, &settings, None).unwrap();
        assert!(result.has_sufficient_history);

        let prices: Vec<Decimal> = result.swings.iter().map(|s| s.price()).collect();
        assert_eq!(prices, vec![dec!(107)]);
        assert_eq!(result.swings[0].swing.index, 39);
    }

    #[test]
    fn rerunning_is_idempotent() {
        let bars = session_bars(date(2024, 2, 26), 25, zigzag);
        let first = analyze(&bars, &settings(2), None).unwrap();
        let second = analyze(&bars, &settings(2), None).unwrap();
        assert_eq!(first.swings, second.swings);
        assert_eq!(first.distributions, second.distributions);
    }
}

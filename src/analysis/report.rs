use std::collections::BTreeMap;

use chrono::DateTime;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analysis::stats::Summary;
use crate::analysis::AnalysisResult;
use crate::data::AnalysisWindow;

/// Per-bucket summaries for the complete report.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionSummaries {
    pub all_ranges: Summary,
    pub measured_moves: Summary,
    pub bullish_measured_moves: Summary,
    pub bearish_measured_moves: Summary,
    pub pullbacks: Summary,
    pub bullish_pullbacks: Summary,
    pub bearish_pullbacks: Summary,
}

impl DistributionSummaries {
    /// Display name and summary for each bucket, in report order.
    pub fn rows(&self) -> [(&'static str, &Summary); 7] {
        [
            ("All ranges", &self.all_ranges),
            ("Measured moves", &self.measured_moves),
            ("  bullish", &self.bullish_measured_moves),
            ("  bearish", &self.bearish_measured_moves),
            ("Pullbacks", &self.pullbacks),
            ("  bullish", &self.bullish_pullbacks),
            ("  bearish", &self.bearish_pullbacks),
        ]
    }
}

/// Suggested order distances in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub target_ticks: Option<Decimal>,
    pub stop_ticks: Option<Decimal>,
    pub trailing_ticks: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatisticsReport {
    InsufficientHistory {
        window: AnalysisWindow,
        earliest_bar: Option<DateTime<Tz>>,
    },
    Complete {
        window: AnalysisWindow,
        swing_count: usize,
        label_counts: BTreeMap<&'static str, usize>,
        unrecognized_pairs: usize,
        distributions: DistributionSummaries,
        recommendation: Recommendation,
    },
}

impl StatisticsReport {
    pub fn window(&self) -> &AnalysisWindow {
        match self {
            StatisticsReport::InsufficientHistory { window, .. }
            | StatisticsReport::Complete { window, .. } => window,
        }
    }
}

/// Reduce an analysis result to its statistics. Nothing is computed when the
/// history does not reach the window start.
pub fn build_report(result: &AnalysisResult) -> StatisticsReport {
    if !result.has_sufficient_history {
        return StatisticsReport::InsufficientHistory {
            window: result.window.clone(),
            earliest_bar: result.earliest_bar,
        };
    }

    let moves = &result.distributions;
    let distributions = DistributionSummaries {
        all_ranges: moves.all_ranges.summary(),
        measured_moves: moves.measured_moves.summary(),
        bullish_measured_moves: moves.bullish_measured_moves.summary(),
        bearish_measured_moves: moves.bearish_measured_moves.summary(),
        pullbacks: moves.pullbacks.summary(),
        bullish_pullbacks: moves.bullish_pullbacks.summary(),
        bearish_pullbacks: moves.bearish_pullbacks.summary(),
    };
    let recommendation = Recommendation {
        target_ticks: distributions.measured_moves.median,
        stop_ticks: distributions.pullbacks.median,
        trailing_ticks: distributions.pullbacks.minimum,
    };

    let mut label_counts = BTreeMap::new();
    for label in result.swings.iter().filter_map(|swing| swing.label) {
        *label_counts.entry(label.short()).or_insert(0) += 1;
    }

    StatisticsReport::Complete {
        window: result.window.clone(),
        swing_count: result.swings.len(),
        label_counts,
        unrecognized_pairs: moves.unrecognized_pairs,
        distributions,
        recommendation,
    }
}

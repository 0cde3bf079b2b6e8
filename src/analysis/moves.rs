use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analysis::stats::Distribution;
use crate::data::{ClassifiedSwing, SwingLabel, SwingType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

/// How an adjacent pair of swings is bucketed beyond the raw range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transition {
    MeasuredMove(Trend),
    Pullback(Trend),
    Unrecognized,
}

/// Identify the swing leg formed by `prior -> current`.
pub fn classify_transition(prior: &ClassifiedSwing, current: &ClassifiedSwing) -> Transition {
    use SwingLabel::*;
    use SwingType::*;

    let (Some(prior_label), Some(current_label)) = (prior.label, current.label) else {
        return Transition::Unrecognized;
    };

    match (
        prior.swing_type(),
        prior_label,
        current.swing_type(),
        current_label,
    ) {
        (Low, HigherLow, High, HigherHigh) => Transition::MeasuredMove(Trend::Bullish),
        (High, LowerHigh, Low, LowerLow) => Transition::MeasuredMove(Trend::Bearish),
        (High, HigherHigh, Low, HigherLow) => Transition::Pullback(Trend::Bullish),
        (Low, LowerLow, High, LowerHigh) => Transition::Pullback(Trend::Bearish),
        _ => Transition::Unrecognized,
    }
}

/// Every bucket filled by a single pass over adjacent swing pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoveDistributions {
    pub all_ranges: Distribution,
    pub measured_moves: Distribution,
    pub bullish_measured_moves: Distribution,
    pub bearish_measured_moves: Distribution,
    pub pullbacks: Distribution,
    pub bullish_pullbacks: Distribution,
    pub bearish_pullbacks: Distribution,
    pub unrecognized_pairs: usize,
}

impl MoveDistributions {
    pub fn pair_count(&self) -> usize {
        self.all_ranges.len()
    }

    fn record(&mut self, transition: Transition, ticks: Decimal) {
        self.all_ranges.push(ticks);
        match transition {
            Transition::MeasuredMove(trend) => {
                self.measured_moves.push(ticks);
                match trend {
                    Trend::Bullish => self.bullish_measured_moves.push(ticks),
                    Trend::Bearish => self.bearish_measured_moves.push(ticks),
                }
            }
            Transition::Pullback(trend) => {
                self.pullbacks.push(ticks);
                match trend {
                    Trend::Bullish => self.bullish_pullbacks.push(ticks),
                    Trend::Bearish => self.bearish_pullbacks.push(ticks),
                }
            }
            Transition::Unrecognized => self.unrecognized_pairs += 1,
        }
    }
}

/// Distance between two swings in whole and fractional ticks.
pub fn ticks_between(a: Decimal, b: Decimal, tick_size: Decimal) -> Decimal {
    (a - b).abs() / tick_size
}

/// Walk adjacent pairs of the classified sequence and bucket each leg.
/// `tick_size` must be positive.
pub fn aggregate_moves(swings: &[ClassifiedSwing], tick_size: Decimal) -> MoveDistributions {
    let mut distributions = MoveDistributions::default();
    for (prior, current) in swings.iter().tuple_windows() {
        let ticks = ticks_between(current.price(), prior.price(), tick_size);
        distributions.record(classify_transition(prior, current), ticks);
    }
    distributions
}

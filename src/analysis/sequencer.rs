use rust_decimal::Decimal;

use crate::data::{RawSwing, SwingType};

/// Drop candidates repeating the price of the previous raw candidate of the
/// same type. Must run on the unfiltered detection-order stream so plateau
/// repeats are caught before windowing separates them.
pub fn suppress_duplicates(candidates: Vec<RawSwing>) -> Vec<RawSwing> {
    let mut last_high: Option<Decimal> = None;
    let mut last_low: Option<Decimal> = None;

    candidates
        .into_iter()
        .filter(|swing| {
            let slot = match swing.swing_type {
                SwingType::High => &mut last_high,
                SwingType::Low => &mut last_low,
            };
            let repeat = *slot == Some(swing.price);
            *slot = Some(swing.price);
            !repeat
        })
        .collect()
}

/// Stable chronological order; same-timestamp candidates keep detection order.
pub fn order_swings(mut swings: Vec<RawSwing>) -> Vec<RawSwing> {
    swings.sort_by_key(|swing| swing.timestamp);
    swings
}

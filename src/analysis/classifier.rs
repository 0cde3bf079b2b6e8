use rust_decimal::Decimal;

use crate::data::{ClassifiedSwing, RawSwing, SwingLabel, SwingType};

/// Label each swing against the nearest earlier swing of the same type.
///
/// A single forward pass keeps the last high and last low seen so far. The
/// first swing of each type stays unlabelled. Comparisons are strict, so an
/// exact tie yields `LowerHigh` for highs and `HigherLow` for lows.
pub fn classify_swings(swings: &[RawSwing]) -> Vec<ClassifiedSwing> {
    let mut last_high: Option<Decimal> = None;
    let mut last_low: Option<Decimal> = None;

    swings
        .iter()
        .map(|swing| {
            let label = match swing.swing_type {
                SwingType::High => {
                    let label = last_high.map(|prior| {
                        if swing.price > prior {
                            SwingLabel::HigherHigh
                        } else {
                            SwingLabel::LowerHigh
                        }
                    });
                    last_high = Some(swing.price);
                    label
                }
                SwingType::Low => {
                    let label = last_low.map(|prior| {
                        if swing.price < prior {
                            SwingLabel::LowerLow
                        } else {
                            SwingLabel::HigherLow
                        }
                    });
                    last_low = Some(swing.price);
                    label
                }
            };
            ClassifiedSwing {
                swing: swing.clone(),
                label,
            }
        })
        .collect()
}

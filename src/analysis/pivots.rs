use rust_decimal::Decimal;

use crate::data::{Bar, RawSwing, SwingType};

/// Pivot prices aligned to bar index; `None` where the bar is not a pivot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotSeries {
    pub highs: Vec<Option<Decimal>>,
    pub lows: Vec<Option<Decimal>>,
}

impl PivotSeries {
    /// Flatten both streams into candidates in detection order: by bar index,
    /// with the high of a bar preceding its low.
    pub fn candidates(&self, bars: &[Bar]) -> Vec<RawSwing> {
        let mut candidates = Vec::new();
        for (index, bar) in bars.iter().enumerate() {
            let streams = [
                (self.highs.get(index).copied().flatten(), SwingType::High),
                (self.lows.get(index).copied().flatten(), SwingType::Low),
            ];
            for (price, swing_type) in streams {
                if let Some(price) = price {
                    candidates.push(RawSwing {
                        index,
                        price,
                        timestamp: bar.timestamp,
                        swing_type,
                    });
                }
            }
        }
        candidates
    }
}

/// Flag bars whose high (low) is a strict extremum over `strength` bars on
/// each side. Bars closer than `strength` to either end never qualify.
pub fn detect_pivots(bars: &[Bar], strength: usize) -> PivotSeries {
    let len = bars.len();
    let mut series = PivotSeries {
        highs: vec![None; len],
        lows: vec![None; len],
    };
    if strength == 0 || strength > len.saturating_sub(1) / 2 {
        return series;
    }

    for idx in strength..len - strength {
        let bar = &bars[idx];
        let neighbours = bars[idx - strength..=idx + strength]
            .iter()
            .enumerate()
            .filter(|(offset, _)| *offset != strength)
            .map(|(_, other)| other);

        let mut is_high = true;
        let mut is_low = true;
        for other in neighbours {
            is_high &= bar.high > other.high;
            is_low &= bar.low < other.low;
            if !is_high && !is_low {
                break;
            }
        }

        if is_high {
            series.highs[idx] = Some(bar.high);
        }
        if is_low {
            series.lows[idx] = Some(bar.low);
        }
    }

    series
}

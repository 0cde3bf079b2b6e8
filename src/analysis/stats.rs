use rust_decimal::Decimal;
use serde::Serialize;

/// Append-only sample bucket, measured in ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    values: Vec<Decimal>,
}

impl Distribution {
    pub fn push(&mut self, value: Decimal) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_values(self.values())
    }
}

/// Reduced view of a distribution. Every statistic is `None` when there are
/// no samples, which keeps "no data" apart from a genuine zero-tick move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub average: Option<Decimal>,
    pub median: Option<Decimal>,
    pub minimum: Option<Decimal>,
}

impl Summary {
    pub fn from_values(values: &[Decimal]) -> Self {
        Self {
            count: values.len(),
            average: mean(values),
            median: median(values),
            minimum: values.iter().copied().min(),
        }
    }
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let total: Decimal = values.iter().copied().sum();
    Some(total / Decimal::from(values.len()))
}

fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    } else {
        Some(sorted[mid])
    }
}

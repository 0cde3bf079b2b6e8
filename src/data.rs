use chrono::{DateTime, NaiveDate, Weekday};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Single OHLC bar as delivered by the bar source.
#[derive(Debug, Clone, Serialize)]
pub struct Bar {
    pub timestamp: DateTime<Tz>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub tick_size: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SwingType {
    High,
    Low,
}

/// Unlabelled pivot candidate taken straight from the detector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawSwing {
    pub index: usize,
    pub price: Decimal,
    pub timestamp: DateTime<Tz>,
    pub swing_type: SwingType,
}

/// Market-structure label relative to the previous swing of the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SwingLabel {
    HigherHigh,
    LowerHigh,
    HigherLow,
    LowerLow,
}

impl SwingLabel {
    pub fn short(self) -> &'static str {
        match self {
            SwingLabel::HigherHigh => "HH",
            SwingLabel::LowerHigh => "LH",
            SwingLabel::HigherLow => "HL",
            SwingLabel::LowerLow => "LL",
        }
    }
}

/// Swing after the classification pass. `label` is `None` for the first
/// swing of its type in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedSwing {
    #[serde(flatten)]
    pub swing: RawSwing,
    pub label: Option<SwingLabel>,
}

impl ClassifiedSwing {
    pub fn price(&self) -> Decimal {
        self.swing.price
    }

    pub fn swing_type(&self) -> SwingType {
        self.swing.swing_type
    }
}

/// Daily session in whole hours of the reference timezone, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for SessionHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 16,
        }
    }
}

impl SessionHours {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }
}

/// Calendar window the swings are drawn from. Computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(serialize_with = "serialize_tz")]
    pub timezone: Tz,
    pub session: SessionHours,
    #[serde(serialize_with = "serialize_weekday")]
    pub first_weekday: Weekday,
    #[serde(serialize_with = "serialize_weekday")]
    pub last_weekday: Weekday,
}

impl AnalysisWindow {
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn contains_weekday(&self, weekday: Weekday) -> bool {
        let day = weekday.num_days_from_monday();
        day >= self.first_weekday.num_days_from_monday()
            && day <= self.last_weekday.num_days_from_monday()
    }
}

fn serialize_tz<S: Serializer>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tz.name())
}

fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&day.to_string())
}

use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};
use chrono_tz::Tz;

use crate::data::{AnalysisWindow, Bar, RawSwing, SessionHours};

/// Weekday the analysis window always ends on.
pub const ANCHOR_WEEKDAY: Weekday = Weekday::Fri;

/// Most recent `ANCHOR_WEEKDAY` on or before `anchor`.
pub fn last_anchor_weekday(anchor: NaiveDate) -> NaiveDate {
    let back = (anchor.weekday().num_days_from_monday() + 7
        - ANCHOR_WEEKDAY.num_days_from_monday())
        % 7;
    anchor - Duration::days(i64::from(back))
}

/// Build the trailing calendar window ending on the last Friday at or before
/// `anchor`. `window_days` counts both endpoints.
pub fn build_window(
    anchor: NaiveDate,
    window_days: u32,
    timezone: Tz,
    session: SessionHours,
) -> AnalysisWindow {
    let end_date = last_anchor_weekday(anchor);
    let start_date = end_date - Duration::days(i64::from(window_days.max(1) - 1));
    AnalysisWindow {
        start_date,
        end_date,
        timezone,
        session,
        first_weekday: Weekday::Mon,
        last_weekday: Weekday::Fri,
    }
}

/// Date of the most recent bar in the window's timezone.
pub fn anchor_from_bars(bars: &[Bar], timezone: Tz) -> Option<NaiveDate> {
    bars.last()
        .map(|bar| bar.timestamp.with_timezone(&timezone).date_naive())
}

/// True when the earliest bar reaches back to the window start.
pub fn covers_window(bars: &[Bar], window: &AnalysisWindow) -> bool {
    bars.first()
        .map(|bar| bar.timestamp.with_timezone(&window.timezone).date_naive() <= window.start_date)
        .unwrap_or(false)
}

impl AnalysisWindow {
    /// Date, weekday and session-hour test in the window's timezone.
    pub fn admits(&self, swing: &RawSwing) -> bool {
        let local = swing.timestamp.with_timezone(&self.timezone);
        self.contains_date(local.date_naive())
            && self.contains_weekday(local.weekday())
            && self.session.contains(local.hour())
    }
}

/// Drop candidates outside the window; the rest keep their relative order.
pub fn filter_to_window(candidates: Vec<RawSwing>, window: &AnalysisWindow) -> Vec<RawSwing> {
    candidates
        .into_iter()
        .filter(|swing| window.admits(swing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SwingType;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;
    use chrono_tz::Europe::London;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window() -> AnalysisWindow {
        build_window(date(2024, 3, 20), 14, New_York, SessionHours::default())
    }

    fn swing_at(tz: Tz, y: i32, m: u32, d: u32, h: u32, min: u32) -> RawSwing {
        RawSwing {
            index: 0,
            price: dec!(100),
            timestamp: tz.with_ymd_and_hms(y, m, d, h, min, 0).unwrap(),
            swing_type: SwingType::High,
        }
    }

    #[test]
    fn window_ends_on_last_friday() {
        // 2024-03-20 is a Wednesday.
        assert_eq!(last_anchor_weekday(date(2024, 3, 20)), date(2024, 3, 15));
        assert_eq!(last_anchor_weekday(date(2024, 3, 15)), date(2024, 3, 15));
        assert_eq!(last_anchor_weekday(date(2024, 3, 16)), date(2024, 3, 15));
        assert_eq!(last_anchor_weekday(date(2024, 3, 14)), date(2024, 3, 8));
    }

    #[test]
    fn window_spans_thirteen_days_between_endpoints() {
        for offset in 0..14 {
            let anchor = date(2024, 1, 1) + Duration::days(offset);
            let window = build_window(anchor, 14, New_York, SessionHours::default());
            assert_eq!(window.end_date.weekday(), Weekday::Fri);
            assert!(window.end_date <= anchor);
            assert!(anchor - window.end_date < Duration::days(7));
            assert_eq!(window.end_date - window.start_date, Duration::days(13));
        }
    }

    #[test]
    fn session_and_weekday_filters_apply() {
        let window = window();
        assert_eq!(window.start_date, date(2024, 3, 2));
        // Monday inside the session.
        assert!(window.admits(&swing_at(New_York, 2024, 3, 4, 9, 0)));
        // Session end is exclusive.
        assert!(!window.admits(&swing_at(New_York, 2024, 3, 4, 16, 0)));
        assert!(!window.admits(&swing_at(New_York, 2024, 3, 4, 8, 59)));
        // Saturday inside the date range.
        assert!(!window.admits(&swing_at(New_York, 2024, 3, 9, 10, 0)));
        // After the window end.
        assert!(!window.admits(&swing_at(New_York, 2024, 3, 18, 10, 0)));
        // Window start date is inclusive but 2024-03-02 is a Saturday.
        assert!(!window.admits(&swing_at(New_York, 2024, 3, 2, 10, 0)));
        assert!(window.admits(&swing_at(New_York, 2024, 3, 15, 15, 59)));
    }

    #[test]
    fn timestamps_are_converted_before_testing() {
        let window = window();
        // 14:30 London on 2024-03-05 is 09:30 in New York.
        assert!(window.admits(&swing_at(London, 2024, 3, 5, 14, 30)));
        // 13:30 London is 08:30 in New York, before the session.
        assert!(!window.admits(&swing_at(London, 2024, 3, 5, 13, 30)));
        // US DST starts 2024-03-10 while London is still on GMT: 13:30 London is 09:30 New York.
        assert!(window.admits(&swing_at(London, 2024, 3, 12, 13, 30)));
    }

    #[test]
    fn filter_keeps_order() {
        let window = window();
        let kept = filter_to_window(
            vec![
                swing_at(New_York, 2024, 3, 6, 11, 0),
                swing_at(New_York, 2024, 3, 6, 20, 0),
                swing_at(New_York, 2024, 3, 5, 10, 0),
            ],
            &window,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].timestamp.day(), 6);
        assert_eq!(kept[1].timestamp.day(), 5);
    }
}

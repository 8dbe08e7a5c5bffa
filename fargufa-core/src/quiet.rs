//! Quiet-hours gate evaluated before anything touches the network.

use std::fmt;

use chrono::{DateTime, NaiveTime, ParseError, Utc};
use serde::{Deserialize, Serialize};

const CLOCK_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Half-open UTC time-of-day window `[start, end)` in which no checks run.
///
/// A window whose start lies after its end wraps past midnight. Equal bounds
/// describe an empty window.
pub struct QuietWindow {
    /// First quiet minute (inclusive).
    pub start: NaiveTime,
    /// End of the window (exclusive).
    pub end: NaiveTime,
}

impl QuietWindow {
    /// Build a window from its bounds.
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether `now` falls inside the window.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let time = now.time();
        if self.start <= self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

impl Default for QuietWindow {
    /// 01:00–06:30 UTC.
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(1, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(6, 30, 0).unwrap_or_default(),
        }
    }
}

impl fmt::Display for QuietWindow {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}–{}",
            self.start.format(CLOCK_FORMAT),
            self.end.format(CLOCK_FORMAT)
        )
    }
}

/// Parse an `HH:MM` clock value.
///
/// # Errors
///
/// Returns a [`ParseError`] when the value is not a valid 24-hour time.
pub fn parse_clock(value: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 3, hour, minute, second)
            .unwrap()
    }

    #[test]
    fn default_window_bounds() {
        let window = QuietWindow::default();

        assert!(window.contains(at(1, 0, 0)), "01:00 is quiet");
        assert!(window.contains(at(3, 15, 0)));
        assert!(window.contains(at(6, 29, 59)));
        assert!(!window.contains(at(6, 30, 0)), "06:30 is not quiet");
        assert!(!window.contains(at(0, 59, 59)));
        assert!(!window.contains(at(0, 0, 0)));
        assert!(!window.contains(at(12, 0, 0)));
        assert!(!window.contains(at(23, 59, 59)));
    }

    #[test]
    fn every_minute_of_the_day_matches_the_half_open_range() {
        let window = QuietWindow::default();
        for hour in 0..24 {
            for minute in 0..60 {
                let expected = (1..6).contains(&hour) || (hour == 6 && minute < 30);
                assert_eq!(
                    window.contains(at(hour, minute, 0)),
                    expected,
                    "{hour:02}:{minute:02}"
                );
            }
        }
    }

    #[test]
    fn window_may_wrap_midnight() {
        let window = QuietWindow::new(parse_clock("22:00").unwrap(), parse_clock("02:00").unwrap());

        assert!(window.contains(at(23, 0, 0)));
        assert!(window.contains(at(1, 59, 0)));
        assert!(!window.contains(at(2, 0, 0)));
        assert!(!window.contains(at(21, 59, 0)));
    }

    #[test]
    fn equal_bounds_are_never_quiet() {
        let noon = parse_clock("12:00").unwrap();
        let window = QuietWindow::new(noon, noon);

        assert!(!window.contains(at(12, 0, 0)));
    }

    #[test]
    fn displays_as_clock_range() {
        assert_eq!(QuietWindow::default().to_string(), "01:00–06:30");
    }

    #[test]
    fn rejects_malformed_clock_values() {
        assert!(parse_clock("25:00").is_err());
        assert!(parse_clock("soon").is_err());
        assert_eq!(parse_clock(" 7:05 ").unwrap(), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
    }
}

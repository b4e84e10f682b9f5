use chrono::{Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub type Timestamp = chrono::DateTime<Utc>;

pub fn now() -> Timestamp {
    Utc::now()
}

/// A UTC calendar day, the bucket key of the daily view counters.
///
/// Serialized as `YYYY-MM-DD`, so lexical order is chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    /// Truncates the timestamp to midnight UTC.
    pub fn of(timestamp: Timestamp) -> Self {
        Self(timestamp.date_naive())
    }

    pub fn today() -> Self {
        Self::of(now())
    }

    /// The instant this day starts at.
    pub fn start(self) -> Timestamp {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// Goes back `days` days, stopping at the earliest representable date.
    pub fn days_before(self, days: u32) -> Self {
        Self(
            self.0
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN),
        )
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for Day {
    type Err = chrono::ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(input, "%Y-%m-%d").map(Day)
    }
}

/// The trailing range of days a stats query covers.
///
/// A window of `days` starts at midnight UTC `days` days before `now` and ends at `now`,
/// so it contains `days + 1` daily buckets including today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub days: u32,
    pub start: Day,
    pub end: Timestamp,
}

impl Window {
    pub fn trailing(days: u32, now: Timestamp) -> Self {
        Self {
            days,
            start: Day::of(now).days_before(days),
            end: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn day_truncates_to_utc_midnight() {
        let late = at(2024, 3, 9, 23, 59);
        let early = at(2024, 3, 10, 0, 0);

        assert_eq!(Day::of(late).to_string(), "2024-03-09");
        assert_eq!(Day::of(early).to_string(), "2024-03-10");
        assert_eq!(Day::of(late).start(), at(2024, 3, 9, 0, 0));
    }

    #[test]
    fn day_parses_its_own_display() {
        let day: Day = "2024-02-29".parse().unwrap();
        assert_eq!(day.to_string(), "2024-02-29");
        assert_eq!(
            serde_json::to_string(&day).unwrap(),
            "\"2024-02-29\"",
            "days should serialize as plain dates"
        );
    }

    #[test]
    fn window_starts_at_midnight_days_ago() {
        let now = at(2024, 3, 10, 15, 30);
        let window = Window::trailing(7, now);

        assert_eq!(window.start.to_string(), "2024-03-03");
        assert_eq!(window.end, now);
        assert_eq!(window.start.start(), at(2024, 3, 3, 0, 0));
    }

    #[test]
    fn huge_window_stops_at_the_earliest_date() {
        let now = at(2024, 3, 10, 15, 30);
        let window = Window::trailing(u32::MAX, now);

        assert_eq!(window.start, Day(NaiveDate::MIN));
        assert_eq!(window.days, u32::MAX);
        assert!(window.start < Day::of(now));
    }
}

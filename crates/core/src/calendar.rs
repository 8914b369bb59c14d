use std::{fmt, sync::Arc};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Source of the current instant. Injected so "today" can be pinned in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Returns a clock reading the system time.
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Returns a clock frozen at `instant`.
pub fn fixed_clock(instant: DateTime<Utc>) -> Clock {
    Arc::new(move || instant)
}

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Parses an IANA timezone name.
pub fn parse_timezone(timezone: &str) -> Result<Tz, CalendarError> {
    timezone
        .parse()
        .map_err(|_| CalendarError::InvalidTimezone(timezone.to_string()))
}

/// Resolves calendar dates in the clinic's local timezone.
///
/// Date-dependent computed fields (age, resolution, return forecasts) are
/// evaluated against [`ClinicCalendar::today`] on every read and never cached,
/// so they roll over at local midnight.
#[derive(Clone)]
pub struct ClinicCalendar {
    timezone: Tz,
    clock: Clock,
}

impl ClinicCalendar {
    pub fn new(timezone: Tz, clock: Clock) -> Self {
        Self { timezone, clock }
    }

    /// Calendar reading the system clock.
    pub fn system(timezone: Tz) -> Self {
        Self::new(timezone, system_clock())
    }

    /// UTC calendar frozen at the start of `day`.
    pub fn pinned(day: NaiveDate) -> Self {
        Self::new(Tz::UTC, fixed_clock(day.and_time(NaiveTime::MIN).and_utc()))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Today's date in the clinic timezone.
    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }

    /// Truncates an instant to its date in the clinic timezone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }
}

impl fmt::Debug for ClinicCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClinicCalendar")
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn today_follows_clinic_timezone() {
        let tz = parse_timezone("America/Montreal").expect("known timezone");
        let calendar = ClinicCalendar::new(tz, fixed_clock(instant("2024-06-15T02:30:00Z")));

        assert_eq!(calendar.today(), NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());
    }

    #[test]
    fn pinned_calendar_reports_requested_day() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let calendar = ClinicCalendar::pinned(day);
        assert_eq!(calendar.today(), day);
        assert_eq!(calendar.now().to_rfc3339(), "2024-06-15T00:00:00+00:00");
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = parse_timezone("Mars/Olympus").expect_err("unknown timezone");
        assert!(matches!(err, CalendarError::InvalidTimezone(value) if value == "Mars/Olympus"));
    }
}

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use chrono::{DateTime, Offset};
use chrono_tz::Tz;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::ValidationError;

pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Inclusive calendar-day range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: Date,
    end: Date,
}

impl DateWindow {
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::WindowStartAfterEnd {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` bounds.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Window ending on `end` and starting `days` calendar days earlier.
    pub fn trailing(end: Date, days: i64) -> Result<Self, ValidationError> {
        let start = end
            .checked_sub(Duration::days(days))
            .ok_or(ValidationError::WindowOutOfRange { days })?;
        Self::new(start, end)
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Window selector carried by a chart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartWindow {
    /// Today only, drawn from intraday bars.
    Day,
    Week,
    Month,
    Year,
    Custom(DateWindow),
}

impl ChartWindow {
    /// Length of the trailing default window in days; `None` for custom windows.
    pub const fn trailing_days(self) -> Option<i64> {
        match self {
            Self::Day => Some(0),
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Year => Some(365),
            Self::Custom(_) => None,
        }
    }

    /// Concrete date range for a request evaluated on `today`.
    pub fn resolve(self, today: Date) -> Result<DateWindow, ValidationError> {
        match self {
            Self::Custom(window) => Ok(window),
            other => DateWindow::trailing(today, other.trailing_days().unwrap_or_default()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::Custom(_) => "custom",
        }
    }
}

impl Display for ChartWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(window) => write!(f, "custom {window}"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for ChartWindow {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "intraday" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(ValidationError::InvalidWindow {
                value: other.to_owned(),
            }),
        }
    }
}

/// Source of "today" for default windows.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Wall clock read in the exchange's time zone.
///
/// The provider stamps daily and intraday bars with US/Eastern dates, so
/// "today" follows New York rather than UTC: at 21:00 ET the trading day
/// that just closed is still today.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::in_zone(chrono_tz::America::New_York)
    }

    pub fn in_zone(zone: Tz) -> Self {
        Self { zone }
    }

    /// Looks a zone up by IANA name, e.g. `Europe/London`.
    pub fn named(name: &str) -> Option<Self> {
        name.parse::<Tz>().ok().map(Self::in_zone)
    }

    pub fn zone_name(&self) -> &'static str {
        self.zone.name()
    }

    /// Calendar date in this clock's zone at the instant `now`.
    pub fn date_at(&self, now: OffsetDateTime) -> Date {
        let offset = DateTime::from_timestamp(now.unix_timestamp(), 0)
            .map(|utc| utc.with_timezone(&self.zone).offset().fix().local_minus_utc())
            .and_then(|seconds| UtcOffset::from_whole_seconds(seconds).ok())
            .unwrap_or(UtcOffset::UTC);
        now.to_offset(offset).date()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        self.date_at(OffsetDateTime::now_utc())
    }
}

/// Clock pinned to one date, for deterministic runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

pub(crate) fn parse_date(input: &str) -> Result<Date, ValidationError> {
    Date::parse(input.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

//! Projection of an absolute instant onto the wall clock of an IANA zone.
//!
//! DST rules and offsets come from `chrono-tz`; nothing here does calendar
//! arithmetic of its own.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::{ClockError, ClockResult, UnixTimeMs, MS_PER_DAY};

/// Validated IANA zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneId(Tz);

impl ZoneId {
    pub fn parse(name: &str) -> ClockResult<Self> {
        name.trim()
            .parse::<Tz>()
            .map(Self)
            .map_err(|_| ClockError::InvalidTimezone(name.to_string()))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl FromStr for ZoneId {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wall-clock reading of one instant in one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZonedTime {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Local calendar date at midnight, reinterpreted as UTC, in days since
    /// the epoch. Only meaningful relative to another `abs_day`; it is a
    /// display approximation, not a Julian day.
    pub abs_day: f64,
    pub local_date: NaiveDate,
}

impl ZonedTime {
    /// Hour of day with minutes folded in, as used for the ambient tint.
    #[must_use]
    pub fn hour_fraction(&self) -> f64 {
        f64::from(self.hour) + f64::from(self.minute) / 60.0
    }

    /// `HH:MM`, zero padded.
    #[must_use]
    pub fn clock_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

pub fn project(instant: UnixTimeMs, zone: ZoneId) -> ClockResult<ZonedTime> {
    let utc = DateTime::from_timestamp_millis(instant.as_millis())
        .ok_or(ClockError::InstantOutOfRange(instant.as_millis()))?;
    let local = utc.with_timezone(&zone.0);
    let local_date = local.date_naive();

    #[allow(clippy::cast_precision_loss)]
    let abs_day = local_date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis() as f64
        / MS_PER_DAY;

    Ok(ZonedTime {
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
        second: local.second(),
        abs_day,
        local_date,
    })
}

/// Parse-then-project for identifiers that arrive as plain strings, e.g. from
/// the persisted document.
pub fn project_named(instant: UnixTimeMs, zone: &str) -> ClockResult<ZonedTime> {
    project(instant, ZoneId::parse(zone)?)
}

/// Whole days `peer` is ahead of (positive) or behind (negative) `focus`.
#[must_use]
pub fn day_offset(peer: &ZonedTime, focus: &ZonedTime) -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let days = (peer.abs_day - focus.abs_day).round() as i64;
    days
}

/// Badge text for a day offset; `None` when both share a day.
#[must_use]
pub fn day_badge(offset: i64) -> Option<String> {
    match offset {
        0 => None,
        n if n > 0 => Some(format!("+{n}D")),
        n => Some(format!("{n}D")),
    }
}

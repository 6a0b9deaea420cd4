//! Date and time normalization
//!
//! Zimbra hands out dates in several shapes: full `YYYY-MM-DD` profile
//! dates, year-less `--MM-DD` birthdays, bare calendar dates, naive local
//! date-times and UTC-designated instants. This module normalizes all of
//! them into the representations the target objects carry.
//!
//! The partial-date parser is best-effort by contract: it normalizes
//! optional profile data, so malformed input yields `None` rather than an
//! error and the caller omits the field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// A JSContact partial date: a calendar date whose year may be unknown
///
/// Serializes with the `@type` marker the target schema expects; an absent
/// year is omitted entirely, never emitted as null or zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    #[serde(rename = "@type")]
    type_marker: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    pub month: u32,

    pub day: u32,
}

impl PartialDate {
    pub fn new(year: Option<i32>, month: u32, day: u32) -> Self {
        Self {
            type_marker: "PartialDate".to_string(),
            year,
            month,
            day,
        }
    }
}

/// Parse a Zimbra profile date into a partial date
///
/// Accepts strict `YYYY-MM-DD` and the year-less `--MM-DD` convention.
/// Anything else (including `YYYY-MM` or non-numeric input) yields `None`.
pub fn parse_partial_date(value: &str) -> Option<PartialDate> {
    if let Some(rest) = value.strip_prefix("--") {
        let (month_s, day_s) = rest.split_once('-')?;
        let month: u32 = month_s.parse().ok()?;
        let day: u32 = day_s.parse().ok()?;
        // Validate against a leap year so --02-29 stays accepted
        NaiveDate::from_ymd_opt(2004, month, day)?;
        return Some(PartialDate::new(None, month, day));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    use chrono::Datelike;
    Some(PartialDate::new(
        Some(date.year()),
        date.month(),
        date.day(),
    ))
}

/// A parsed ISO date-time, either floating local time or a UTC instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoDateTime {
    /// Naive local date-time with no timezone information
    Floating(NaiveDateTime),
    /// Instant carrying the UTC designator
    Utc(DateTime<Utc>),
}

impl IsoDateTime {
    /// The wall-clock value, ignoring any timezone tag
    pub fn naive(&self) -> NaiveDateTime {
        match self {
            Self::Floating(dt) => *dt,
            Self::Utc(dt) => dt.naive_utc(),
        }
    }

    /// Whether this value carries timezone information
    pub fn has_timezone(&self) -> bool {
        matches!(self, Self::Utc(_))
    }
}

/// Parse an ISO 8601 date or date-time string
///
/// A bare calendar date defaults to midnight. Only the `Z` designator form
/// carries timezone information; the other forms stay floating.
pub fn parse_iso_datetime(value: &str) -> Result<IsoDateTime> {
    if let Some(naive_part) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(naive_part, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| MigrateError::Mapping(format!("Bad UTC datetime '{}': {}", value, e)))?;
        return Ok(IsoDateTime::Utc(naive.and_utc()));
    }

    if value.contains('T') {
        let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| MigrateError::Mapping(format!("Bad datetime '{}': {}", value, e)))?;
        return Ok(IsoDateTime::Floating(naive));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| MigrateError::Mapping(format!("Bad date '{}': {}", value, e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| MigrateError::Mapping(format!("Bad date '{}'", value)))?;
    Ok(IsoDateTime::Floating(midnight))
}

/// Convert a local date-time string in a named IANA zone to a UTC instant
///
/// An input that already carries the UTC designator passes through untouched.
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
pub fn local_to_utc(value: &str, tz_id: &str) -> Result<DateTime<Utc>> {
    let parsed = parse_iso_datetime(value)?;

    let naive = match parsed {
        IsoDateTime::Utc(dt) => return Ok(dt),
        IsoDateTime::Floating(naive) => naive,
    };

    let tz: Tz = tz_id
        .parse()
        .map_err(|_| MigrateError::Mapping(format!("Unknown timezone '{}'", tz_id)))?;

    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        chrono::LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        chrono::LocalResult::None => Err(MigrateError::Mapping(format!(
            "Local time '{}' does not exist in zone '{}'",
            value, tz_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_partial_date_full() {
        assert_eq!(
            parse_partial_date("2020-12-31"),
            Some(PartialDate::new(Some(2020), 12, 31))
        );
    }

    #[test]
    fn test_partial_date_yearless() {
        let pd = parse_partial_date("--12-31").unwrap();
        assert_eq!(pd.year, None);
        assert_eq!(pd.month, 12);
        assert_eq!(pd.day, 31);
        // No year key at all in the serialized form
        let json = serde_json::to_value(&pd).unwrap();
        assert!(json.get("year").is_none());
        assert_eq!(json["@type"], "PartialDate");
    }

    #[test]
    fn test_partial_date_rejects_other_shapes() {
        assert_eq!(parse_partial_date(""), None);
        assert_eq!(parse_partial_date("2020-12"), None);
        assert_eq!(parse_partial_date("not-a-date"), None);
        assert_eq!(parse_partial_date("--13-01"), None);
    }

    #[test]
    fn test_parse_iso_date_defaults_to_midnight() {
        let dt = parse_iso_datetime("2026-01-01").unwrap();
        assert!(!dt.has_timezone());
        assert_eq!(dt.naive().hour(), 0);
    }

    #[test]
    fn test_parse_iso_naive_datetime() {
        let dt = parse_iso_datetime("2026-01-01T12:34:56").unwrap();
        assert!(!dt.has_timezone());
        assert_eq!(dt.naive().minute(), 34);
    }

    #[test]
    fn test_parse_iso_utc_datetime() {
        let dt = parse_iso_datetime("2026-01-01T00:00:00Z").unwrap();
        assert!(dt.has_timezone());
    }

    #[test]
    fn test_local_to_utc_passthrough() {
        let dt = local_to_utc("2026-01-01T00:00:00Z", "Etc/UTC").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_local_to_utc_named_zone() {
        let dt = local_to_utc("2026-01-01T00:00:00", "America/Vancouver").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_local_to_utc_unknown_zone() {
        assert!(local_to_utc("2026-01-01T00:00:00", "Mars/Olympus").is_err());
    }
}

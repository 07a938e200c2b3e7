//! Time handling for WMS temporal dimensions.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{WmsError, WmsResult};

/// The `time` dimension of a layer, with its instants in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalDimension {
    /// Dimension name as written in the document (`time`, `TIME`, ...)
    pub name: String,
    pub units: Option<String>,
    /// The `default` attribute, verbatim
    pub default: Option<String>,
    pub values: Vec<DateTime<Utc>>,
}

impl TemporalDimension {
    pub fn first(&self) -> Option<&DateTime<Utc>> {
        self.values.first()
    }

    pub fn last(&self) -> Option<&DateTime<Utc>> {
        self.values.last()
    }

    /// The default instant, parsed. Falls back to the latest value when the
    /// attribute is absent or is the `current` keyword.
    pub fn default_instant(&self) -> WmsResult<Option<DateTime<Utc>>> {
        match self.default.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() && !d.eq_ignore_ascii_case("current") => {
                parse_instant(d).map(Some)
            }
            _ => Ok(self.last().copied()),
        }
    }
}

/// Parse an ISO 8601 instant.
///
/// Accepts RFC 3339 (`2024-01-15T12:00:00.000Z`), a naive date-time which is
/// taken as UTC, or a bare date (midnight UTC).
pub fn parse_instant(s: &str) -> WmsResult<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(WmsError::InvalidTime(s.to_string()))
}

/// Split a comma-separated dimension value list, parse every token and sort
/// the instants ascending.
///
/// Empty tokens (e.g. a trailing comma) are skipped. A single unparseable
/// token fails the whole list.
pub fn sort_dates(values: &str) -> WmsResult<Vec<DateTime<Utc>>> {
    let mut instants = values
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(parse_instant)
        .collect::<WmsResult<Vec<_>>>()?;

    instants.sort();
    Ok(instants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_instant("2024-01-15T12:00:00.000Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_offset_is_normalized() {
        let dt = parse_instant("2024-01-15T12:00:00-03:00").unwrap();
        assert_eq!(dt.hour(), 15);
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            parse_instant("2010-01-01T06:30:00").unwrap(),
            Utc.with_ymd_and_hms(2010, 1, 1, 6, 30, 0).unwrap()
        );
        assert_eq!(
            parse_instant("2010-01-01").unwrap(),
            Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        match parse_instant("last-year") {
            Err(WmsError::InvalidTime(token)) => assert_eq!(token, "last-year"),
            other => panic!("expected InvalidTime, got {:?}", other),
        }
    }

    #[test]
    fn test_sort_out_of_order_years() {
        let sorted = sort_dates("2010-01-01,2002-01-01,2030-01-01,2001-01-01").unwrap();
        let years: Vec<i32> = sorted.iter().map(|d| d.year()).collect();
        assert_eq!(years, vec![2001, 2002, 2010, 2030]);
        assert!(sorted.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sort_keeps_duplicates_and_skips_empty_tokens() {
        let sorted = sort_dates(" 2005-01-01 ,2001-01-01,,2005-01-01T00:00:00Z,").unwrap();
        assert_eq!(sorted.len(), 3);
        assert_eq!(sorted[1], sorted[2]);
    }

    #[test]
    fn test_sort_fails_on_bad_token() {
        assert!(matches!(
            sort_dates("2001-01-01,not-a-date"),
            Err(WmsError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_default_instant() {
        let mut dim = TemporalDimension {
            name: "time".into(),
            units: Some("ISO8601".into()),
            default: Some("2018-01-01T00:00:00.000Z".into()),
            values: sort_dates("2019-01-01,2018-01-01").unwrap(),
        };
        assert_eq!(
            dim.default_instant().unwrap(),
            Some(Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap())
        );

        dim.default = Some("current".into());
        assert_eq!(dim.default_instant().unwrap(), dim.last().copied());
    }
}

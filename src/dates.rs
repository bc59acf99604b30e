//! Publication-date parsing and range filtering.
//!
//! Article headers carry a machine-readable `datetime` attribute alongside a
//! human-readable date text. The attribute format drifts between full RFC 3339
//! timestamps and bare `YYYY-MM-DD` prefixes, so parsing works off the first
//! ISO date substring and only upgrades to a full timestamp when one parses
//! cleanly. Malformed input yields "no date", never an error.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap());

/// Extract the calendar date from a `datetime`-style string.
///
/// Looks for the first `YYYY-MM-DD` substring and validates it as a real
/// calendar date. Parsing is a pure function of the input: the same string
/// always yields the same result.
pub fn parse_article_date(raw: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(raw)?;
    NaiveDate::parse_from_str(caps.get(0)?.as_str(), "%Y-%m-%d").ok()
}

/// Extract a full UTC timestamp from a `datetime`-style string.
///
/// Tries RFC 3339 first; when only a bare date is present, midnight UTC on
/// that date is used so the record still carries a sortable instant.
pub fn parse_article_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(ts.with_timezone(&Utc));
    }
    parse_article_date(raw)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Inclusive date window for the harvest. Absent bounds are open ends; both
/// absent means accept everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Where a publication date falls relative to a [`DateRange`].
///
/// `BeforeStart` is the early-termination signal: listings are ordered
/// newest-first, so one article older than the window means every remaining
/// article is older too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateDisposition {
    BeforeStart,
    InRange,
    AfterEnd,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn classify(&self, date: NaiveDate) -> DateDisposition {
        if let Some(start) = self.start {
            if date < start {
                return DateDisposition::BeforeStart;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return DateDisposition::AfterEnd;
            }
        }
        DateDisposition::InRange
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.classify(date) == DateDisposition::InRange
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_article_date_from_rfc3339() {
        assert_eq!(
            parse_article_date("2025-12-30T10:15:00-03:00"),
            Some(d("2025-12-30"))
        );
    }

    #[test]
    fn test_parse_article_date_from_embedded_text() {
        assert_eq!(
            parse_article_date("Publicado el 2025-12-30 a las 10:15"),
            Some(d("2025-12-30"))
        );
    }

    #[test]
    fn test_parse_article_date_is_idempotent() {
        let raw = "2025-12-30T10:15:00-03:00";
        assert_eq!(parse_article_date(raw), parse_article_date(raw));
    }

    #[test]
    fn test_parse_article_date_malformed() {
        assert_eq!(parse_article_date("ayer a la tarde"), None);
        assert_eq!(parse_article_date(""), None);
        // Matches the shape but is not a real calendar date.
        assert_eq!(parse_article_date("2025-13-45"), None);
    }

    #[test]
    fn test_parse_article_datetime_rfc3339_normalizes_to_utc() {
        let ts = parse_article_datetime("2025-12-30T10:15:00-03:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-12-30T13:15:00+00:00");
    }

    #[test]
    fn test_parse_article_datetime_bare_date() {
        let ts = parse_article_datetime("2025-12-30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-12-30T00:00:00+00:00");
    }

    #[test]
    fn test_classify_inclusive_bounds() {
        let range = DateRange::new(Some(d("2025-12-29")), Some(d("2025-12-31")));
        assert_eq!(range.classify(d("2025-12-29")), DateDisposition::InRange);
        assert_eq!(range.classify(d("2025-12-31")), DateDisposition::InRange);
        assert_eq!(range.classify(d("2025-12-28")), DateDisposition::BeforeStart);
        assert_eq!(range.classify(d("2026-01-01")), DateDisposition::AfterEnd);
    }

    #[test]
    fn test_classify_open_start() {
        let range = DateRange::new(None, Some(d("2025-12-31")));
        assert_eq!(range.classify(d("1999-01-01")), DateDisposition::InRange);
        assert_eq!(range.classify(d("2026-01-01")), DateDisposition::AfterEnd);
    }

    #[test]
    fn test_classify_open_end() {
        let range = DateRange::new(Some(d("2025-12-29")), None);
        assert_eq!(range.classify(d("2099-01-01")), DateDisposition::InRange);
        assert_eq!(range.classify(d("2025-12-28")), DateDisposition::BeforeStart);
    }

    #[test]
    fn test_unbounded_range_accepts_everything() {
        let range = DateRange::default();
        assert!(range.contains(d("1970-01-01")));
        assert!(range.contains(d("2099-12-31")));
    }
}

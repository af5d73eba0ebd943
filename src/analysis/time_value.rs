//! Time value parsing for row values.
//!
//! Two kinds of time values show up in helpdesk-style exports:
//!
//! - durations written as `H:M` or `H:M:S` (`"03:30:18"`), which are indexed as
//!   whole minutes, and
//! - timestamps in a known format, from which an elapsed time in minutes can
//!   be derived.

use chrono::NaiveDateTime;
use log::warn;

use crate::document::field_value::FieldValue;

/// Returns true when `value` looks like a colon-delimited duration.
///
/// The value must contain at least one colon, and what remains after removing
/// the colons must be a non-empty run of ASCII digits.
///
/// ```
/// use bulkload::analysis::time_value::is_duration;
///
/// assert!(is_duration("03:30:18"));
/// assert!(!is_duration("03:30:18x"));
/// assert!(!is_duration("160"));
/// assert!(!is_duration(":"));
/// ```
pub fn is_duration(value: &str) -> bool {
    if !value.contains(':') {
        return false;
    }
    let mut digits = value.chars().filter(|&c| c != ':').peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

/// Converts a colon-delimited duration into minutes.
///
/// Only the first two segments are used (`hours * 60 + minutes`); a seconds
/// segment is ignored. A missing or non-numeric segment counts as zero, and the
/// result saturates at `i64::MAX`.
///
/// ```
/// use bulkload::analysis::time_value::parse_duration_minutes;
///
/// assert_eq!(parse_duration_minutes("03:30:18"), 210);
/// assert_eq!(parse_duration_minutes("1:x"), 60);
/// ```
pub fn parse_duration_minutes(value: &str) -> i64 {
    let mut segments = value.split(':');
    let major = segments.next().map(segment_value).unwrap_or(0);
    let minor = segments.next().map(segment_value).unwrap_or(0);
    major.saturating_mul(60).saturating_add(minor)
}

fn segment_value(segment: &str) -> i64 {
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
        return 0;
    }
    // All digits, so the only possible failure is overflow.
    segment.parse().unwrap_or(i64::MAX)
}

/// Minutes elapsed between two timestamps in the same `format`.
///
/// The difference in seconds is divided by 60 and truncated toward zero, so
/// 90 seconds is 1 minute and -90 seconds is -1 minute. A timestamp that does
/// not parse yields 0 instead of an error; one bad record should not abort a
/// bulk load.
///
/// ```
/// use bulkload::analysis::time_value::elapsed_minutes;
///
/// let fmt = "%m/%d/%Y %I:%M:%S %p";
/// assert_eq!(elapsed_minutes("1/17/2016 03:30:15 AM", "1/17/2016 03:31:45 AM", fmt), 1);
/// assert_eq!(elapsed_minutes("1/aa/2016 03:30:15 AM", "", fmt), 0);
/// ```
pub fn elapsed_minutes(start: &str, end: &str, format: &str) -> i64 {
    let parsed = NaiveDateTime::parse_from_str(start, format)
        .and_then(|start| NaiveDateTime::parse_from_str(end, format).map(|end| (start, end)));

    match parsed {
        Ok((start, end)) => (end - start).num_seconds() / 60,
        Err(e) => {
            warn!("Could not parse timestamps {start:?} / {end:?} with {format:?}: {e}");
            0
        }
    }
}

/// The duration heuristic: every text value that looks like `H:M[:S]` is
/// replaced by its minute count.
///
/// The rule applies to all columns, not only to columns known to hold
/// durations, so a value such as `"12:30"` in an unrelated column is converted
/// too. It can be switched off per import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DurationRule {
    enabled: bool,
}

impl DurationRule {
    /// Create a rule.
    pub fn new(enabled: bool) -> Self {
        DurationRule { enabled }
    }

    /// A rule that never converts anything.
    pub fn disabled() -> Self {
        DurationRule { enabled: false }
    }

    /// Whether `value` would be converted.
    pub fn matches(&self, value: &FieldValue) -> bool {
        self.enabled && value.as_text().is_some_and(is_duration)
    }

    /// Convert `value` in place when it matches. Returns true if converted.
    pub fn apply(&self, value: &mut FieldValue) -> bool {
        if !self.matches(value) {
            return false;
        }
        let minutes = value.as_text().map(parse_duration_minutes).unwrap_or(0);
        *value = FieldValue::Integer(minutes);
        true
    }
}

impl Default for DurationRule {
    fn default() -> Self {
        DurationRule { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKET_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

    #[test]
    fn test_is_duration() {
        assert!(is_duration("03:30:18"));
        assert!(is_duration("3:30"));
        assert!(!is_duration("03:30:18x"));
        assert!(!is_duration(""));
        assert!(!is_duration("160"));
        assert!(!is_duration(":"));
        assert!(!is_duration("::"));
        assert!(!is_duration("1/17/2016 03:30:15 AM"));
        assert!(!is_duration("-1:30"));
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration_minutes("03:30:18"), 210);
        assert_eq!(parse_duration_minutes("00:45"), 45);
        assert_eq!(parse_duration_minutes("12:"), 720);
        assert_eq!(parse_duration_minutes(":15"), 15);
        assert_eq!(parse_duration_minutes("2"), 120);
    }

    #[test]
    fn test_parse_duration_minutes_overflowing_segment() {
        assert_eq!(parse_duration_minutes("99999999999999999999:05"), i64::MAX);
        assert_eq!(parse_duration_minutes("05:99999999999999999999"), i64::MAX);
        assert_eq!(parse_duration_minutes("153722867280912931:00"), i64::MAX);
    }

    #[test]
    fn test_elapsed_minutes_truncates() {
        assert_eq!(
            elapsed_minutes("1/17/2016 03:30:15 AM", "1/17/2016 03:31:45 AM", TICKET_FORMAT),
            1
        );
        assert_eq!(
            elapsed_minutes("1/17/2016 03:30:15 AM", "1/17/2016 03:31:45 PM", TICKET_FORMAT),
            721
        );
    }

    #[test]
    fn test_elapsed_minutes_negative_truncates_toward_zero() {
        assert_eq!(
            elapsed_minutes("1/17/2016 03:31:45 AM", "1/17/2016 03:30:15 AM", TICKET_FORMAT),
            -1
        );
    }

    #[test]
    fn test_elapsed_minutes_parse_failures() {
        assert_eq!(elapsed_minutes("1/aa/2016 03:30:15 AM", "", TICKET_FORMAT), 0);
        assert_eq!(
            elapsed_minutes("1/17/2016 03:30:15 AM", "yesterday", TICKET_FORMAT),
            0
        );
        assert_eq!(
            elapsed_minutes("2016-01-17 03:30:15", "2016-01-17 04:30:15", TICKET_FORMAT),
            0
        );
    }

    #[test]
    fn test_duration_rule_apply() {
        let rule = DurationRule::default();

        let mut value = FieldValue::Text("01:15:00".into());
        assert!(rule.apply(&mut value));
        assert_eq!(value, FieldValue::Integer(75));

        let mut value = FieldValue::Text("Zhang Gavin".into());
        assert!(!rule.apply(&mut value));
        assert_eq!(value, FieldValue::Text("Zhang Gavin".into()));
    }

    #[test]
    fn test_duration_rule_disabled() {
        let rule = DurationRule::disabled();
        let mut value = FieldValue::Text("01:15".into());
        assert!(!rule.apply(&mut value));
        assert_eq!(value.as_text(), Some("01:15"));
    }
}

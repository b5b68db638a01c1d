//! Best-effort timestamp extraction from the head of a log line
//!
//! A line is split on whitespace and its leading tokens are tried against a
//! fixed list of layouts. The first layout that parses wins, so the order of
//! [`TimestampFormat::ALL`] matters: the nanosecond RFC 3339 layout is tried
//! before the plain one, and single-token layouts before space-separated ones.
//! A space-separated layout consumes as many leading tokens as it spans.
//!
//! Weekday names are checked for spelling only, not against the date.
//!
//! A miss is not an error. It is reported through [`Extracted::found`] and the
//! caller decides what to do with the untouched line.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc, Weekday};
use std::borrow::Cow;

/// Largest number of whitespace-separated tokens any layout spans
const MAX_TOKENS: usize = 6;

/// A recognised timestamp layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampFormat {
    /// `2006-01-02T15:04:05.999999999Z07:00`
    Rfc3339Nano,
    /// `2006-01-02T15:04:05Z07:00`
    Rfc3339,
    /// `2006-01-02T15:04:05.000-0700`
    Iso8601Compact,
    /// `2006-01-02 15:04:05 MST`
    DateTimeZone,
    /// `Mon Jan 2 15:04:05 MST 2006`
    UnixDate,
    /// `Mon, 02 Jan 2006 15:04:05 MST`
    Rfc1123,
}

impl TimestampFormat {
    /// All layouts in the order they are tried
    pub const ALL: [TimestampFormat; 6] = [
        TimestampFormat::Rfc3339Nano,
        TimestampFormat::Rfc3339,
        TimestampFormat::Iso8601Compact,
        TimestampFormat::DateTimeZone,
        TimestampFormat::UnixDate,
        TimestampFormat::Rfc1123,
    ];

    /// Number of whitespace-separated tokens this layout occupies
    pub fn token_count(self) -> usize {
        match self {
            TimestampFormat::Rfc3339Nano
            | TimestampFormat::Rfc3339
            | TimestampFormat::Iso8601Compact => 1,
            TimestampFormat::DateTimeZone => 3,
            TimestampFormat::UnixDate | TimestampFormat::Rfc1123 => 6,
        }
    }

    /// Parse exactly [`token_count`](Self::token_count) tokens with this layout
    pub fn parse(self, tokens: &[&str]) -> Option<DateTime<FixedOffset>> {
        if tokens.len() != self.token_count() {
            return None;
        }

        match self {
            TimestampFormat::Rfc3339Nano => {
                if !tokens[0].contains('.') || !has_colon_offset(tokens[0]) {
                    return None;
                }
                parse_with_offset(tokens[0], "%Y-%m-%dT%H:%M:%S%.f%:z")
            }
            TimestampFormat::Rfc3339 => {
                if !has_colon_offset(tokens[0]) {
                    return None;
                }
                parse_with_offset(tokens[0], "%Y-%m-%dT%H:%M:%S%:z")
            }
            TimestampFormat::Iso8601Compact => {
                parse_with_offset(tokens[0], "%Y-%m-%dT%H:%M:%S%.f%z")
            }
            TimestampFormat::DateTimeZone => {
                parse_with_zone(&tokens[..2].join(" "), "%Y-%m-%d %H:%M:%S%.f", tokens[2])
            }
            TimestampFormat::UnixDate => {
                if !is_weekday(tokens[0]) {
                    return None;
                }
                // Zone name sits between the clock and the year
                let text = format!("{} {} {} {}", tokens[1], tokens[2], tokens[3], tokens[5]);
                parse_with_zone(&text, "%b %d %H:%M:%S %Y", tokens[4])
            }
            TimestampFormat::Rfc1123 => {
                let day = tokens[0].strip_suffix(',')?;
                if !is_weekday(day) {
                    return None;
                }
                parse_with_zone(&tokens[1..5].join(" "), "%d %b %Y %H:%M:%S", tokens[5])
            }
        }
    }
}

/// Outcome of [`extract`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<'a> {
    /// Parsed instant, `None` on a miss
    pub timestamp: Option<DateTime<Utc>>,
    /// Layout that matched
    pub format: Option<TimestampFormat>,
    /// Rest of the line after the timestamp, or the whole line on a miss
    pub remainder: &'a str,
}

impl<'a> Extracted<'a> {
    fn miss(line: &'a str) -> Self {
        Self {
            timestamp: None,
            format: None,
            remainder: line,
        }
    }

    /// Whether a timestamp was found
    pub fn found(&self) -> bool {
        self.timestamp.is_some()
    }
}

/// Extract a leading timestamp from `line`
///
/// On success the remainder has the timestamp tokens removed and is trimmed.
/// On a miss the remainder is `line`, byte for byte.
pub fn extract(line: &str) -> Extracted<'_> {
    let tokens: Vec<&str> = line.split_whitespace().take(MAX_TOKENS).collect();
    if tokens.is_empty() {
        return Extracted::miss(line);
    }

    for format in TimestampFormat::ALL {
        let n = format.token_count();
        if tokens.len() < n {
            continue;
        }
        if let Some(parsed) = format.parse(&tokens[..n]) {
            return Extracted {
                timestamp: Some(parsed.with_timezone(&Utc)),
                format: Some(format),
                remainder: skip_tokens(line, n),
            };
        }
    }

    Extracted::miss(line)
}

/// Drop the first `n` whitespace-separated tokens and trim what is left
fn skip_tokens(line: &str, n: usize) -> &str {
    let mut rest = line;
    for _ in 0..n {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = &rest[end..];
    }
    rest.trim()
}

/// Rewrite a trailing `Z` as an explicit zero offset
fn normalize_zulu(token: &str) -> Cow<'_, str> {
    match token.strip_suffix(['Z', 'z']) {
        Some(head) => Cow::Owned(format!("{head}+00:00")),
        None => Cow::Borrowed(token),
    }
}

/// Whether the token ends in a `+HH:MM`/`-HH:MM` offset (or `Z`)
fn has_colon_offset(token: &str) -> bool {
    let normalized = normalize_zulu(token);
    let bytes = normalized.as_bytes();
    bytes.len() >= 6
        && matches!(bytes[bytes.len() - 6], b'+' | b'-')
        && bytes[bytes.len() - 3] == b':'
}

/// Three-letter weekday abbreviation, any case
fn is_weekday(name: &str) -> bool {
    name.len() == 3 && name.parse::<Weekday>().is_ok()
}

fn parse_with_offset(token: &str, fmt: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(&normalize_zulu(token), fmt).ok()
}

fn parse_with_zone(text: &str, fmt: &str, zone: &str) -> Option<DateTime<FixedOffset>> {
    let offset = zone_offset(zone)?;
    let naive = NaiveDateTime::parse_from_str(text, fmt).ok()?;
    offset.from_local_datetime(&naive).single()
}

/// Resolve a zone abbreviation to a fixed offset
///
/// Unknown upper-case abbreviations are accepted with a zero offset.
fn zone_offset(name: &str) -> Option<FixedOffset> {
    let hours = match name {
        "UTC" | "GMT" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        other
            if (3..=5).contains(&other.len())
                && other.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            0
        }
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_rfc3339_zulu() {
        let got = extract("2024-01-01T00:00:02Z two seconds later");
        assert!(got.found());
        assert_eq!(got.format, Some(TimestampFormat::Rfc3339));
        assert_eq!(got.timestamp, Some(utc(2024, 1, 1, 0, 0, 2)));
        assert_eq!(got.remainder, "two seconds later");
    }

    #[test]
    fn test_rfc3339_nano_wins_over_plain() {
        let got = extract("2024-01-01T00:00:00.123456789Z msg");
        assert_eq!(got.format, Some(TimestampFormat::Rfc3339Nano));
        assert_eq!(got.timestamp.unwrap().nanosecond(), 123_456_789);
        assert_eq!(got.remainder, "msg");
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let got = extract("2024-01-01T02:00:00+02:00 shifted");
        assert_eq!(got.timestamp, Some(utc(2024, 1, 1, 0, 0, 0)));
        assert_eq!(got.remainder, "shifted");
    }

    #[test]
    fn test_compact_offset() {
        let got = extract("2024-01-01T00:00:00-0100 late");
        assert_eq!(got.format, Some(TimestampFormat::Iso8601Compact));
        assert_eq!(got.timestamp, Some(utc(2024, 1, 1, 1, 0, 0)));
        assert_eq!(got.remainder, "late");

        let got = extract("2024-01-01T00:00:00.500-0100 late");
        assert_eq!(got.format, Some(TimestampFormat::Iso8601Compact));
        let parsed = got.timestamp.unwrap();
        assert_eq!(parsed.hour(), 1);
        assert_eq!(parsed.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_offset_without_colon_is_not_rfc3339() {
        assert!(TimestampFormat::Rfc3339
            .parse(&["2024-01-01T00:00:00+0200"])
            .is_none());
        assert!(TimestampFormat::Rfc3339Nano
            .parse(&["2024-01-01T00:00:00.1+0200"])
            .is_none());

        let got = extract("2024-01-01T02:00:00+0200 msg");
        assert_eq!(got.format, Some(TimestampFormat::Iso8601Compact));
        assert_eq!(got.timestamp, Some(utc(2024, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_date_time_zone() {
        let got = extract("2024-01-15 10:30:00 UTC   service started  ");
        assert_eq!(got.format, Some(TimestampFormat::DateTimeZone));
        assert_eq!(got.timestamp, Some(utc(2024, 1, 15, 10, 30, 0)));
        assert_eq!(got.remainder, "service started");
    }

    #[test]
    fn test_date_time_named_zone() {
        let got = extract("2024-01-15 10:30:00 EST request");
        assert_eq!(got.timestamp, Some(utc(2024, 1, 15, 15, 30, 0)));
    }

    #[test]
    fn test_unix_date() {
        let got = extract("Mon Jan 15 10:30:00 UTC 2024 kernel: ready");
        assert_eq!(got.format, Some(TimestampFormat::UnixDate));
        assert_eq!(got.timestamp, Some(utc(2024, 1, 15, 10, 30, 0)));
        assert_eq!(got.remainder, "kernel: ready");
    }

    #[test]
    fn test_weekday_not_checked_against_date() {
        // 2024-01-15 is a Monday
        let got = extract("Tue Jan 15 10:30:00 UTC 2024 msg");
        assert_eq!(got.format, Some(TimestampFormat::UnixDate));
        assert_eq!(got.timestamp, Some(utc(2024, 1, 15, 10, 30, 0)));
        assert_eq!(got.remainder, "msg");

        let got = extract("Fri, 15 Jan 2024 10:30:00 GMT msg");
        assert_eq!(got.format, Some(TimestampFormat::Rfc1123));
        assert_eq!(got.timestamp, Some(utc(2024, 1, 15, 10, 30, 0)));
    }

    #[test]
    fn test_weekday_spelling_still_checked() {
        let line = "Xyz Jan 15 10:30:00 UTC 2024 msg";
        let got = extract(line);
        assert!(!got.found());
        assert_eq!(got.remainder, line);

        assert!(!extract("Mon 15 Jan 2024 10:30:00 GMT msg").found());
    }

    #[test]
    fn test_rfc1123() {
        let got = extract("Mon, 15 Jan 2024 10:30:00 GMT GET /index.html");
        assert_eq!(got.format, Some(TimestampFormat::Rfc1123));
        assert_eq!(got.timestamp, Some(utc(2024, 1, 15, 10, 30, 0)));
        assert_eq!(got.remainder, "GET /index.html");
    }

    #[test]
    fn test_timestamp_only_line() {
        let got = extract("2024-01-01T00:00:00Z");
        assert!(got.found());
        assert_eq!(got.remainder, "");
    }

    #[test]
    fn test_miss_keeps_line() {
        for line in ["just text", "", "   ", "2024-13-45T99:00:00Z bad", "  padded miss "] {
            let got = extract(line);
            assert!(!got.found(), "unexpected hit for {line:?}");
            assert_eq!(got.remainder, line);
            assert_eq!(got.format, None);
        }
    }

    #[test]
    fn test_unknown_zone_rules() {
        assert_eq!(zone_offset("CEST"), FixedOffset::east_opt(0));
        assert_eq!(zone_offset("utc"), None);
        assert_eq!(zone_offset("X1"), None);
        assert_eq!(zone_offset("PDT"), FixedOffset::east_opt(-7 * 3600));
    }

    #[test]
    fn test_wrong_token_count_rejected() {
        assert!(TimestampFormat::Rfc3339
            .parse(&["2024-01-01T00:00:00Z", "extra"])
            .is_none());
    }

    #[test]
    fn test_skip_tokens() {
        assert_eq!(skip_tokens("  a  b   c d ", 2), "c d");
        assert_eq!(skip_tokens("a", 1), "");
    }
}

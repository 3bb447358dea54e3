//! `Date` header parsing.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

/// One strategy for reading a `Date` header value.
#[derive(Debug, Clone, Copy)]
enum DateFormat {
    /// A `strftime` pattern with a numeric zone.
    Pattern(&'static str),
    /// RFC 2822 / RFC 1123, including named zones such as `GMT` or `EST`.
    Rfc2822,
    /// A `strftime` pattern followed by a parenthesised zone name: `-0700 (PDT)`.
    CommentedZone(&'static str),
    /// RFC 3339 / ISO 8601.
    Rfc3339,
}

/// Formats tried in order; the first successful parse wins.
const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Pattern("%a, %d %b %Y %H:%M:%S %z"),
    DateFormat::Rfc2822,
    DateFormat::CommentedZone("%a, %d %b %Y %H:%M:%S %z"),
    DateFormat::Pattern("%d %b %Y %H:%M:%S %z"),
    DateFormat::Rfc3339,
];

impl DateFormat {
    fn parse(self, input: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Pattern(fmt) => DateTime::parse_from_str(input, fmt).ok(),
            Self::Rfc2822 => DateTime::parse_from_rfc2822(input).ok(),
            Self::CommentedZone(fmt) => {
                let without_comment = strip_zone_comment(input)?;
                DateTime::parse_from_str(without_comment, fmt).ok()
            }
            Self::Rfc3339 => DateTime::parse_from_rfc3339(input).ok(),
        }
    }
}

/// Parse an email `Date` header value.
///
/// Returns `None` (never an error) when no known format matches. Callers
/// must treat `None` as "unknown", not as the epoch.
pub fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = DATE_FORMATS.iter().find_map(|fmt| fmt.parse(trimmed));
    if parsed.is_none() {
        debug!(date = trimmed, "Could not parse date");
    }
    parsed
}

/// `"Mon, 2 Jan 2006 15:04:05 -0700 (MST)"` → `"Mon, 2 Jan 2006 15:04:05 -0700"`.
fn strip_zone_comment(s: &str) -> Option<&str> {
    if !s.ends_with(')') {
        return None;
    }
    let open = s.rfind('(')?;
    Some(s[..open].trim_end())
}

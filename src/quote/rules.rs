//! Attribution rules: per-client patterns marking the start of quoted history.
//!
//! Each rule looks at one trimmed line (plus the surrounding lines, for rules
//! that need lookahead) and reports whether it opens a quoted block. Rules
//! are evaluated in order and the first one that recognises the line decides.

use regex::Regex;

/// The line being classified and its neighbours.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// Every line of the body, untrimmed.
    pub lines: &'a [&'a str],
    /// Index of the current line in `lines`.
    pub index: usize,
}

/// What a rule concluded about a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule does not recognise the line; try the next rule.
    NoMatch,
    /// The line opens a quoted block.
    QuoteStart,
    /// The rule recognised the line but decided it is ordinary content.
    /// No further rules are tried.
    Content,
}

/// A single attribution convention.
pub trait AttributionRule: Send + Sync {
    /// Short identifier used in logs and tests.
    fn name(&self) -> &'static str;

    /// Classify the trimmed `line` at `ctx.index`.
    fn classify(&self, line: &str, ctx: &LineContext<'_>) -> RuleOutcome;
}

/// A rule that matches the trimmed line against a single regex.
#[derive(Debug)]
pub struct PatternRule {
    name: &'static str,
    pattern: Regex,
}

impl PatternRule {
    /// Build a rule from a pattern known to be valid.
    ///
    /// # Panics
    /// Panics if `pattern` is not a valid regex.
    pub fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("attribution pattern must be valid"),
        }
    }
}

impl AttributionRule for PatternRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn classify(&self, line: &str, _ctx: &LineContext<'_>) -> RuleOutcome {
        if self.pattern.is_match(line) {
            RuleOutcome::QuoteStart
        } else {
            RuleOutcome::NoMatch
        }
    }
}

/// Whether `line` opens with a `From:` header name, in any case.
pub fn is_from_line(line: &str) -> bool {
    line.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("from:"))
}

/// Header names that make up an Outlook-style reply header block.
const OUTLOOK_HEADERS: [&str; 5] = ["from:", "sent:", "to:", "subject:", "date:"];

/// Number of lines (including the `From:` line) inspected for header names.
const OUTLOOK_WINDOW: usize = 6;

/// Distinct header names required within the window.
const OUTLOOK_MIN_HEADERS: usize = 3;

/// Outlook quotes prior mail as a header block:
///
/// ```text
/// From: Felipe <felipe@example.com>
/// Sent: Tuesday, December 9, 2025 10:30 AM
/// To: Bent <bent@example.com>
/// Subject: Conversion factors
/// ```
///
/// A lone `From:` line is common in ordinary prose, so the line only counts
/// when enough distinct header names follow it.
#[derive(Debug)]
pub struct OutlookHeaderRule {
    opener: Regex,
}

impl OutlookHeaderRule {
    pub fn new() -> Self {
        Self {
            opener: Regex::new(r"(?i)^From:\s+.+$").expect("outlook pattern must be valid"),
        }
    }

    /// Whether enough distinct header names appear in the window starting
    /// at the current line.
    pub fn is_header_block(ctx: &LineContext<'_>) -> bool {
        Self::distinct_headers_in_window(ctx) >= OUTLOOK_MIN_HEADERS
    }

    fn distinct_headers_in_window(ctx: &LineContext<'_>) -> usize {
        let mut seen = [false; OUTLOOK_HEADERS.len()];
        for line in ctx.lines.iter().skip(ctx.index).take(OUTLOOK_WINDOW) {
            let lower = line.trim().to_lowercase();
            if let Some(pos) = OUTLOOK_HEADERS.iter().position(|h| lower.starts_with(h)) {
                seen[pos] = true;
            }
        }
        seen.iter().filter(|&&s| s).count()
    }
}

impl Default for OutlookHeaderRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributionRule for OutlookHeaderRule {
    fn name(&self) -> &'static str {
        "outlook-header-block"
    }

    fn classify(&self, line: &str, ctx: &LineContext<'_>) -> RuleOutcome {
        if !self.opener.is_match(line) {
            return RuleOutcome::NoMatch;
        }
        if Self::is_header_block(ctx) {
            RuleOutcome::QuoteStart
        } else {
            RuleOutcome::Content
        }
    }
}

/// The built-in rules, in evaluation order.
pub fn default_rules() -> Vec<Box<dyn AttributionRule>> {
    vec![
        // "On Mon, Jan 1, 2025 at 10:00 AM Name <email@example.com> wrote:"
        Box::new(PatternRule::new("gmail", r"(?i)^On .+wrote:\s*$")),
        // "On 8 Dec 2025, at 14:30, other@example.com wrote:"
        Box::new(PatternRule::new("apple-mail", r"(?i)^On .+, at .+wrote:\s*$")),
        // "man. 1. des. 2025 kl. 14:30 skrev Name <email>:"
        Box::new(PatternRule::new(
            "norwegian-weekday",
            r"(?i)^[a-zæøå]{2,4}\.\s+\d+\..+kl\..+skrev",
        )),
        // "8. des. 2025 kl. 14:30 skrev Name <email>:"
        Box::new(PatternRule::new("norwegian", r"(?i)^\d+\..+kl\..+skrev")),
        Box::new(PatternRule::new("generic-wrote", r"(?i)^.+wrote:\s*$")),
        Box::new(PatternRule::new("outlook-separator", r"^_{10,}\s*$")),
        Box::new(OutlookHeaderRule::new()),
        Box::new(PatternRule::new(
            "original-message",
            r"(?i)^-+\s*Original Message\s*-+\s*$",
        )),
        Box::new(PatternRule::new(
            "forwarded-message",
            r"(?i)^-+\s*Forwarded message\s*-+\s*$",
        )),
    ]
}

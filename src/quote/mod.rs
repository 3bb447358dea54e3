//! Separating newly written text from quoted reply history.
//!
//! This is a best-effort heuristic. Inline `>` quotes are always dropped,
//! even when they are interleaved with genuine inline replies.

pub mod rules;

use std::sync::LazyLock;

use tracing::trace;

use self::rules::{
    default_rules, is_from_line, AttributionRule, LineContext, OutlookHeaderRule, RuleOutcome,
};

/// Returned instead of an empty string when a body is entirely quoted.
pub const NO_NEW_CONTENT: &str = "[No new content - forwarded/quoted message only]";

static DEFAULT_STRIPPER: LazyLock<QuoteStripper> = LazyLock::new(QuoteStripper::default);

/// Strip quoted history from a message body using the built-in rules.
pub fn strip_quoted_content(body: &str) -> String {
    DEFAULT_STRIPPER.strip(body)
}

/// Applies an ordered list of [`AttributionRule`]s to message bodies.
pub struct QuoteStripper {
    rules: Vec<Box<dyn AttributionRule>>,
}

impl Default for QuoteStripper {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl QuoteStripper {
    /// Build a stripper from rules in evaluation order.
    pub fn new(rules: Vec<Box<dyn AttributionRule>>) -> Self {
        Self { rules }
    }

    /// Keep only the new content of `body`.
    ///
    /// Everything from the first attribution line onward is dropped, as is any
    /// line starting with `>`. Trailing blank lines and surrounding whitespace
    /// are trimmed. Returns [`NO_NEW_CONTENT`] if nothing is left.
    pub fn strip(&self, body: &str) -> String {
        let lines: Vec<&str> = body.lines().collect();
        let mut kept: Vec<&str> = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            let ctx = LineContext {
                lines: &lines,
                index,
            };
            if self.starts_quoted_block(trimmed, &ctx) {
                break;
            }
            if trimmed.starts_with('>') {
                continue;
            }
            kept.push(line);
        }

        while kept.last().is_some_and(|l| l.trim().is_empty()) {
            kept.pop();
        }

        let output = kept.join("\n");
        let output = output.trim();
        if output.is_empty() {
            NO_NEW_CONTENT.to_string()
        } else {
            output.to_string()
        }
    }

    /// First rule that recognises the line decides. A match on a `From:` line
    /// only counts when an Outlook header block follows, whichever rule matched.
    fn starts_quoted_block(&self, line: &str, ctx: &LineContext<'_>) -> bool {
        for rule in &self.rules {
            match rule.classify(line, ctx) {
                RuleOutcome::NoMatch => continue,
                RuleOutcome::QuoteStart => {
                    if is_from_line(line) && !OutlookHeaderRule::is_header_block(ctx) {
                        trace!(rule = rule.name(), line = ctx.index, "From: line kept as content");
                        return false;
                    }
                    trace!(rule = rule.name(), line = ctx.index, "Quoted block starts");
                    return true;
                }
                RuleOutcome::Content => return false,
            }
        }
        false
    }
}

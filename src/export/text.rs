//! Plain-text transcript rendering.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, FixedOffset};

use crate::model::thread::{DateRange, Message, Thread, ThreadSummary};
use crate::quote::strip_quoted_content;

use super::search::format_search_lines;
use super::{FormatOptions, Formatter};

/// Fixed-layout text output, meant for terminals and LLM consumption.
///
/// ```text
/// Subject: Re: Conversion factors
/// Participants: felipe@example.com, bent@example.com
/// Date Range: Dec 9-11, 2025
///
/// --- Message 1 (Dec 9, 10:30 AM) ---
/// From: Felipe <felipe@example.com>
/// <body>
///
/// Attachments:
/// - conversion_factors.xlsx (saved to: /path/to/conversion_factors.xlsx)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for TextFormatter {
    fn format_search_results(&self, results: &[ThreadSummary]) -> String {
        format_search_lines(results)
    }

    fn format_thread(
        &self,
        thread: &Thread,
        saved_attachments: &HashMap<String, PathBuf>,
        opts: FormatOptions,
    ) -> String {
        let mut out = String::new();

        out.push_str(&format!("Subject: {}\n", thread.subject));
        out.push_str(&format!("Participants: {}\n", thread.participants.join(", ")));
        out.push_str(&format!("Date Range: {}\n", format_date_range(&thread.date_range)));
        out.push('\n');

        for (number, msg) in display_order(&thread.messages, opts.reverse) {
            write_message(&mut out, number, msg, opts.messages_only);
        }

        if thread.has_attachments() {
            out.push_str("Attachments:\n");
            for att in thread.attachments() {
                match saved_attachments.get(&att.id) {
                    Some(path) => out.push_str(&format!(
                        "- {} (saved to: {})\n",
                        att.filename,
                        path.display()
                    )),
                    None => out.push_str(&format!("- {} (not downloaded)\n", att.filename)),
                }
            }
        }

        out
    }
}

/// Pair each message with its 1-based chronological number, in display order.
///
/// Reversing changes display order only; numbers stay chronological.
pub(crate) fn display_order(messages: &[Message], reverse: bool) -> Vec<(usize, &Message)> {
    let mut numbered: Vec<(usize, &Message)> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| (i + 1, m))
        .collect();
    if reverse {
        numbered.reverse();
    }
    numbered
}

/// The body to render, quote-stripped when only new content is wanted.
pub(crate) fn rendered_body(msg: &Message, messages_only: bool) -> String {
    if messages_only {
        strip_quoted_content(&msg.body)
    } else {
        msg.body.trim().to_string()
    }
}

fn write_message(out: &mut String, number: usize, msg: &Message, messages_only: bool) {
    let date = msg
        .date
        .map(|d| d.format("%b %-d, %-I:%M %p").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    out.push_str(&format!("--- Message {number} ({date}) ---\n"));
    out.push_str(&format!("From: {}\n", msg.from));

    let body = rendered_body(msg, messages_only);
    if !body.is_empty() {
        out.push_str(&body);
        out.push('\n');
    }
    out.push('\n');
}

fn month_day(d: &DateTime<FixedOffset>) -> String {
    d.format("%b %-d").to_string()
}

fn full_date(d: &DateTime<FixedOffset>) -> String {
    d.format("%b %-d, %Y").to_string()
}

/// Render a date range compactly.
///
/// | start / end            | output                       |
/// |------------------------|------------------------------|
/// | both unknown           | `Unknown`                    |
/// | one known, or same day | `Dec 9, 2025`                |
/// | same month             | `Dec 9-11, 2025`             |
/// | same year              | `Nov 28 - Dec 2, 2025`       |
/// | different years        | `Dec 9, 2024 - Jan 2, 2025`  |
pub fn format_date_range(range: &DateRange) -> String {
    let (start, end) = match (range.start, range.end) {
        (None, None) => return "Unknown".to_string(),
        (None, Some(end)) => return full_date(&end),
        (Some(start), None) => return full_date(&start),
        (Some(start), Some(end)) => (start, end),
    };

    if start.date_naive() == end.date_naive() {
        full_date(&start)
    } else if start.year() == end.year() && start.month() == end.month() {
        format!("{}-{}, {}", month_day(&start), end.day(), end.year())
    } else if start.year() == end.year() {
        format!("{} - {}, {}", month_day(&start), month_day(&end), end.year())
    } else {
        format!("{} - {}", full_date(&start), full_date(&end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attachment::Attachment;

    fn at(s: &str) -> Option<DateTime<FixedOffset>> {
        Some(DateTime::parse_from_rfc3339(s).expect("valid date"))
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange {
            start: at(start),
            end: at(end),
        }
    }

    fn msg(id: &str, from: &str, date: &str, body: &str) -> Message {
        Message {
            id: id.to_string(),
            from: from.to_string(),
            date: at(date),
            body: body.to_string(),
            attachments: Vec::new(),
        }
    }

    fn three_message_thread() -> Thread {
        Thread {
            id: "thread1".into(),
            subject: "Test Subject".into(),
            participants: vec!["alice@example.com".into(), "bob@example.com".into()],
            date_range: range("2025-12-01T10:00:00Z", "2025-12-03T10:00:00Z"),
            messages: vec![
                msg("msg1", "alice@example.com", "2025-12-01T10:00:00Z", "First message"),
                msg("msg2", "bob@example.com", "2025-12-02T10:00:00Z", "Second message"),
                msg("msg3", "alice@example.com", "2025-12-03T10:00:00Z", "Third message"),
            ],
        }
    }

    #[test]
    fn test_date_range_same_day() {
        assert_eq!(
            format_date_range(&range("2025-12-01T08:00:00Z", "2025-12-01T18:00:00Z")),
            "Dec 1, 2025"
        );
    }

    #[test]
    fn test_date_range_same_month() {
        assert_eq!(
            format_date_range(&range("2025-12-09T08:00:00Z", "2025-12-11T18:00:00Z")),
            "Dec 9-11, 2025"
        );
    }

    #[test]
    fn test_date_range_same_year() {
        assert_eq!(
            format_date_range(&range("2025-11-28T08:00:00Z", "2025-12-02T18:00:00Z")),
            "Nov 28 - Dec 2, 2025"
        );
    }

    #[test]
    fn test_date_range_different_years() {
        assert_eq!(
            format_date_range(&range("2024-12-09T08:00:00Z", "2025-01-02T18:00:00Z")),
            "Dec 9, 2024 - Jan 2, 2025"
        );
    }

    #[test]
    fn test_date_range_partially_known() {
        let only_end = DateRange {
            start: None,
            end: at("2025-12-11T10:00:00Z"),
        };
        assert_eq!(format_date_range(&only_end), "Dec 11, 2025");
        let only_start = DateRange {
            start: at("2025-12-09T10:00:00Z"),
            end: None,
        };
        assert_eq!(format_date_range(&only_start), "Dec 9, 2025");
        assert_eq!(format_date_range(&DateRange::default()), "Unknown");
    }

    #[test]
    fn test_header_block() {
        let out = TextFormatter::new().format_thread(
            &three_message_thread(),
            &HashMap::new(),
            FormatOptions::default(),
        );
        assert!(out.starts_with(
            "Subject: Test Subject\n\
             Participants: alice@example.com, bob@example.com\n\
             Date Range: Dec 1-3, 2025\n\n\
             --- Message 1 (Dec 1, 10:00 AM) ---\n\
             From: alice@example.com\n\
             First message\n\n"
        ));
        assert!(!out.contains("Attachments:"));
    }

    #[test]
    fn test_chronological_order() {
        let out = TextFormatter::new().format_thread(
            &three_message_thread(),
            &HashMap::new(),
            FormatOptions::default(),
        );
        let first = out.find("First message").expect("first");
        let second = out.find("Second message").expect("second");
        let third = out.find("Third message").expect("third");
        assert!(first < second && second < third);
    }

    #[test]
    fn test_reverse_keeps_chronological_labels() {
        let out = TextFormatter::new().format_thread(
            &three_message_thread(),
            &HashMap::new(),
            FormatOptions {
                reverse: true,
                messages_only: false,
            },
        );
        let third = out.find("Third message").expect("third");
        let second = out.find("Second message").expect("second");
        let first = out.find("First message").expect("first");
        assert!(third < second && second < first);

        let label3 = out.find("--- Message 3 (Dec 3,").expect("label 3");
        let label1 = out.find("--- Message 1 (Dec 1,").expect("label 1");
        assert!(label3 < third && third < label1);
        assert!(out.contains("--- Message 3 (Dec 3, 10:00 AM) ---\nFrom: alice@example.com\nThird message\n"));
        assert!(out.contains("--- Message 1 (Dec 1, 10:00 AM) ---\nFrom: alice@example.com\nFirst message\n"));
    }

    #[test]
    fn test_messages_only_strips_quotes() {
        let mut thread = three_message_thread();
        thread.messages[1].body = "Thanks!

On Mon, Jan 1, 2025 at 10:00 AM Someone <someone@example.com> wrote:
> Original message here"
            .to_string();

        let raw = TextFormatter::new().format_thread(&thread, &HashMap::new(), FormatOptions::default());
        assert!(raw.contains("Original message here"));

        let stripped = TextFormatter::new().format_thread(
            &thread,
            &HashMap::new(),
            FormatOptions {
                reverse: false,
                messages_only: true,
            },
        );
        assert!(!stripped.contains("Original message here"));
        assert!(stripped.contains("Thanks!"));
    }

    #[test]
    fn test_combined_options() {
        let mut thread = three_message_thread();
        thread.messages.truncate(2);
        thread.messages[0].body = "Original question".into();
        thread.messages[1].body = "Here is the answer!

On Dec 1, 2025, alice@example.com wrote:
> Original question"
            .into();

        let out = TextFormatter::new().format_thread(
            &thread,
            &HashMap::new(),
            FormatOptions {
                reverse: true,
                messages_only: true,
            },
        );
        let answer = out.find("Here is the answer!").expect("answer");
        let question = out.find("Original question").expect("question");
        assert!(answer < question);
        assert_eq!(out.matches("Original question").count(), 1);
    }

    #[test]
    fn test_attachment_section() {
        let mut thread = three_message_thread();
        thread.messages[0].attachments.push(Attachment {
            id: "A1".into(),
            message_id: "msg1".into(),
            filename: "conversion_factors.xlsx".into(),
            mime_type: "application/vnd.ms-excel".into(),
            size: 2048,
        });
        thread.messages[2].attachments.push(Attachment {
            id: "A2".into(),
            message_id: "msg3".into(),
            filename: "notes.pdf".into(),
            mime_type: "application/pdf".into(),
            size: 1024,
        });
        let saved = HashMap::from([("A1".to_string(), PathBuf::from("/out/conversion_factors.xlsx"))]);

        let out = TextFormatter::new().format_thread(&thread, &saved, FormatOptions::default());
        assert!(out.ends_with(
            "Attachments:\n\
             - conversion_factors.xlsx (saved to: /out/conversion_factors.xlsx)\n\
             - notes.pdf (not downloaded)\n"
        ));
    }

    #[test]
    fn test_unknown_message_date() {
        let mut thread = three_message_thread();
        thread.messages[0].date = None;
        let out = TextFormatter::new().format_thread(&thread, &HashMap::new(), FormatOptions::default());
        assert!(out.contains("--- Message 1 (unknown date) ---"));
    }
}

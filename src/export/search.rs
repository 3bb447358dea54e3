//! One-line-per-thread search result listing.

use crate::model::thread::ThreadSummary;

/// Participant lists longer than this are truncated.
const PARTICIPANTS_MAX: usize = 30;
/// Characters kept before the `...` marker when truncating.
const PARTICIPANTS_KEEP: usize = 27;

/// Render search results, one line each:
///
/// ```text
/// [1] 18c1234abcd5678 | Dec 11 | Felipe Garcia, bent | Re: Conversion factors (3 messages, 2 attachments)
/// ```
///
/// An empty slice yields exactly `No results found.`.
pub fn format_search_lines(results: &[ThreadSummary]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let date = r
                .last_message_date
                .map(|d| d.format("%b %-d").to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            format!(
                "[{}] {} | {} | {} | {} ({})\n",
                i + 1,
                r.id,
                date,
                truncate_participants(&r.participants.join(", ")),
                r.subject,
                counts(r.message_count, r.attachment_count)
            )
        })
        .collect()
}

fn truncate_participants(joined: &str) -> String {
    if joined.chars().count() > PARTICIPANTS_MAX {
        let kept: String = joined.chars().take(PARTICIPANTS_KEEP).collect();
        format!("{kept}...")
    } else {
        joined.to_string()
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn counts(messages: usize, attachments: usize) -> String {
    let mut text = plural(messages, "message");
    if attachments > 0 {
        text.push_str(", ");
        text.push_str(&plural(attachments, "attachment"));
    }
    text
}

//! JSON rendering of search results and transcripts.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::model::thread::{Thread, ThreadSummary};

use super::text::{display_order, format_date_range, rendered_body};
use super::{FormatOptions, Formatter};

/// Pretty-printed JSON output for scripting.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for JsonFormatter {
    fn format_search_results(&self, results: &[ThreadSummary]) -> String {
        let output = serde_json::json!({
            "result_count": results.len(),
            "results": results,
        });
        to_pretty(&output)
    }

    fn format_thread(
        &self,
        thread: &Thread,
        saved_attachments: &HashMap<String, PathBuf>,
        opts: FormatOptions,
    ) -> String {
        let messages: Vec<serde_json::Value> = display_order(&thread.messages, opts.reverse)
            .into_iter()
            .map(|(number, msg)| {
                serde_json::json!({
                    "number": number,
                    "id": msg.id,
                    "from": msg.from,
                    "date": msg.date.map(|d| d.to_rfc3339()),
                    "body": rendered_body(msg, opts.messages_only),
                })
            })
            .collect();

        let attachments: Vec<serde_json::Value> = thread
            .attachments()
            .map(|att| {
                serde_json::json!({
                    "id": att.id,
                    "message_id": att.message_id,
                    "filename": att.filename,
                    "mime_type": att.mime_type,
                    "size": att.size,
                    "saved_to": saved_attachments.get(&att.id).map(|p| p.display().to_string()),
                })
            })
            .collect();

        let output = serde_json::json!({
            "id": thread.id,
            "subject": thread.subject,
            "participants": thread.participants,
            "date_range": {
                "start": thread.date_range.start.map(|d| d.to_rfc3339()),
                "end": thread.date_range.end.map(|d| d.to_rfc3339()),
                "display": format_date_range(&thread.date_range),
            },
            "messages": messages,
            "attachments": attachments,
        });
        to_pretty(&output)
    }
}

fn to_pretty(value: &serde_json::Value) -> String {
    // Serializing a `Value` cannot fail.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

//! Build lightweight [`ThreadSummary`] values for search results.

use crate::error::{MailError, Result};
use crate::model::address::extract_display_name;
use crate::model::payload::RawThread;
use crate::model::thread::ThreadSummary;
use crate::parser::date::parse_date;
use crate::parser::mime::count_attachments;

use super::builder::root_part;
use super::ParticipantSet;

/// Build a [`ThreadSummary`] from a metadata-only fetch.
///
/// Participants are the senders' display names only; attachments are
/// counted without being extracted.
pub fn build_thread_summary(raw: &RawThread) -> Result<ThreadSummary> {
    if raw.id.is_empty() {
        return Err(MailError::InvalidInput("thread has no id".into()));
    }

    let mut subject = String::new();
    let mut senders = ParticipantSet::default();
    let mut last_message_date = None;
    let mut attachment_count = 0;

    for raw_msg in &raw.messages {
        let payload = root_part(&raw.id, raw_msg)?;
        attachment_count += count_attachments(payload);

        for header in &payload.headers {
            match header.name.as_str() {
                "Subject" => {
                    if subject.is_empty() {
                        subject = header.value.clone();
                    }
                }
                "From" => senders.insert(extract_display_name(&header.value)),
                "Date" => {
                    if let Some(date) = parse_date(&header.value) {
                        if last_message_date.is_none_or(|latest| date > latest) {
                            last_message_date = Some(date);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(ThreadSummary {
        id: raw.id.clone(),
        subject,
        participants: senders.into_vec(),
        last_message_date,
        message_count: raw.messages.len(),
        attachment_count,
    })
}

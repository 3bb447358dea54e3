//! Assemble a full [`Thread`] from a raw provider thread.

use tracing::debug;

use crate::error::{MailError, Result};
use crate::model::address::{extract_email, parse_address_list};
use crate::model::payload::{MessagePart, RawMessage, RawThread};
use crate::model::thread::{DateRange, Message, Thread};
use crate::parser::date::parse_date;
use crate::parser::mime::{extract_attachments, extract_body};

use super::ParticipantSet;

/// Build a [`Thread`] from a full-content fetch.
///
/// Messages keep the provider's order. Fails only on structurally broken
/// input: a thread without an id or a message without a part tree.
pub fn build_thread(raw: &RawThread) -> Result<Thread> {
    if raw.id.is_empty() {
        return Err(MailError::InvalidInput("thread has no id".into()));
    }

    let mut subject = String::new();
    let mut participants = ParticipantSet::default();
    let mut messages = Vec::with_capacity(raw.messages.len());

    for raw_msg in &raw.messages {
        let payload = root_part(&raw.id, raw_msg)?;
        let mut from = None;
        let mut date = None;

        for header in &payload.headers {
            match header.name.as_str() {
                "Subject" => {
                    if subject.is_empty() {
                        subject = header.value.clone();
                    }
                }
                "From" => {
                    participants.insert(extract_email(&header.value));
                    from = Some(header.value.clone());
                }
                "To" | "Cc" => {
                    for addr in parse_address_list(&header.value) {
                        participants.insert(addr);
                    }
                }
                "Date" => {
                    if let Some(parsed) = parse_date(&header.value) {
                        date = Some(parsed);
                    }
                }
                _ => {}
            }
        }

        messages.push(Message {
            id: raw_msg.id.clone(),
            from: from.unwrap_or_default(),
            date,
            body: extract_body(payload),
            attachments: extract_attachments(&raw_msg.id, payload),
        });
    }

    let date_range = DateRange::from_dates(messages.iter().map(|m| m.date));

    debug!(
        thread_id = %raw.id,
        messages = messages.len(),
        "Built thread"
    );

    Ok(Thread {
        id: raw.id.clone(),
        subject,
        participants: participants.into_vec(),
        date_range,
        messages,
    })
}

/// The message's part tree, or an error if the fetch layer dropped it.
pub(crate) fn root_part<'a>(thread_id: &str, msg: &'a RawMessage) -> Result<&'a MessagePart> {
    msg.payload.as_ref().ok_or_else(|| {
        MailError::InvalidInput(format!(
            "message '{}' in thread '{thread_id}' has no part tree",
            msg.id
        ))
    })
}

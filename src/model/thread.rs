//! Thread, message, and search-summary types.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::attachment::Attachment;

/// A single message within a [`Thread`].
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Provider message id.
    pub id: String,

    /// Raw `From` header value (`"Name <addr>"` or a bare address).
    pub from: String,

    /// Parsed `Date` header. `None` when the header was missing or unparsable.
    pub date: Option<DateTime<FixedOffset>>,

    /// Plain-text body (from `text/plain`, or tag-stripped `text/html`).
    pub body: String,

    /// Attachments in part-tree document order.
    pub attachments: Vec<Attachment>,
}

/// Time span of a thread. Each end is `None` when unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
}

impl DateRange {
    /// Build the `[min, max]` range over every known date.
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = Option<DateTime<FixedOffset>>>,
    {
        let mut range = Self::default();
        for date in dates.into_iter().flatten() {
            if range.start.is_none_or(|s| date < s) {
                range.start = Some(date);
            }
            if range.end.is_none_or(|e| date > e) {
                range.end = Some(date);
            }
        }
        range
    }
}

/// The full content of a thread.
#[derive(Debug, Clone, Serialize)]
pub struct Thread {
    pub id: String,

    /// First non-empty `Subject` header, in message order.
    pub subject: String,

    /// Every `From`/`To`/`Cc` address on the thread, first-seen order, deduplicated.
    pub participants: Vec<String>,

    pub date_range: DateRange,

    /// Messages in provider-returned (chronological) order.
    pub messages: Vec<Message>,
}

impl Thread {
    /// Every attachment across the thread, message order then extraction order.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.messages.iter().flat_map(|m| m.attachments.iter())
    }

    /// Whether any message carries an attachment.
    pub fn has_attachments(&self) -> bool {
        self.attachments().next().is_some()
    }
}

/// Lightweight per-thread summary used for search results.
///
/// Participants here are the *senders* only (display names), unlike
/// [`Thread::participants`] which lists every address on the thread.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummary {
    pub id: String,
    pub subject: String,
    pub participants: Vec<String>,
    pub last_message_date: Option<DateTime<FixedOffset>>,
    pub message_count: usize,
    pub attachment_count: usize,
}

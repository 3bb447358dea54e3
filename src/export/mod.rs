//! Output rendering (text and JSON) and attachment saving.

pub mod attachment;
pub mod json;
pub mod search;
pub mod text;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::model::thread::{Thread, ThreadSummary};

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Controls how a thread transcript is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Show newest message first. Message numbers stay chronological.
    pub reverse: bool,
    /// Strip quoted history, showing only newly written text.
    pub messages_only: bool,
}

/// Renders search results and thread transcripts.
pub trait Formatter {
    fn format_search_results(&self, results: &[ThreadSummary]) -> String;

    /// `saved_attachments` maps attachment id to the path it was saved at.
    fn format_thread(
        &self,
        thread: &Thread,
        saved_attachments: &HashMap<String, PathBuf>,
        opts: FormatOptions,
    ) -> String;
}

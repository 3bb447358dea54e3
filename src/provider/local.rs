//! Directory-backed provider over saved API responses.
//!
//! Layout:
//!
//! ```text
//! <root>/threads/<thread-id>.json                          thread resource
//! <root>/attachments/<message-id>/<attachment-id>.json     {"size": n, "data": "<base64url>"}
//! ```

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{MailError, Result};
use crate::model::payload::{MessagePart, PartBody, RawThread};
use crate::parser::mime::decode_base64url_bytes;

use super::{FetchMode, MailProvider};

/// Headers searched by [`LocalStore::search_threads`].
const SEARCHABLE_HEADERS: [&str; 4] = ["Subject", "From", "To", "Cc"];

/// A [`MailProvider`] reading JSON files from a local directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `root`. The `threads/` subdirectory must exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.join("threads").is_dir() {
            return Err(MailError::InvalidPath(format!(
                "'{}' has no threads/ directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// All thread ids in the store, sorted.
    pub fn thread_ids(&self) -> Result<Vec<String>> {
        let dir = self.root.join("threads");
        let entries = std::fs::read_dir(&dir).map_err(|e| MailError::io(&dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| MailError::io(&dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn load_thread(&self, thread_id: &str) -> Result<RawThread> {
        let path = self
            .root
            .join("threads")
            .join(format!("{}.json", path_component(thread_id)?));
        if !path.exists() {
            return Err(MailError::ThreadNotFound(thread_id.to_string()));
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| MailError::io(&path, e))?;
        let mut thread: RawThread =
            serde_json::from_str(&contents).map_err(|source| MailError::Payload {
                path: path.clone(),
                source,
            })?;
        if thread.id.is_empty() {
            thread.id = thread_id.to_string();
        }
        Ok(thread)
    }
}

impl MailProvider for LocalStore {
    /// Every whitespace-separated term must appear (case-insensitively) in
    /// the thread's Subject/From/To/Cc headers or message snippets.
    fn search_threads(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let mut matches = Vec::new();

        for id in self.thread_ids()? {
            if matches.len() >= max_results {
                break;
            }
            let thread = match self.load_thread(&id) {
                Ok(thread) => thread,
                Err(e) => {
                    warn!(thread_id = %id, error = %e, "Skipping unreadable thread");
                    continue;
                }
            };
            let haystack = searchable_text(&thread);
            if terms.iter().all(|t| haystack.contains(t.as_str())) {
                matches.push(id);
            }
        }

        Ok(matches)
    }

    fn fetch_thread(&self, thread_id: &str, mode: FetchMode) -> Result<RawThread> {
        let mut thread = self.load_thread(thread_id)?;
        if mode == FetchMode::Metadata {
            for msg in &mut thread.messages {
                if let Some(payload) = msg.payload.as_mut() {
                    clear_inline_data(payload);
                }
            }
        }
        debug!(thread_id, ?mode, messages = thread.messages.len(), "Fetched thread");
        Ok(thread)
    }

    fn download_attachment(&self, message_id: &str, attachment_id: &str) -> Result<Vec<u8>> {
        let path = self
            .root
            .join("attachments")
            .join(path_component(message_id)?)
            .join(format!("{}.json", path_component(attachment_id)?));
        if !path.exists() {
            return Err(MailError::AttachmentNotFound {
                message_id: message_id.to_string(),
                attachment_id: attachment_id.to_string(),
            });
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| MailError::io(&path, e))?;
        let body: PartBody = serde_json::from_str(&contents).map_err(|source| MailError::Payload {
            path: path.clone(),
            source,
        })?;
        let data = body
            .data
            .ok_or_else(|| MailError::Decode(format!("'{}' has no data", path.display())))?;
        decode_base64url_bytes(&data)
            .map_err(|e| MailError::Decode(format!("'{}': {e}", path.display())))
    }
}

/// Reject ids that would escape the store directory.
fn path_component(id: &str) -> Result<&str> {
    if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']) {
        return Err(MailError::InvalidInput(format!("invalid id '{id}'")));
    }
    Ok(id)
}

fn searchable_text(thread: &RawThread) -> String {
    let mut text = String::new();
    for msg in &thread.messages {
        text.push_str(&msg.snippet);
        text.push('\n');
        if let Some(payload) = &msg.payload {
            for name in SEARCHABLE_HEADERS {
                if let Some(value) = payload.header(name) {
                    text.push_str(value);
                    text.push('\n');
                }
            }
        }
    }
    text.to_lowercase()
}

/// Drop inline body data from every part, keeping structure and attachment ids.
fn clear_inline_data(root: &mut MessagePart) {
    let mut stack = vec![root];
    while let Some(part) = stack.pop() {
        if let Some(body) = part.body.as_mut() {
            body.data = None;
        }
        stack.extend(part.parts.iter_mut());
    }
}

//! Access to the hosted mail provider.
//!
//! The thread assembler and formatters only ever see already-fetched
//! [`RawThread`] values; everything that talks to the outside world sits
//! behind [`MailProvider`].

pub mod local;

use tracing::debug;

use crate::error::Result;
use crate::model::payload::RawThread;
use crate::model::thread::{Thread, ThreadSummary};
use crate::thread::{build_thread, build_thread_summary};

pub use local::LocalStore;

/// How much of each message a thread fetch returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Headers, full part tree and inline body data.
    Full,
    /// Headers and part tree structure only; no inline body data.
    Metadata,
}

/// A source of threads and attachment content.
pub trait MailProvider {
    /// Ids of threads matching `query`, at most `max_results` of them.
    fn search_threads(&self, query: &str, max_results: usize) -> Result<Vec<String>>;

    /// Fetch one thread.
    fn fetch_thread(&self, thread_id: &str, mode: FetchMode) -> Result<RawThread>;

    /// Raw bytes of one attachment.
    fn download_attachment(&self, message_id: &str, attachment_id: &str) -> Result<Vec<u8>>;
}

/// Search and build a summary for every matching thread, in result order.
pub fn search_summaries(
    provider: &dyn MailProvider,
    query: &str,
    max_results: usize,
) -> Result<Vec<ThreadSummary>> {
    let ids = provider.search_threads(query, max_results)?;
    debug!(query, results = ids.len(), "Search finished");

    ids.iter()
        .map(|id| {
            let raw = provider.fetch_thread(id, FetchMode::Metadata)?;
            build_thread_summary(&raw)
        })
        .collect()
}

/// Fetch a thread with full content and assemble it.
pub fn get_thread(provider: &dyn MailProvider, thread_id: &str) -> Result<Thread> {
    let raw = provider.fetch_thread(thread_id, FetchMode::Full)?;
    build_thread(&raw)
}

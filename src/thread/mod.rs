//! Thread assembly: turning raw provider threads into [`Thread`](crate::model::thread::Thread)
//! and [`ThreadSummary`](crate::model::thread::ThreadSummary) values.

pub mod builder;
pub mod summary;

pub use builder::build_thread;
pub use summary::build_thread_summary;

use std::collections::HashSet;

/// Deduplicating set that remembers first-seen order.
#[derive(Debug, Default)]
struct ParticipantSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl ParticipantSet {
    fn insert(&mut self, participant: String) {
        if participant.is_empty() {
            return;
        }
        if self.seen.insert(participant.clone()) {
            self.ordered.push(participant);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

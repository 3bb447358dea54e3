//! Core data model types: raw provider payloads, threads, messages, and attachments.

pub mod address;
pub mod attachment;
pub mod payload;
pub mod thread;

//! `mailthread`: read-only mail threads as clean, chronological transcripts.
//!
//! The library turns provider thread payloads (nested MIME part trees with
//! base64url bodies) into [`model::thread::Thread`] values, strips quoted
//! reply history, and renders transcripts and search listings as text or JSON.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod provider;
pub mod quote;
pub mod thread;

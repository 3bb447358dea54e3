//! Header value and MIME part-tree parsing.

pub mod date;
pub mod mime;

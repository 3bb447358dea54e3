//! Attachment metadata.
//!
//! The binary content is NOT part of the model. It is fetched separately
//! through the provider using the attachment-reference id.

/// Metadata about an attachment found while walking a message's part tree.
///
/// Identity is `(message_id, id)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attachment {
    /// Opaque attachment-reference id used to download the content.
    pub id: String,

    /// Id of the message that owns this attachment.
    pub message_id: String,

    /// Filename as declared in the part.
    pub filename: String,

    /// MIME content type (e.g. `"application/pdf"`).
    pub mime_type: String,

    /// Size in bytes as reported by the provider.
    pub size: u64,
}

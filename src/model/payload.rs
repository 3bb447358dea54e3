//! Raw provider payload, as returned by the thread-fetch API.
//!
//! Field names follow the provider's camelCase JSON. Everything the provider
//! may omit is optional or defaulted so partially populated payloads still
//! deserialize.

use serde::{Deserialize, Serialize};

/// A thread resource: an ordered list of messages sharing a conversation id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawThread {
    pub id: String,
    pub messages: Vec<RawMessage>,
}

/// One message inside a [`RawThread`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMessage {
    pub id: String,
    pub thread_id: String,
    pub snippet: String,
    /// Root of the MIME part tree. `None` means the fetch layer returned a
    /// structurally broken message.
    pub payload: Option<MessagePart>,
}

/// A node in the MIME part tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagePart {
    pub part_id: String,
    pub mime_type: String,
    pub filename: String,
    pub headers: Vec<Header>,
    pub body: Option<PartBody>,
    pub parts: Vec<MessagePart>,
}

/// Body of a [`MessagePart`]: either inline data or an attachment reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartBody {
    pub attachment_id: Option<String>,
    pub size: u64,
    /// Base64url-encoded content.
    pub data: Option<String>,
}

/// A single raw header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl MessagePart {
    /// First value of the header with exactly this name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    /// Inline base64url data, if present and non-empty.
    pub fn inline_data(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.data.as_deref())
            .filter(|d| !d.is_empty())
    }

    /// Attachment-reference id, if present and non-empty.
    pub fn attachment_id(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.attachment_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// A part is an attachment iff it has both a filename and a reference id.
    pub fn is_attachment(&self) -> bool {
        !self.filename.is_empty() && self.attachment_id().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider_json() {
        let json = r#"{
            "id": "t1",
            "messages": [{
                "id": "m1",
                "threadId": "t1",
                "payload": {
                    "mimeType": "multipart/mixed",
                    "filename": "",
                    "headers": [{"name": "Subject", "value": "Hello"}],
                    "body": {"size": 0},
                    "parts": [{
                        "partId": "1",
                        "mimeType": "application/pdf",
                        "filename": "report.pdf",
                        "body": {"attachmentId": "ANGjdJ8", "size": 1024}
                    }]
                }
            }]
        }"#;
        let thread: RawThread = serde_json::from_str(json).expect("parse");
        let payload = thread.messages[0].payload.as_ref().expect("payload");
        assert_eq!(payload.header("Subject"), Some("Hello"));
        assert_eq!(payload.header("subject"), None);
        assert!(!payload.is_attachment());
        assert!(payload.parts[0].is_attachment());
        assert_eq!(payload.parts[0].attachment_id(), Some("ANGjdJ8"));
    }

    #[test]
    fn test_missing_payload_is_none() {
        let msg: RawMessage = serde_json::from_str(r#"{"id": "m1"}"#).expect("parse");
        assert!(msg.payload.is_none());
    }

    #[test]
    fn test_empty_attachment_id_is_not_attachment() {
        let part = MessagePart {
            filename: "a.txt".into(),
            body: Some(PartBody {
                attachment_id: Some(String::new()),
                ..PartBody::default()
            }),
            ..MessagePart::default()
        };
        assert!(!part.is_attachment());
    }
}

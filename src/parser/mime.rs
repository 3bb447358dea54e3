//! MIME part-tree walking: body extraction, attachment listing, HTML-to-text conversion.
//!
//! Part trees come from the provider and may be nested arbitrarily deep, so
//! every walk uses an explicit work stack instead of recursion.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::debug;

use crate::model::attachment::Attachment;
use crate::model::payload::MessagePart;

/// Base64url engine that accepts both padded and unpadded input.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Visit every part in document (pre-)order.
fn walk<'a>(root: &'a MessagePart) -> impl Iterator<Item = &'a MessagePart> {
    let mut stack = vec![root];
    std::iter::from_fn(move || {
        let part = stack.pop()?;
        stack.extend(part.parts.iter().rev());
        Some(part)
    })
}

/// Extract the plain-text body of a message.
///
/// Any `text/plain` part in the tree wins over every `text/html` part; within
/// each kind the first usable part in document order is used. HTML is passed
/// through [`strip_html`]. Parts whose payload fails to decode are skipped.
/// Returns an empty string when the tree has no usable text part.
pub fn extract_body(root: &MessagePart) -> String {
    if let Some(text) = first_decoded(root, "text/plain") {
        return text;
    }
    first_decoded(root, "text/html")
        .map(|html| strip_html(&html))
        .unwrap_or_default()
}

/// Decode the first non-empty part of the given MIME type.
fn first_decoded(root: &MessagePart, mime_type: &str) -> Option<String> {
    walk(root)
        .filter(|part| part.mime_type.eq_ignore_ascii_case(mime_type))
        .filter_map(|part| {
            let data = part.inline_data()?;
            match decode_base64url(data) {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!(
                        part_id = %part.part_id,
                        mime_type,
                        error = %e,
                        "Skipping undecodable body part"
                    );
                    None
                }
            }
        })
        .find(|text| !text.is_empty())
}

/// List every attachment in the tree, in document order, regardless of MIME type.
pub fn extract_attachments(message_id: &str, root: &MessagePart) -> Vec<Attachment> {
    walk(root)
        .filter(|part| part.is_attachment())
        .map(|part| Attachment {
            id: part.attachment_id().unwrap_or_default().to_string(),
            message_id: message_id.to_string(),
            filename: part.filename.clone(),
            mime_type: part.mime_type.clone(),
            size: part.body.as_ref().map_or(0, |b| b.size),
        })
        .collect()
}

/// Count attachment parts without building [`Attachment`] values.
pub fn count_attachments(root: &MessagePart) -> usize {
    walk(root).filter(|part| part.is_attachment()).count()
}

/// Decode a base64url payload into text.
///
/// Invalid UTF-8 falls back to Windows-1252, which accepts every byte.
pub fn decode_base64url(data: &str) -> Result<String, base64::DecodeError> {
    let bytes = decode_base64url_bytes(data)?;
    Ok(decode_text_bytes(&bytes))
}

/// Decode a base64url payload into raw bytes.
pub fn decode_base64url_bytes(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64_URL.decode(compact.as_bytes())
}

fn decode_text_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Minimal HTML-to-text conversion.
///
/// Drops everything between `<` and `>`, then decodes the six common
/// entities. No layout is reconstructed.
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

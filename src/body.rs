//! Body extraction from provider message trees

use crate::error::{Error, Result};
use crate::payload::MessagePart;
use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use tracing::warn;

/// Extract a single textual body from a message.
///
/// A flat message is decoded as-is. For multipart messages the first
/// non-attachment `text/plain` leaf in depth-first pre-order wins; otherwise
/// the first `text/html` leaf seen during the same walk is returned verbatim,
/// even when it is marked as an attachment.
/// Parts that fail to decode are logged and treated as absent, and a message
/// without any usable text yields an empty body.
#[must_use]
pub fn decode_body(message: &MessagePart) -> String {
    if !message.is_multipart() {
        return decode_part(message).unwrap_or_else(|e| {
            warn!("Error decoding email body: {e}");
            String::new()
        });
    }

    let mut html: Option<String> = None;
    let mut stack: Vec<&MessagePart> = message.parts.iter().rev().collect();

    while let Some(part) = stack.pop() {
        if part.is_multipart() {
            stack.extend(part.parts.iter().rev());
            continue;
        }
        match part.content_type().as_str() {
            "text/plain" if !part.is_attachment() => match decode_part(part) {
                Ok(text) => return text,
                Err(e) => warn!(part = ?part.part_id, "Error decoding text part: {e}"),
            },
            "text/html" if html.is_none() => match decode_part(part) {
                Ok(text) => html = Some(text),
                Err(e) => warn!(part = ?part.part_id, "Error decoding html part: {e}"),
            },
            _ => {}
        }
    }

    html.unwrap_or_default()
}

/// Decode one leaf part's base64url data into text using its declared
/// charset, or UTF-8 when none is declared.
pub fn decode_part(part: &MessagePart) -> Result<String> {
    let Some(data) = part.body.data.as_deref().filter(|d| !d.is_empty()) else {
        return Ok(String::new());
    };

    let bytes = decode_base64url(data)?;
    decode_text(&bytes, part.charset().as_deref())
}

fn decode_base64url(data: &str) -> Result<Vec<u8>> {
    let data = data.trim();
    URL_SAFE_NO_PAD
        .decode(data)
        .or_else(|_| URL_SAFE.decode(data))
        .map_err(|e| Error::Decode(format!("invalid base64url data: {e}")))
}

fn decode_text(bytes: &[u8], charset: Option<&str>) -> Result<String> {
    let encoding = match charset {
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| Error::Decode(format!("unknown charset: {label}")))?,
        None => UTF_8,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| Error::Decode(format!("malformed {} content", encoding.name())))
}

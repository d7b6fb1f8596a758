//! Typed provider message payloads
//!
//! A [`MessagePart`] mirrors the message-part resource returned by the mail
//! provider: headers, an optional base64url-encoded body and child parts.
//! Payloads are validated once at ingestion so later stages can rely on the
//! shape instead of probing arbitrary JSON.

use crate::error::{Error, Result};
use crate::headers::{Header, header_value};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use mailparse::{DispositionType, ParsedMail, parse_content_disposition, parse_content_type};
use serde::{Deserialize, Serialize};

const DEFAULT_MIME_TYPE: &str = "text/plain";

/// One node of a provider message tree.
///
/// A node is either a leaf carrying encoded content in [`PartBody::data`] or
/// a container whose content lives in `parts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessagePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,

    /// Empty when the provider omitted it; see [`MessagePart::content_type`]
    pub mime_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    pub headers: Vec<Header>,

    pub body: PartBody,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<MessagePart>,
}

impl Default for MessagePart {
    fn default() -> Self {
        Self {
            part_id: None,
            mime_type: String::new(),
            filename: None,
            headers: Vec::new(),
            body: PartBody::default(),
            parts: Vec::new(),
        }
    }
}

/// Encoded body of a leaf part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartBody {
    /// Set when the provider stores the content separately (attachments)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<String>,

    /// Decoded size in bytes as reported by the provider
    pub size: u64,

    /// URL-safe base64 content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl MessagePart {
    /// Build a leaf part, base64url-encoding `content`
    pub fn leaf(mime_type: impl Into<String>, headers: Vec<Header>, content: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            headers,
            body: PartBody {
                attachment_id: None,
                size: content.len() as u64,
                data: Some(URL_SAFE_NO_PAD.encode(content)),
            },
            ..Self::default()
        }
    }

    /// Build a container part
    pub fn multipart(mime_type: impl Into<String>, headers: Vec<Header>, parts: Vec<Self>) -> Self {
        Self {
            mime_type: mime_type.into(),
            headers,
            parts,
            ..Self::default()
        }
    }

    /// Ingest a JSON payload, validating its structure
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let part: Self =
            serde_json::from_value(value).map_err(|e| Error::Structure(e.to_string()))?;
        part.validate()?;
        Ok(part)
    }

    /// Ingest a JSON payload from text
    pub fn from_json(json: &str) -> Result<Self> {
        let part: Self = serde_json::from_str(json).map_err(|e| Error::Structure(e.to_string()))?;
        part.validate()?;
        Ok(part)
    }

    /// Ingest a raw RFC 822 message.
    ///
    /// Transfer encodings are removed and every leaf is re-encoded as
    /// base64url, so the result decodes exactly like a provider payload.
    pub fn from_rfc822(raw: &[u8]) -> Result<Self> {
        let parsed = mailparse::parse_mail(raw).map_err(|e| Error::Structure(e.to_string()))?;
        Self::from_parsed(&parsed)
    }

    fn from_parsed(mail: &ParsedMail<'_>) -> Result<Self> {
        let headers = mail
            .headers
            .iter()
            .map(|h| Header::new(h.get_key(), h.get_value()))
            .collect();

        if mail.subparts.is_empty() {
            let content = mail
                .get_body_raw()
                .map_err(|e| Error::Decode(e.to_string()))?;
            return Ok(Self::leaf(mail.ctype.mimetype.clone(), headers, &content));
        }

        let parts = mail
            .subparts
            .iter()
            .map(Self::from_parsed)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::multipart(mail.ctype.mimetype.clone(), headers, parts))
    }

    /// Check structural invariants for the whole tree
    pub fn validate(&self) -> Result<()> {
        let mut stack = vec![self];
        while let Some(part) = stack.pop() {
            let has_data = part.body.data.as_deref().is_some_and(|d| !d.is_empty());
            if !part.parts.is_empty() && has_data {
                return Err(Error::Structure(format!(
                    "part {} has both child parts and inline data",
                    part.part_id.as_deref().unwrap_or("<root>")
                )));
            }
            stack.extend(part.parts.iter());
        }
        Ok(())
    }

    /// First header with the given name, compared case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    #[must_use]
    pub fn is_multipart(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Lower-cased MIME type, falling back to the Content-Type header and
    /// then to `text/plain`
    #[must_use]
    pub fn content_type(&self) -> String {
        let declared = self.mime_type.trim();
        if !declared.is_empty() {
            return declared.to_ascii_lowercase();
        }
        self.header("Content-Type").map_or_else(
            || DEFAULT_MIME_TYPE.to_string(),
            |v| parse_content_type(v).mimetype,
        )
    }

    /// Charset declared in the part's Content-Type header, if any
    #[must_use]
    pub fn charset(&self) -> Option<String> {
        self.header("Content-Type")
            .and_then(|v| parse_content_type(v).params.get("charset").cloned())
    }

    /// Whether the Content-Disposition header marks this part as an attachment
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.header("Content-Disposition").is_some_and(|v| {
            parse_content_disposition(v).disposition == DispositionType::Attachment
        })
    }
}

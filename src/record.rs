//! Canonical email record

use crate::payload::MessagePart;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A normalized, provider-independent message ready for summarization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRecord {
    /// Provider-assigned message id, unique within a batch
    pub id: String,

    pub subject: Option<String>,

    /// Raw `From` header value; not validated as an address
    pub sender: Option<String>,

    /// Absent when the `Date` header is missing or unparsable
    pub received_at: Option<DateTime<FixedOffset>>,

    /// Plain-text (or HTML fallback) body, empty when nothing decodable exists
    pub body: String,

    /// The payload this record was built from, kept for re-processing
    pub raw_payload: MessagePart,
}

impl EmailRecord {
    /// Check if the record carries any body text
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

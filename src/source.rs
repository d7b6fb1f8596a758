//! Mail-fetch collaborator boundary
//!
//! Normalization never talks to the provider. A [`MailSource`] hands over
//! raw payloads, authorized by an explicitly passed [`Credential`].

use crate::date::parse_received_at;
use crate::error::{Error, Result};
use crate::headers::{Header, header_value};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Provider OAuth credentials as persisted in the token file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,

    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Credential {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// A credential without an expiry never expires
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }

    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// How far back to look for messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyWindow {
    days: u32,
}

impl RecencyWindow {
    pub fn days(days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::InvalidArgument("recency window must be at least one day".into()));
        }
        Ok(Self { days })
    }

    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.days))
    }

    /// Provider search query selecting the window
    #[must_use]
    pub fn query(self) -> String {
        format!("newer_than:{}d", self.days)
    }
}

/// Supplies raw message payloads
pub trait MailSource {
    /// Ids of inbox messages received within `window`, in provider order
    fn list_recent_message_ids(
        &self,
        credential: &Credential,
        window: RecencyWindow,
    ) -> Result<Vec<String>>;

    /// The provider's payload for one message
    fn fetch_raw_payload(&self, credential: &Credential, id: &str) -> Result<Value>;
}

/// A [`MailSource`] over a saved JSON object mapping message id to payload
#[derive(Debug, Clone)]
pub struct DumpSource {
    messages: Vec<(String, Value)>,
    now: DateTime<Utc>,
}

#[derive(Deserialize)]
struct DumpHeaders {
    #[serde(default)]
    headers: Vec<Header>,
}

impl DumpSource {
    pub fn open(path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::Source(
                "message dump must be an object keyed by message id".into(),
            ));
        };
        Ok(Self {
            messages: map.into_iter().collect(),
            now: Utc::now(),
        })
    }

    /// Evaluate recency windows relative to `now` instead of the wall clock
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Parsed `Date` header of a dumped payload, if it has a readable one
fn dumped_received_at(payload: &Value) -> Option<DateTime<Utc>> {
    let dump = DumpHeaders::deserialize(payload).ok()?;
    header_value(&dump.headers, "Date")
        .and_then(parse_received_at)
        .map(|at| at.with_timezone(&Utc))
}

impl MailSource for DumpSource {
    fn list_recent_message_ids(
        &self,
        _credential: &Credential,
        window: RecencyWindow,
    ) -> Result<Vec<String>> {
        let since = window.since(self.now);
        debug!("Listing dumped messages matching {}", window.query());

        // Undated messages stay in; normalization reports them without a timestamp.
        Ok(self
            .messages
            .iter()
            .filter(|(_, payload)| dumped_received_at(payload).is_none_or(|at| at >= since))
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn fetch_raw_payload(&self, _credential: &Credential, id: &str) -> Result<Value> {
        self.messages
            .iter()
            .find(|(candidate, _)| candidate == id)
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| Error::Source(format!("message {id} not found")))
    }
}

//! Message normalization and batch processing

use crate::body::decode_body;
use crate::date::parse_received_at;
use crate::error::{Error, Result};
use crate::payload::MessagePart;
use crate::record::EmailRecord;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Normalize one provider payload into an [`EmailRecord`].
///
/// Pure transform: missing headers become `None`, an unparsable date becomes
/// `None`, and undecodable body parts are skipped. The only error is an empty
/// `message_id`.
pub fn normalize_email(message_id: &str, payload: MessagePart) -> Result<EmailRecord> {
    if message_id.trim().is_empty() {
        return Err(Error::InvalidArgument("message id must not be empty".into()));
    }

    let subject = payload.header("Subject").map(str::to_string);
    let sender = payload.header("From").map(str::to_string);
    let received_at = payload.header("Date").and_then(parse_received_at);
    let body = decode_body(&payload);

    debug!(
        id = message_id,
        "Normalized email: {} from {}",
        subject.as_deref().unwrap_or("(no subject)"),
        sender.as_deref().unwrap_or("(unknown sender)")
    );

    Ok(EmailRecord {
        id: message_id.to_string(),
        subject,
        sender,
        received_at,
        body,
        raw_payload: payload,
    })
}

/// Normalize already-typed payloads.
///
/// Output follows the input's iteration order. Messages that cannot be
/// normalized, or that repeat an earlier id, are logged and skipped.
pub fn normalize_batch<I>(messages: I) -> Vec<EmailRecord>
where
    I: IntoIterator<Item = (String, MessagePart)>,
{
    process_batch(messages, Ok)
}

/// Normalize untyped JSON payloads, validating each one at ingestion.
///
/// A payload with an invalid structure only drops that message.
pub fn normalize_raw_batch<I>(messages: I) -> Vec<EmailRecord>
where
    I: IntoIterator<Item = (String, serde_json::Value)>,
{
    process_batch(messages, MessagePart::from_value)
}

fn process_batch<I, P, F>(messages: I, ingest: F) -> Vec<EmailRecord>
where
    I: IntoIterator<Item = (String, P)>,
    P: Send,
    F: Fn(P) -> Result<MessagePart> + Sync,
{
    let mut seen = HashSet::new();
    let entries: Vec<(String, Result<P>)> = messages
        .into_iter()
        .map(|(id, payload)| {
            if seen.insert(id.clone()) {
                (id, Ok(payload))
            } else {
                let err = Error::DuplicateMessage(id.clone());
                (id, Err(err))
            }
        })
        .collect();
    let total = entries.len();

    // Indexed parallel collect keeps input order.
    let results: Vec<(String, Result<EmailRecord>)> = entries
        .into_par_iter()
        .map(|(id, payload)| {
            let record = payload
                .and_then(&ingest)
                .and_then(|part| normalize_email(&id, part));
            (id, record)
        })
        .collect();

    let records: Vec<EmailRecord> = results
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(id = %id, "Skipping message: {e}");
                None
            }
        })
        .collect();

    info!("{} of {total} messages normalized", records.len());
    records
}

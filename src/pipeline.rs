//! Fetch → normalize orchestration

use crate::error::Result;
use crate::normalizer::normalize_raw_batch;
use crate::record::EmailRecord;
use crate::source::{Credential, MailSource, RecencyWindow};
use tracing::{info, warn};

/// List recent messages from `source`, fetch each payload and normalize the
/// batch.
///
/// A listing failure is returned; a failed fetch only skips that message.
pub fn fetch_and_normalize<S>(
    source: &S,
    credential: &Credential,
    window: RecencyWindow,
) -> Result<Vec<EmailRecord>>
where
    S: MailSource + ?Sized,
{
    let ids = source.list_recent_message_ids(credential, window)?;
    if ids.is_empty() {
        info!("No new messages found.");
        return Ok(Vec::new());
    }
    info!("{} messages retrieved.", ids.len());

    let payloads = ids
        .into_iter()
        .filter_map(|id| match source.fetch_raw_payload(credential, &id) {
            Ok(payload) => Some((id, payload)),
            Err(e) => {
                warn!(id = %id, "Skipping message: {e}");
                None
            }
        });

    Ok(normalize_raw_batch(payloads))
}

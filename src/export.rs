//! JSON export of normalized batches
//!
//! A batch is written as one pretty-printed JSON array. Records keep their
//! `rawPayload`, so reading an export back yields identical records.

use crate::error::Result;
use crate::record::EmailRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

pub fn to_json_string(records: &[EmailRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn from_json_str(json: &str) -> Result<Vec<EmailRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Write a batch to `path`, replacing any previous export
pub fn write_json(path: &Path, records: &[EmailRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    info!("Exported {} emails to {}", records.len(), path.display());
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Vec<EmailRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

//! Inbox Digest
//!
//! Turns recent inbox messages, as delivered by the mail provider, into
//! canonical records ready for downstream summarization.
//!
//! # Features
//!
//! - Strongly-typed provider payloads, validated once at ingestion
//! - Plain-text body extraction with HTML fallback, skipping attachments
//! - Tolerant date parsing that never fails a message
//! - Parallel batch normalization with stable output order
//! - JSON export and SQLite upsert of normalized records
//!
//! # Example
//!
//! ```rust
//! use mail_digest::{Header, MessagePart, normalize_email};
//!
//! let payload = MessagePart::leaf(
//!     "text/plain",
//!     vec![
//!         Header::new("From", "a@x.com"),
//!         Header::new("Subject", "Hi"),
//!         Header::new("Date", "Mon, 02 Jan 2023 10:00:00 +0000"),
//!     ],
//!     b"hello",
//! );
//! let email = normalize_email("18c2f0a1", payload).unwrap();
//!
//! assert_eq!(email.sender.as_deref(), Some("a@x.com"));
//! assert_eq!(email.body, "hello");
//! ```

mod body;
mod config;
mod date;
mod error;
mod export;
mod headers;
mod normalizer;
mod payload;
mod pipeline;
mod record;
mod source;
mod store;

pub use body::{decode_body, decode_part};
pub use config::Settings;
pub use date::{DATE_HEADER_FORMAT, parse_date_strict, parse_received_at};
pub use error::{Error, Result};
pub use export::{from_json_str, read_json, to_json_string, write_json};
pub use headers::{Header, header_value};
pub use normalizer::{normalize_batch, normalize_email, normalize_raw_batch};
pub use payload::{MessagePart, PartBody};
pub use pipeline::fetch_and_normalize;
pub use record::EmailRecord;
pub use source::{Credential, DumpSource, MailSource, RecencyWindow};
pub use store::EmailStore;

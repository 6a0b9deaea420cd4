//! zmigrate - Zimbra to JMAP mailbox migration core
//!
//! Translates a legacy Zimbra mailbox (contacts, calendars, mail filter
//! rules) into JMAP-shaped objects, with content-based duplicate suppression
//! so reruns do not duplicate data, and a conflict-resolving merge for
//! filter rules that refuses to clobber a live configuration.
//!
//! ## Module Organization
//!
//! - `soap`: Zimbra SOAP response extraction (structural, stateless)
//! - `folders`: folder path to container name mapping
//! - `datetime`: partial dates, ISO date-times, local to UTC conversion
//! - `contacts`: JSContact card building and dedupe keys
//! - `calendars`: calendar event building and dedupe keys
//! - `filters`: conflict-resolving filter rule merge
//! - `dedupe`: content-addressed identity keys and stable identifiers
//! - `config`: TOML migration configuration
//! - `types/`: legacy entity snapshots
//!
//! Transport (SOAP/HTTP), authentication and CLI wiring belong to the
//! driving process; every function here is synchronous and pure over
//! in-memory values.

pub mod calendars;
pub mod config;
pub mod contacts;
pub mod datetime;
pub mod dedupe;
pub mod error;
pub mod filters;
pub mod folders;
pub mod soap;
pub mod types;

pub use error::{MigrateError, Result};
pub use filters::merge_imported_rules;
pub use types::{ZimbraContact, ZimbraContactGroupMember, ZimbraFolder};

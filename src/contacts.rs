//! Contact card building
//!
//! Maps Zimbra contact attribute bags into JSContact card objects for the
//! target address book. Field mapping is convention-driven: email attributes
//! follow the `email[N]` / `workEmail[N]` positional-suffix pattern, names
//! fall back to the primary email address, and contact groups become cards
//! of kind `group` whose members are stored as opaque literal values.
//!
//! Optional keys are only emitted when source data exists. Builders never
//! fail on missing optional attributes.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::datetime::parse_partial_date;
use crate::dedupe::{content_digest, project_fields};
use crate::types::ZimbraContact;

/// Context tag for an email attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EmailContext {
    /// Bare `email[N]` attributes
    Private,
    /// `workEmail[N]` attributes
    Work,
}

impl EmailContext {
    /// The JSContact contexts key for this tag
    pub fn context_key(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Work => "work",
        }
    }
}

/// A recognized email attribute, decomposed into context and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailField {
    pub context: EmailContext,
    /// Positional index; the bare field name counts as 1
    pub index: u32,
}

/// Decompose an attribute name under the email field convention
///
/// Matches exactly `email` / `workEmail`, or that prefix followed by a bare
/// positive-integer suffix. `email2` matches; `email_` and `emailx` do not,
/// which keeps unrelated attributes that merely share the prefix out of the
/// email mapping.
pub fn parse_email_field(name: &str) -> Option<EmailField> {
    let (context, suffix) = if let Some(rest) = name.strip_prefix("workEmail") {
        (EmailContext::Work, rest)
    } else if let Some(rest) = name.strip_prefix("email") {
        (EmailContext::Private, rest)
    } else {
        return None;
    };

    if suffix.is_empty() {
        return Some(EmailField { context, index: 1 });
    }

    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: u32 = suffix.parse().ok()?;
    if index == 0 {
        return None;
    }
    Some(EmailField { context, index })
}

/// Whether an attribute name is an email field under the convention
pub fn is_email_field(name: &str) -> bool {
    parse_email_field(name).is_some()
}

/// All recognized email attributes, ordered by context then position
fn email_fields(attrs: &HashMap<String, String>) -> Vec<(&str, EmailField, &str)> {
    let mut fields: Vec<(&str, EmailField, &str)> = attrs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(name, value)| {
            parse_email_field(name).map(|field| (name.as_str(), field, value.as_str()))
        })
        .collect();
    fields.sort_by_key(|(_, field, _)| (field.context, field.index));
    fields
}

/// The contact's primary email address: lowest-position private address
/// first, then lowest-position work address
pub fn primary_email(attrs: &HashMap<String, String>) -> Option<&str> {
    email_fields(attrs).first().map(|(_, _, value)| *value)
}

/// Build the JSContact name object, if any name data exists
///
/// Explicit first/last name attributes combine into a full display name;
/// absent both, the primary email address stands in.
pub fn name_from_attrs(attrs: &HashMap<String, String>) -> Option<Value> {
    let parts: Vec<&str> = ["firstName", "lastName"]
        .iter()
        .filter_map(|key| attrs.get(*key).map(|v| v.as_str()))
        .filter(|v| !v.is_empty())
        .collect();

    let full = if parts.is_empty() {
        primary_email(attrs)?.to_string()
    } else {
        parts.join(" ")
    };

    Some(json!({ "full": full }))
}

/// Build the JSContact emails map, keyed by the source attribute name
pub fn emails_from_attrs(attrs: &HashMap<String, String>) -> Option<Value> {
    let fields = email_fields(attrs);
    if fields.is_empty() {
        return None;
    }

    let mut emails = Map::new();
    for (name, field, value) in fields {
        emails.insert(
            name.to_string(),
            json!({
                "address": value,
                "contexts": { field.context.context_key(): true },
            }),
        );
    }
    Some(Value::Object(emails))
}

/// Build a JSContact card create object for a Zimbra contact
///
/// `stable_uid` is the migration-assigned identifier, not the Zimbra id;
/// rerunning a migration assigns fresh uids, which is why duplicate
/// suppression goes through [`card_dedupe_key`] instead.
pub fn card_from_contact(
    contact: &ZimbraContact,
    address_book_id: &str,
    stable_uid: &str,
) -> Value {
    let mut card = Map::new();
    card.insert("uid".to_string(), json!(stable_uid));
    card.insert(
        "addressBookIds".to_string(),
        json!({ address_book_id: true }),
    );

    if let Some(name) = name_from_attrs(&contact.attrs) {
        card.insert("name".to_string(), name);
    }

    if let Some(nickname) = contact.attr("nickname").filter(|v| !v.is_empty()) {
        card.insert("nickNames".to_string(), json!({ "nick": { "name": nickname } }));
    }

    if let Some(emails) = emails_from_attrs(&contact.attrs) {
        card.insert("emails".to_string(), emails);
    }

    if let Some(date) = contact.attr("birthday").and_then(parse_partial_date) {
        card.insert(
            "anniversaries".to_string(),
            json!({ "birthday": { "@type": "Anniversary", "kind": "birth", "date": date } }),
        );
    }

    if contact.is_group() {
        card.insert("kind".to_string(), json!("group"));
        let mut members = Map::new();
        for member in &contact.members {
            members.insert(member.value.clone(), json!(true));
        }
        card.insert("members".to_string(), Value::Object(members));
    }

    debug!(
        "Built card create object for contact {} (group: {})",
        contact.contact_id,
        contact.is_group()
    );
    Value::Object(card)
}

/// Content-based identity key for a built card
///
/// Derived from content fields only; the run-assigned `uid` and the
/// address-book membership ids are excluded so repeated migrations of the
/// same logical contact collide to the same key.
pub fn card_dedupe_key(card: &Value) -> String {
    let projection = project_fields(
        card,
        &["name", "nickNames", "kind", "emails", "members", "anniversaries"],
    );
    content_digest(&projection)
}

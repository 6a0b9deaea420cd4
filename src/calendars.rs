//! Calendar event building
//!
//! Maps parsed legacy calendar events into JMAP `CalendarEvent/set` create
//! objects. The event body is carried over verbatim with two exceptions:
//! the `uid` is replaced by the migration-assigned stable identifier, and
//! alerts are dropped — the target's reminder model is not mapped, as a
//! stated scope limitation of the migration.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::dedupe::{content_digest, project_fields};

/// Build a calendar event create object from a parsed legacy event
///
/// `stable_uid` is assigned by the migration process, not taken from the
/// legacy event, so reruns create objects with fresh uids; duplicate
/// suppression relies on [`event_dedupe_key`].
pub fn event_create_from_parsed(parsed: &Value, calendar_id: &str, stable_uid: &str) -> Value {
    let mut event = match parsed.as_object() {
        Some(map) => map.clone(),
        None => Map::new(),
    };

    // Reminders are not migrated
    event.remove("alerts");

    event.insert("uid".to_string(), json!(stable_uid));
    event.insert("calendarIds".to_string(), json!({ calendar_id: true }));

    debug!(
        "Built event create object {} for calendar {}",
        stable_uid, calendar_id
    );
    Value::Object(event)
}

/// Content-based identity key for a built event
///
/// Derived from start, duration, timezone and title only; the run-assigned
/// `uid` is excluded so repeated migrations of the same logical event
/// collide to the same key.
pub fn event_dedupe_key(event: &Value) -> String {
    let projection = project_fields(event, &["start", "duration", "timeZone", "title"]);
    content_digest(&projection)
}

/// Pick the calendar that should receive events with no folder mapping
///
/// A calendar flagged `isDefault` wins; otherwise the first calendar
/// carrying a `timeZone` (a user-configured calendar rather than a bare
/// auto-created one); otherwise the first calendar.
pub fn default_calendar_id(calendars: &[Value]) -> Option<String> {
    let id_of = |c: &Value| c.get("id").and_then(Value::as_str).map(str::to_string);

    if let Some(calendar) = calendars
        .iter()
        .find(|c| c.get("isDefault").and_then(Value::as_bool) == Some(true))
    {
        return id_of(calendar);
    }

    if let Some(calendar) = calendars
        .iter()
        .find(|c| c.get("timeZone").and_then(Value::as_str).is_some())
    {
        return id_of(calendar);
    }

    calendars.first().and_then(|c| id_of(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed_event() -> Value {
        json!({
            "start": "2026-01-01T00:00:00",
            "duration": "PT1H",
            "timeZone": "Etc/UTC",
            "uid": "legacy-uid",
            "title": "t",
            "alerts": { "k1": { "action": "email" } },
        })
    }

    #[test]
    fn test_create_drops_alerts() {
        let create = event_create_from_parsed(&parsed_event(), "cal1", "u1");
        assert!(create.get("alerts").is_none());
        assert_eq!(create["calendarIds"], json!({"cal1": true}));
        assert_eq!(create["uid"], "u1");
        assert_eq!(create["title"], "t");
        assert_eq!(create["duration"], "PT1H");
    }

    #[test]
    fn test_dedupe_key_ignores_uid() {
        let a = event_create_from_parsed(&parsed_event(), "cal1", "u1");
        let b = event_create_from_parsed(&parsed_event(), "cal1", "u2");
        assert_eq!(event_dedupe_key(&a), event_dedupe_key(&b));
    }

    #[test]
    fn test_dedupe_key_differs_on_content() {
        let a = event_create_from_parsed(&parsed_event(), "cal1", "u1");
        let mut other = parsed_event();
        other["title"] = json!("different");
        let b = event_create_from_parsed(&other, "cal1", "u1");
        assert_ne!(event_dedupe_key(&a), event_dedupe_key(&b));
    }

    #[test]
    fn test_default_calendar_prefers_timezone() {
        let calendars = vec![
            json!({"id": "b", "name": "Stalwart Calendar (user@example.com)"}),
            json!({"id": "c", "name": "Work", "timeZone": "America/Vancouver"}),
        ];
        assert_eq!(default_calendar_id(&calendars), Some("c".to_string()));
    }

    #[test]
    fn test_default_calendar_is_default_wins() {
        let calendars = vec![
            json!({"id": "x", "name": "X", "timeZone": "America/Vancouver"}),
            json!({"id": "y", "name": "Y", "isDefault": true}),
        ];
        assert_eq!(default_calendar_id(&calendars), Some("y".to_string()));
    }

    #[test]
    fn test_default_calendar_falls_back_to_first() {
        let calendars = vec![json!({"id": "a"}), json!({"id": "b"})];
        assert_eq!(default_calendar_id(&calendars), Some("a".to_string()));
        assert_eq!(default_calendar_id(&[]), None);
    }
}

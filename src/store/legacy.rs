//! Migration from older schemas.
//!
//! Two older shapes are recognized, per context entry:
//! - typed lists: items in four lists (`applications`, `documents`,
//!   `browserTabs`, `terminalSessions`) with no `items` key;
//! - flat fields: a tagged `items` list, but the icon as flat `iconName` /
//!   `iconBackgroundColor` / `iconForegroundColor` fields and dates as seconds since
//!   2001-01-01 UTC.
//!
//! Entries already in the current schema are kept as they are. Migration is lossy:
//! entries that do not decode are dropped, the rest keep their ids. Typed-list items
//! end up in list order applications, documents, tabs, terminals.

use crate::context::{Context, IconDescriptor};
use crate::item::{AppItem, BrowserTab, ContextItem, DocumentItem, TerminalSession};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

const LEGACY_LISTS: [&str; 4] = ["applications", "documents", "browserTabs", "terminalSessions"];

/// Unix time of 2001-01-01T00:00:00Z, the epoch of numeric dates in older files.
const REFERENCE_DATE_UNIX: i64 = 978_307_200;

/// Migrate a document that does not decode in the current schema.
///
/// Returns `None` when `value` is not a list or holds an entry that is not a
/// recognizable context, so the caller can treat the file as unreadable.
pub fn migrate(value: &Value) -> Option<Vec<Context>> {
    let entries = value.as_array()?;
    if !entries.iter().all(is_context_like) {
        return None;
    }
    let contexts: Vec<Context> = entries.iter().filter_map(migrate_context).collect();
    if contexts.len() < entries.len() {
        warn!(
            dropped = entries.len() - contexts.len(),
            "Some stored contexts had no name and were dropped"
        );
    }
    Some(contexts)
}

fn is_context_like(value: &Value) -> bool {
    value
        .as_object()
        .map(|o| o.contains_key("items") || LEGACY_LISTS.iter().any(|key| o.contains_key(*key)))
        .unwrap_or(false)
}

fn migrate_context(value: &Value) -> Option<Context> {
    let object = value.as_object()?;
    if object.contains_key("items") {
        if let Ok(context) = serde_json::from_value::<Context>(value.clone()) {
            return Some(context);
        }
    }
    let name = object.get("name")?.as_str()?;

    let items: Vec<ContextItem> = if object.contains_key("items") {
        decode_list::<ContextItem>(value, "items").collect()
    } else {
        let mut items = Vec::new();
        items.extend(decode_list::<AppItem>(value, "applications").map(ContextItem::from));
        items.extend(decode_list::<DocumentItem>(value, "documents").map(ContextItem::from));
        items.extend(decode_list::<BrowserTab>(value, "browserTabs").map(ContextItem::from));
        items.extend(
            decode_list::<TerminalSession>(value, "terminalSessions").map(ContextItem::from),
        );
        items
    };

    let mut context = Context::new(name).with_items(items);
    if let Some(id) = string_field(value, "id").and_then(|raw| Uuid::parse_str(raw).ok()) {
        context.id = id;
    }
    if let Some(icon) = string_field(value, "iconName") {
        context.icon = Some(IconDescriptor {
            name: icon.to_string(),
            background_color: string_field(value, "iconBackgroundColor").map(str::to_string),
            foreground_color: string_field(value, "iconForegroundColor").map(str::to_string),
        });
    }
    if let Some(created) = date_field(value, "createdAt") {
        context.created_at = created;
    }
    if let Some(used) = date_field(value, "lastUsed") {
        context.last_used = used;
    }
    debug!(context = %context.name, items = context.items().len(), "Migrated stored context");
    Some(context)
}

fn decode_list<'a, T: DeserializeOwned + 'a>(
    value: &'a Value,
    key: &'a str,
) -> impl Iterator<Item = T> + 'a {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(move |entry| match serde_json::from_value::<T>(entry.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(list = key, error = %e, "Skipping undecodable entry");
                None
            }
        })
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// An RFC 3339 string, or seconds since 2001-01-01 UTC.
fn date_field(value: &Value, key: &str) -> Option<DateTime<Utc>> {
    match value.get(key)? {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        Value::Number(number) => {
            let seconds = number.as_f64()?;
            if !seconds.is_finite() {
                return None;
            }
            let whole = seconds.floor();
            let nanos = ((seconds - whole) * 1e9) as u32;
            DateTime::<Utc>::from_timestamp(REFERENCE_DATE_UNIX + whole as i64, nanos)
        }
        _ => None,
    }
}

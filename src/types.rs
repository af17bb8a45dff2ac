//! Shared identifier types.

use uuid::Uuid;

/// Stable identifier of a context.
pub type ContextId = Uuid;

/// Stable identifier of an item inside a context.
pub type ItemId = Uuid;

/// Parse a user supplied identifier (full UUID, hyphenated or simple form).
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// First eight hex characters of an id, for compact display.
pub fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

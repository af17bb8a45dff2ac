//! Context records
//!
//! A context is a named, ordered bundle of items plus display metadata. It is a
//! plain record: activation behavior lives in [`crate::engine`].

use crate::error::ApiError;
use crate::item::ContextItem;
use crate::types::{ContextId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Icon shown for a context: a symbol name and optional hex colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub id: ContextId,
    pub name: String,
    items: Vec<ContextItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconDescriptor>,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            items: Vec::new(),
            icon: None,
            created_at: now,
            last_used: now,
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = ContextItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn with_icon(mut self, icon: IconDescriptor) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn items(&self) -> &[ContextItem] {
        &self.items
    }

    pub fn item(&self, item_id: ItemId) -> Option<&ContextItem> {
        self.items.iter().find(|i| i.id() == item_id)
    }

    pub fn add_item(&mut self, item: ContextItem) {
        self.items.push(item);
    }

    /// First item id that appears more than once, if any.
    pub fn duplicate_item_id(&self) -> Option<ItemId> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(ContextItem::id)
            .find(|id| !seen.insert(*id))
    }

    /// Remove an item by id, returning it.
    pub fn remove_item(&mut self, item_id: ItemId) -> Option<ContextItem> {
        let index = self.items.iter().position(|i| i.id() == item_id)?;
        Some(self.items.remove(index))
    }

    /// Replace the item with the same id. Returns false if no such item exists.
    pub fn replace_item(&mut self, item: ContextItem) -> bool {
        match self.items.iter_mut().find(|i| i.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Move the item at `from` so that it ends up at index `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), ApiError> {
        let len = self.items.len();
        if from >= len || to >= len {
            return Err(ApiError::InvalidInput(format!(
                "Item position out of range: {} -> {} (context has {} items)",
                from, to, len
            )));
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Record that the context was just used.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_used = now;
    }
}

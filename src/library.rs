//! Context library
//!
//! The ordered, in-memory list of contexts and every editing operation on it. The
//! library knows nothing about persistence or activation; [`crate::manager`] ties it
//! to a store and an engine.

use crate::context::{Context, IconDescriptor};
use crate::error::ApiError;
use crate::item::ContextItem;
use crate::types::{parse_id, ContextId, ItemId};
use chrono::{DateTime, Utc};

/// Shortest id prefix accepted as a selector.
const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextLibrary {
    contexts: Vec<Context>,
}

impl ContextLibrary {
    pub fn new(contexts: Vec<Context>) -> Self {
        Self { contexts }
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn into_contexts(self) -> Vec<Context> {
        self.contexts
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn get(&self, id: ContextId) -> Option<&Context> {
        self.contexts.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: ContextId) -> Result<&mut Context, ApiError> {
        self.contexts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::ContextNotFound(id.to_string()))
    }

    fn position(&self, id: ContextId) -> Result<usize, ApiError> {
        self.contexts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ApiError::ContextNotFound(id.to_string()))
    }

    /// Resolve a user supplied selector: a full id, a case-insensitive name, or a
    /// unique id prefix of at least four hex characters.
    pub fn find(&self, selector: &str) -> Result<&Context, ApiError> {
        let selector = selector.trim();
        if let Some(id) = parse_id(selector) {
            return self
                .get(id)
                .ok_or_else(|| ApiError::ContextNotFound(selector.to_string()));
        }

        let by_name: Vec<&Context> = self
            .contexts
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(selector))
            .collect();
        match by_name.len() {
            1 => return Ok(by_name[0]),
            0 => {}
            _ => return Err(ApiError::AmbiguousContext(selector.to_string())),
        }

        let prefix = selector.to_ascii_lowercase().replace('-', "");
        if prefix.len() >= MIN_ID_PREFIX && prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            let by_prefix: Vec<&Context> = self
                .contexts
                .iter()
                .filter(|c| c.id.simple().to_string().starts_with(&prefix))
                .collect();
            match by_prefix.len() {
                1 => return Ok(by_prefix[0]),
                0 => {}
                _ => return Err(ApiError::AmbiguousContext(selector.to_string())),
            }
        }

        Err(ApiError::ContextNotFound(selector.to_string()))
    }

    /// Append a new, empty context.
    pub fn create(
        &mut self,
        name: &str,
        icon: Option<IconDescriptor>,
    ) -> Result<&Context, ApiError> {
        let name = validate_name(name)?;
        let mut context = Context::new(name);
        context.icon = icon;
        self.contexts.push(context);
        Ok(&self.contexts[self.contexts.len() - 1])
    }

    /// Append an already built context (capture, import).
    pub fn insert(&mut self, context: Context) -> Result<&Context, ApiError> {
        validate_name(&context.name)?;
        validate_item_ids(&context)?;
        if self.get(context.id).is_some() {
            return Err(ApiError::InvalidInput(format!(
                "A context with id {} already exists",
                context.id
            )));
        }
        self.contexts.push(context);
        Ok(&self.contexts[self.contexts.len() - 1])
    }

    /// Replace the stored context that has the same id.
    pub fn update(&mut self, context: Context) -> Result<(), ApiError> {
        validate_name(&context.name)?;
        validate_item_ids(&context)?;
        let slot = self.get_mut(context.id)?;
        *slot = context;
        Ok(())
    }

    pub fn rename(&mut self, id: ContextId, name: &str) -> Result<(), ApiError> {
        let name = validate_name(name)?;
        self.get_mut(id)?.name = name;
        Ok(())
    }

    pub fn set_icon(&mut self, id: ContextId, icon: Option<IconDescriptor>) -> Result<(), ApiError> {
        self.get_mut(id)?.icon = icon;
        Ok(())
    }

    pub fn delete(&mut self, id: ContextId) -> Result<Context, ApiError> {
        let index = self.position(id)?;
        Ok(self.contexts.remove(index))
    }

    /// Move a context to `position` (clamped to the end of the list).
    pub fn reorder(&mut self, id: ContextId, position: usize) -> Result<(), ApiError> {
        let index = self.position(id)?;
        let context = self.contexts.remove(index);
        let position = position.min(self.contexts.len());
        self.contexts.insert(position, context);
        Ok(())
    }

    pub fn add_item(&mut self, id: ContextId, item: ContextItem) -> Result<ItemId, ApiError> {
        let item_id = item.id();
        let context = self.get_mut(id)?;
        if context.item(item_id).is_some() {
            return Err(ApiError::InvalidInput(format!(
                "Item {} is already in context '{}'",
                item_id, context.name
            )));
        }
        context.add_item(item);
        Ok(item_id)
    }

    pub fn remove_item(&mut self, id: ContextId, item_id: ItemId) -> Result<ContextItem, ApiError> {
        self.get_mut(id)?
            .remove_item(item_id)
            .ok_or_else(|| ApiError::ItemNotFound(item_id.to_string()))
    }

    pub fn replace_item(&mut self, id: ContextId, item: ContextItem) -> Result<(), ApiError> {
        let item_id = item.id();
        if self.get_mut(id)?.replace_item(item) {
            Ok(())
        } else {
            Err(ApiError::ItemNotFound(item_id.to_string()))
        }
    }

    pub fn move_item(&mut self, id: ContextId, from: usize, to: usize) -> Result<(), ApiError> {
        self.get_mut(id)?.move_item(from, to)
    }

    /// Record that the context was just used.
    pub fn touch(&mut self, id: ContextId, now: DateTime<Utc>) -> Result<(), ApiError> {
        self.get_mut(id)?.touch(now);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("Context name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_item_ids(context: &Context) -> Result<(), ApiError> {
    match context.duplicate_item_id() {
        Some(item_id) => Err(ApiError::InvalidInput(format!(
            "Item id {} appears more than once in context '{}'",
            item_id, context.name
        ))),
        None => Ok(()),
    }
}

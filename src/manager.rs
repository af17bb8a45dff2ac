//! Context manager
//!
//! Ties the context library to its store and to one activation engine. Every
//! mutation is saved immediately. Activation stamps `lastUsed` on the context.

use crate::context::{Context, IconDescriptor};
use crate::engine::{ActivationEngine, ActivationReport, ActivationStatus, CloseReport, SwitchPolicy};
use crate::error::ApiError;
use crate::family::Partition;
use crate::item::{AppItem, ContextItem};
use crate::launcher::LaunchOutcome;
use crate::library::ContextLibrary;
use crate::store::ContextStore;
use crate::types::{ContextId, ItemId};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{info, warn};

pub struct ContextManager {
    library: ContextLibrary,
    store: Box<dyn ContextStore>,
    engine: ActivationEngine,
}

impl ContextManager {
    /// Load the library from `store`.
    pub fn open(store: Box<dyn ContextStore>, engine: ActivationEngine) -> Result<Self, ApiError> {
        let contexts = store.load_all()?;
        info!(contexts = contexts.len(), "Loaded contexts");
        Ok(Self {
            library: ContextLibrary::new(contexts),
            store,
            engine,
        })
    }

    pub fn library(&self) -> &ContextLibrary {
        &self.library
    }

    pub fn contexts(&self) -> &[Context] {
        self.library.contexts()
    }

    pub fn engine(&self) -> &ActivationEngine {
        &self.engine
    }

    pub fn find(&self, selector: &str) -> Result<&Context, ApiError> {
        self.library.find(selector)
    }

    /// Resolve a selector to an id.
    pub fn resolve(&self, selector: &str) -> Result<ContextId, ApiError> {
        self.library.find(selector).map(|c| c.id)
    }

    fn context(&self, id: ContextId) -> Result<&Context, ApiError> {
        self.library
            .get(id)
            .ok_or_else(|| ApiError::ContextNotFound(id.to_string()))
    }

    fn persist(&self) -> Result<(), ApiError> {
        self.store.save_all(self.library.contexts())?;
        Ok(())
    }

    pub fn create(&mut self, name: &str, icon: Option<IconDescriptor>) -> Result<Context, ApiError> {
        let created = self.library.create(name, icon)?.clone();
        self.persist()?;
        info!(context_id = %created.id, context = %created.name, "Created context");
        Ok(created)
    }

    pub fn update(&mut self, context: Context) -> Result<(), ApiError> {
        self.library.update(context)?;
        self.persist()
    }

    pub fn rename(&mut self, id: ContextId, name: &str) -> Result<(), ApiError> {
        self.library.rename(id, name)?;
        self.persist()
    }

    pub fn set_icon(&mut self, id: ContextId, icon: Option<IconDescriptor>) -> Result<(), ApiError> {
        self.library.set_icon(id, icon)?;
        self.persist()
    }

    /// Delete a context. If it is active its activation record is dropped; the
    /// windows it opened stay open.
    pub fn delete(&mut self, id: ContextId) -> Result<Context, ApiError> {
        let removed = self.library.delete(id)?;
        if self.engine.forget(id) {
            info!(context_id = %id, "Deleted an active context; its windows stay open");
        }
        self.persist()?;
        Ok(removed)
    }

    pub fn reorder(&mut self, id: ContextId, position: usize) -> Result<(), ApiError> {
        self.library.reorder(id, position)?;
        self.persist()
    }

    pub fn add_item(&mut self, id: ContextId, item: ContextItem) -> Result<ItemId, ApiError> {
        let item_id = self.library.add_item(id, item)?;
        self.persist()?;
        Ok(item_id)
    }

    pub fn remove_item(&mut self, id: ContextId, item_id: ItemId) -> Result<ContextItem, ApiError> {
        let removed = self.library.remove_item(id, item_id)?;
        self.persist()?;
        Ok(removed)
    }

    pub fn replace_item(&mut self, id: ContextId, item: ContextItem) -> Result<(), ApiError> {
        self.library.replace_item(id, item)?;
        self.persist()
    }

    pub fn move_item(&mut self, id: ContextId, from: usize, to: usize) -> Result<(), ApiError> {
        self.library.move_item(id, from, to)?;
        self.persist()
    }

    /// Create a context with one application item per visible, regular running
    /// application.
    pub fn capture_current_workspace(&mut self, name: &str) -> Result<Context, ApiError> {
        let running = self.engine.platform().workspace.running_applications()?;
        let mut seen = HashSet::new();
        let items: Vec<ContextItem> = running
            .into_iter()
            .filter(|app| app.regular && !app.hidden)
            .filter(|app| seen.insert(app.bundle_identifier.to_ascii_lowercase()))
            .map(|app| {
                let label = app
                    .name
                    .clone()
                    .unwrap_or_else(|| app.bundle_identifier.clone());
                AppItem::new(label, app.bundle_identifier).into()
            })
            .collect();

        let context = Context::new(name.trim()).with_items(items);
        let captured = self.library.insert(context)?.clone();
        self.persist()?;
        info!(
            context_id = %captured.id,
            applications = captured.items().len(),
            "Captured current workspace"
        );
        Ok(captured)
    }

    /// Activate a context and stamp its `lastUsed`. Saving the timestamp is best
    /// effort.
    pub fn activate(&mut self, id: ContextId, policy: SwitchPolicy) -> ActivationReport {
        let report = self.engine.activate(&self.library, id, policy);
        if report.status == ActivationStatus::Activated {
            let touched = self
                .library
                .touch(id, Utc::now())
                .and_then(|_| self.persist());
            if let Err(e) = touched {
                warn!(context_id = %id, error = %e, "Could not record last use");
            }
        }
        report
    }

    pub fn close(&mut self, id: ContextId) -> CloseReport {
        self.engine.close(id)
    }

    pub fn close_all(&mut self) -> Vec<CloseReport> {
        self.engine.close_all()
    }

    pub fn is_active(&self, id: ContextId) -> bool {
        self.engine.is_active(id)
    }

    /// Active contexts in activation order.
    pub fn active_contexts(&self) -> Vec<&Context> {
        self.engine
            .active_context_ids()
            .iter()
            .filter_map(|id| self.library.get(*id))
            .collect()
    }

    pub fn open_item(&self, id: ContextId, item_id: ItemId) -> Result<LaunchOutcome, ApiError> {
        let item = self
            .context(id)?
            .item(item_id)
            .ok_or_else(|| ApiError::ItemNotFound(item_id.to_string()))?;
        Ok(self.engine.open_item(item))
    }

    pub fn plan(&self, id: ContextId) -> Result<Partition, ApiError> {
        Ok(self.engine.plan(self.context(id)?))
    }
}

impl std::fmt::Debug for ContextManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextManager")
            .field("contexts", &self.library.len())
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

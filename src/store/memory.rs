use super::ContextStore;
use crate::context::Context;
use crate::error::StorageError;
use parking_lot::Mutex;

/// In-memory store for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryContextStore {
    contexts: Mutex<Vec<Context>>,
    saves: Mutex<usize>,
}

impl MemoryContextStore {
    pub fn new(contexts: Vec<Context>) -> Self {
        Self {
            contexts: Mutex::new(contexts),
            saves: Mutex::new(0),
        }
    }

    /// How many times `save_all` was called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }

    pub fn snapshot(&self) -> Vec<Context> {
        self.contexts.lock().clone()
    }
}

impl ContextStore for MemoryContextStore {
    fn load_all(&self) -> Result<Vec<Context>, StorageError> {
        Ok(self.contexts.lock().clone())
    }

    fn save_all(&self, contexts: &[Context]) -> Result<(), StorageError> {
        *self.contexts.lock() = contexts.to_vec();
        *self.saves.lock() += 1;
        Ok(())
    }
}

use super::{launch_bare_application, open_documents, open_urls, LaunchOutcome, Launcher};
use crate::family::FamilyId;
use crate::item::ContextItem;
use crate::platform::Platform;
use crate::script;
use tracing::debug;

/// Document viewer: opens each document and closes exactly those documents later,
/// matched by path.
pub struct PreviewLauncher {
    family: FamilyId,
    items: Vec<ContextItem>,
    platform: Platform,
    opened_paths: Vec<String>,
}

impl PreviewLauncher {
    pub fn new(family: FamilyId, items: Vec<ContextItem>, platform: Platform) -> Self {
        Self {
            family,
            items,
            platform,
            opened_paths: Vec::new(),
        }
    }

    pub fn opened_paths(&self) -> &[String] {
        &self.opened_paths
    }
}

impl Launcher for PreviewLauncher {
    fn family(&self) -> &FamilyId {
        &self.family
    }

    fn items(&self) -> &[ContextItem] {
        &self.items
    }

    fn open(&mut self) -> LaunchOutcome {
        let mut outcome = LaunchOutcome::default();
        let has_documents = self.items.iter().any(|i| i.as_document().is_some());
        if !has_documents {
            launch_bare_application(&self.platform, &self.family, &self.items, &mut outcome);
        }
        let opened = open_documents(&self.platform, &self.family, &self.items, &mut outcome);
        self.opened_paths.extend(opened);
        open_urls(&self.platform, &self.family, &self.items, &mut outcome);
        outcome
    }

    fn close(&mut self) -> LaunchOutcome {
        let mut outcome = LaunchOutcome::default();
        for path in std::mem::take(&mut self.opened_paths) {
            match self.platform.automation.run(&script::preview_close(&path)) {
                Ok(_) => outcome.succeed(1),
                Err(e) if e.is_stale() => debug!(path = %path, "Document already closed"),
                Err(e) => outcome.fail(
                    &self.family,
                    None,
                    format!("Failed to close {}: {}", path, e),
                ),
            }
        }
        outcome
    }
}

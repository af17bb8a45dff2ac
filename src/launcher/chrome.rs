use super::{collect_urls, launch_bare_application, open_documents, LaunchOutcome, Launcher};
use crate::family::FamilyId;
use crate::item::ContextItem;
use crate::platform::Platform;
use crate::script;
use tracing::{debug, info};

/// Opens all tabs in one new Chrome window and closes exactly that window.
pub struct ChromeLauncher {
    family: FamilyId,
    items: Vec<ContextItem>,
    platform: Platform,
    window_id: Option<i64>,
}

impl ChromeLauncher {
    pub fn new(family: FamilyId, items: Vec<ContextItem>, platform: Platform) -> Self {
        Self {
            family,
            items,
            platform,
            window_id: None,
        }
    }

    pub fn window_id(&self) -> Option<i64> {
        self.window_id
    }
}

impl Launcher for ChromeLauncher {
    fn family(&self) -> &FamilyId {
        &self.family
    }

    fn items(&self) -> &[ContextItem] {
        &self.items
    }

    fn open(&mut self) -> LaunchOutcome {
        let mut outcome = LaunchOutcome::default();
        open_documents(&self.platform, &self.family, &self.items, &mut outcome);
        let urls = collect_urls(&self.family, &self.items, &mut outcome);
        if urls.is_empty() {
            launch_bare_application(&self.platform, &self.family, &self.items, &mut outcome);
            return outcome;
        }

        match self.platform.automation.run(&script::chrome_open(&urls)) {
            Ok(Some(id)) => {
                info!(window_id = id, tabs = urls.len(), "Opened Chrome window");
                self.window_id = Some(id);
                outcome.succeed(urls.len());
            }
            Ok(None) => {
                outcome.succeed(urls.len());
                outcome.fail(
                    &self.family,
                    None,
                    "Chrome did not report a window id; the window cannot be closed later",
                );
            }
            Err(e) => outcome.fail(&self.family, None, format!("Failed to open Chrome window: {}", e)),
        }
        outcome
    }

    fn close(&mut self) -> LaunchOutcome {
        let mut outcome = LaunchOutcome::default();
        let Some(id) = self.window_id.take() else {
            debug!("No Chrome window recorded; nothing to close");
            return outcome;
        };
        match self.platform.automation.run(&script::chrome_close(id)) {
            Ok(_) => outcome.succeed(1),
            Err(e) if e.is_stale() => {
                debug!(window_id = id, "Chrome window already gone");
            }
            Err(e) => outcome.fail(&self.family, None, format!("Failed to close Chrome window {}: {}", id, e)),
        }
        outcome
    }
}

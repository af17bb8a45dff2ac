use super::{collect_urls, launch_bare_application, open_documents, LaunchOutcome, Launcher};
use crate::family::FamilyId;
use crate::item::ContextItem;
use crate::platform::Platform;
use crate::script;
use std::time::Duration;
use tracing::{debug, info};

/// Opens tabs in one new Safari window and closes it by its recorded id.
pub struct SafariLauncher {
    family: FamilyId,
    items: Vec<ContextItem>,
    platform: Platform,
    startup_delay: Duration,
    window_id: Option<i64>,
}

impl SafariLauncher {
    pub fn new(
        family: FamilyId,
        items: Vec<ContextItem>,
        platform: Platform,
        startup_delay: Duration,
    ) -> Self {
        Self {
            family,
            items,
            platform,
            startup_delay,
            window_id: None,
        }
    }

    pub fn window_id(&self) -> Option<i64> {
        self.window_id
    }
}

impl Launcher for SafariLauncher {
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

        let running = self.platform.workspace.is_running(self.family.as_str());
        if !running {
            debug!("Safari is not running; closing its launch window before opening ours");
        }
        let source = script::safari_open(&urls, running, self.startup_delay);
        match self.platform.automation.run(&source) {
            Ok(Some(id)) => {
                info!(window_id = id, tabs = urls.len(), "Opened Safari window");
                self.window_id = Some(id);
                outcome.succeed(urls.len());
            }
            Ok(None) => {
                outcome.succeed(urls.len());
                outcome.fail(
                    &self.family,
                    None,
                    "Safari did not report a window id; the window cannot be closed later",
                );
            }
            Err(e) => outcome.fail(&self.family, None, format!("Failed to open Safari window: {}", e)),
        }
        outcome
    }

    fn close(&mut self) -> LaunchOutcome {
        let mut outcome = LaunchOutcome::default();
        let Some(id) = self.window_id.take() else {
            return outcome;
        };
        match self.platform.automation.run(&script::safari_close(id)) {
            Ok(_) => outcome.succeed(1),
            Err(e) if e.is_stale() => debug!(window_id = id, "Safari window already gone"),
            Err(e) => outcome.fail(&self.family, None, format!("Failed to close Safari window {}: {}", id, e)),
        }
        outcome
    }
}

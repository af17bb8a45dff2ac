use super::{collect_urls, launch_bare_application, open_documents, LaunchOutcome, Launcher};
use crate::family::FamilyId;
use crate::item::ContextItem;
use crate::platform::Platform;
use crate::script;
use tracing::debug;

/// Opens tabs in a new Firefox window. Close is a no-op: Firefox's scripting
/// dictionary gives no handle to the window it made.
pub struct FirefoxLauncher {
    family: FamilyId,
    items: Vec<ContextItem>,
    platform: Platform,
}

impl FirefoxLauncher {
    pub fn new(family: FamilyId, items: Vec<ContextItem>, platform: Platform) -> Self {
        Self {
            family,
            items,
            platform,
        }
    }
}

impl Launcher for FirefoxLauncher {
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
        match self.platform.automation.run(&script::firefox_open(&urls)) {
            Ok(_) => outcome.succeed(urls.len()),
            Err(e) => outcome.fail(&self.family, None, format!("Failed to open Firefox window: {}", e)),
        }
        outcome
    }

    fn close(&mut self) -> LaunchOutcome {
        debug!("Firefox windows are not tracked; leaving them open");
        LaunchOutcome::default()
    }
}

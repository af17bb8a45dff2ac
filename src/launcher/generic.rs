use super::{open_documents, open_urls, LaunchOutcome, Launcher};
use crate::family::FamilyId;
use crate::item::ContextItem;
use crate::platform::Platform;
use tracing::debug;

/// Any application without a dedicated launcher: launch it by identifier, open
/// its documents and tab URLs with it, and quit it on close.
pub struct GenericLauncher {
    family: FamilyId,
    items: Vec<ContextItem>,
    platform: Platform,
}

impl GenericLauncher {
    pub fn new(family: FamilyId, items: Vec<ContextItem>, platform: Platform) -> Self {
        Self {
            family,
            items,
            platform,
        }
    }
}

impl Launcher for GenericLauncher {
    fn family(&self) -> &FamilyId {
        &self.family
    }

    fn items(&self) -> &[ContextItem] {
        &self.items
    }

    fn open(&mut self) -> LaunchOutcome {
        let mut outcome = LaunchOutcome::default();

        match self.platform.workspace.launch_application(self.family.as_str()) {
            Ok(()) => {
                let apps = self
                    .items
                    .iter()
                    .filter(|i| matches!(i, ContextItem::Application(_)))
                    .count();
                outcome.succeed(apps);
            }
            Err(e) => {
                outcome.fail(&self.family, None, format!("Failed to launch application: {}", e));
            }
        }

        open_documents(&self.platform, &self.family, &self.items, &mut outcome);
        open_urls(&self.platform, &self.family, &self.items, &mut outcome);
        outcome
    }

    fn close(&mut self) -> LaunchOutcome {
        let mut outcome = LaunchOutcome::default();
        let running = match self.platform.workspace.running_applications() {
            Ok(apps) => apps,
            Err(e) => {
                outcome.fail(
                    &self.family,
                    None,
                    format!("Failed to list running applications: {}", e),
                );
                return outcome;
            }
        };

        let matching = running
            .iter()
            .filter(|a| a.bundle_identifier.eq_ignore_ascii_case(self.family.as_str()));
        for app in matching {
            match self.platform.workspace.terminate(app) {
                Ok(()) => outcome.succeed(1),
                Err(e) if e.is_stale() => debug!(pid = app.pid, "Application already exited"),
                Err(e) => outcome.fail(
                    &self.family,
                    None,
                    format!("Failed to quit process {}: {}", app.pid, e),
                ),
            }
        }
        outcome
    }
}

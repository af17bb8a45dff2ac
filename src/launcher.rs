//! Launchers
//!
//! One launcher per application family, built for a single activation with the
//! subset of items routed to that family. `open` brings all of them up in as few new
//! windows as the family's automation surface allows; `close` reverses exactly what
//! this instance opened. Neither ever fails outward: problems are logged and
//! collected into a [`LaunchOutcome`].

mod chrome;
mod firefox;
mod generic;
mod preview;
mod safari;

pub use chrome::ChromeLauncher;
pub use firefox::FirefoxLauncher;
pub use generic::GenericLauncher;
pub use preview::PreviewLauncher;
pub use safari::SafariLauncher;

use crate::family::{FamilyId, FamilyKind};
use crate::item::ContextItem;
use crate::platform::Platform;
use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Open/close capability for one application family.
pub trait Launcher: Send {
    fn family(&self) -> &FamilyId;

    fn kind(&self) -> FamilyKind {
        self.family().kind()
    }

    fn items(&self) -> &[ContextItem];

    /// Bring every routed item into view. Called once per instance.
    fn open(&mut self) -> LaunchOutcome;

    /// Undo what `open` did on this instance, tolerating anything already gone.
    fn close(&mut self) -> LaunchOutcome;
}

/// Tunables shared by all launchers.
#[derive(Debug, Clone)]
pub struct LauncherSettings {
    /// Wait before Safari's first window after a cold start.
    pub safari_startup_delay: Duration,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            safari_startup_delay: Duration::from_millis(500),
        }
    }
}

/// Something a launcher could not do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchFailure {
    /// The affected item, when the failure concerns one item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    pub reason: String,
}

/// Result of one `open` or `close` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchOutcome {
    /// Operations that went through (items opened, windows or apps closed).
    pub completed: usize,
    pub failures: Vec<LaunchFailure>,
}

impl LaunchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn succeed(&mut self, count: usize) {
        self.completed += count;
    }

    /// Record and log a failure.
    pub(crate) fn fail(
        &mut self,
        family: &FamilyId,
        item_id: Option<ItemId>,
        reason: impl Into<String>,
    ) {
        let reason = reason.into();
        match item_id {
            Some(id) => warn!(family = %family, item_id = %id, reason = %reason, "Launcher step failed"),
            None => warn!(family = %family, reason = %reason, "Launcher step failed"),
        }
        self.failures.push(LaunchFailure { item_id, reason });
    }
}

/// Split browser tab items into usable URLs, recording empty ones as failures.
pub(crate) fn collect_urls(
    family: &FamilyId,
    items: &[ContextItem],
    outcome: &mut LaunchOutcome,
) -> Vec<String> {
    let mut urls = Vec::new();
    for tab in items.iter().filter_map(ContextItem::as_browser_tab) {
        let url = tab.url.trim();
        if url.is_empty() {
            outcome.fail(family, Some(tab.id), "Browser tab has an empty URL");
        } else {
            urls.push(url.to_string());
        }
    }
    urls
}

/// Open each document item with the family's application. Returns the paths that
/// opened.
pub(crate) fn open_documents(
    platform: &Platform,
    family: &FamilyId,
    items: &[ContextItem],
    outcome: &mut LaunchOutcome,
) -> Vec<String> {
    let mut opened = Vec::new();
    for doc in items.iter().filter_map(ContextItem::as_document) {
        match platform
            .workspace
            .open_path(Path::new(&doc.file_path), Some(family.as_str()))
        {
            Ok(()) => {
                opened.push(doc.file_path.clone());
                outcome.succeed(1);
            }
            Err(e) => outcome.fail(
                family,
                Some(doc.id),
                format!("Failed to open {}: {}", doc.file_path, e),
            ),
        }
    }
    opened
}

/// Hand each tab URL to the family's application, one `open` per URL. Used by
/// families without a window-scripting surface.
pub(crate) fn open_urls(
    platform: &Platform,
    family: &FamilyId,
    items: &[ContextItem],
    outcome: &mut LaunchOutcome,
) {
    for url in collect_urls(family, items, outcome) {
        match platform.workspace.open_url(&url, Some(family.as_str())) {
            Ok(()) => outcome.succeed(1),
            Err(e) => outcome.fail(family, None, format!("Failed to open {}: {}", url, e)),
        }
    }
}

/// Launch the family's application when the bucket holds application items but
/// nothing that opens a window by itself.
pub(crate) fn launch_bare_application(
    platform: &Platform,
    family: &FamilyId,
    items: &[ContextItem],
    outcome: &mut LaunchOutcome,
) {
    let wants_app = items
        .iter()
        .any(|i| matches!(i, ContextItem::Application(_)));
    if !wants_app {
        return;
    }
    match platform.workspace.launch_application(family.as_str()) {
        Ok(()) => outcome.succeed(1),
        Err(e) => outcome.fail(family, None, format!("Failed to launch application: {}", e)),
    }
}

/// Build the launcher for `family` with its items.
pub fn launcher_for(
    family: FamilyId,
    items: Vec<ContextItem>,
    platform: &Platform,
    settings: &LauncherSettings,
) -> Box<dyn Launcher> {
    match family.kind() {
        FamilyKind::Chrome => Box::new(ChromeLauncher::new(family, items, platform.clone())),
        FamilyKind::Safari => Box::new(SafariLauncher::new(
            family,
            items,
            platform.clone(),
            settings.safari_startup_delay,
        )),
        FamilyKind::Firefox => Box::new(FirefoxLauncher::new(family, items, platform.clone())),
        FamilyKind::DocumentViewer => {
            Box::new(PreviewLauncher::new(family, items, platform.clone()))
        }
        FamilyKind::Generic => Box::new(GenericLauncher::new(family, items, platform.clone())),
    }
}

//! Family resolution
//!
//! Maps each item to the application family responsible for it and partitions a
//! context's items into one bucket per family. Resolution happens at activation time,
//! never at item creation: the default browser and document handlers are facts about
//! the current machine and may change between runs.

use crate::item::{ContextItem, TerminalSession};
use crate::platform::Workspace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub const CHROME_BUNDLE_ID: &str = "com.google.Chrome";
pub const SAFARI_BUNDLE_ID: &str = "com.apple.Safari";
pub const FIREFOX_BUNDLE_ID: &str = "org.mozilla.firefox";
pub const PREVIEW_BUNDLE_ID: &str = "com.apple.Preview";
pub const TERMINAL_BUNDLE_ID: &str = "com.apple.Terminal";

/// Identifier of an application family: the responsible application's bundle id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(String);

impl FamilyId {
    pub fn new(bundle_identifier: impl Into<String>) -> Self {
        Self(bundle_identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> FamilyKind {
        FamilyKind::from_bundle_id(&self.0)
    }
}

impl std::fmt::Display for FamilyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which launcher implementation handles a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyKind {
    Chrome,
    Safari,
    Firefox,
    DocumentViewer,
    Generic,
}

impl FamilyKind {
    pub fn from_bundle_id(bundle_identifier: &str) -> Self {
        let matches = |known: &str| bundle_identifier.eq_ignore_ascii_case(known);
        if matches(CHROME_BUNDLE_ID) {
            FamilyKind::Chrome
        } else if matches(SAFARI_BUNDLE_ID) {
            FamilyKind::Safari
        } else if matches(FIREFOX_BUNDLE_ID) {
            FamilyKind::Firefox
        } else if matches(PREVIEW_BUNDLE_ID) {
            FamilyKind::DocumentViewer
        } else {
            FamilyKind::Generic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FamilyKind::Chrome => "chrome",
            FamilyKind::Safari => "safari",
            FamilyKind::Firefox => "firefox",
            FamilyKind::DocumentViewer => "preview",
            FamilyKind::Generic => "generic",
        }
    }
}

/// What a browser tab's `browser` field asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserChoice {
    Chrome,
    Safari,
    Firefox,
    /// Whatever the OS reports as default web browser right now.
    SystemDefault,
    Unrecognized,
}

impl BrowserChoice {
    /// Parse the raw field, case-insensitively. `"default"` and `""` mean the system
    /// default.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "chrome" => BrowserChoice::Chrome,
            "safari" => BrowserChoice::Safari,
            "firefox" => BrowserChoice::Firefox,
            "default" | "" => BrowserChoice::SystemDefault,
            _ => BrowserChoice::Unrecognized,
        }
    }

    fn bundle_id(&self) -> Option<&'static str> {
        match self {
            BrowserChoice::Chrome => Some(CHROME_BUNDLE_ID),
            BrowserChoice::Safari => Some(SAFARI_BUNDLE_ID),
            BrowserChoice::Firefox => Some(FIREFOX_BUNDLE_ID),
            BrowserChoice::SystemDefault | BrowserChoice::Unrecognized => None,
        }
    }
}

/// Items grouped by resolved family.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Buckets in order of each family's first item in the context.
    pub buckets: Vec<(FamilyId, Vec<ContextItem>)>,
    /// Terminal sessions, never bucketed.
    pub terminals: Vec<TerminalSession>,
    /// Items whose family could not be resolved; they take no part in activation.
    pub unresolved: Vec<ContextItem>,
}

impl Partition {
    pub fn bucket(&self, family: &FamilyId) -> Option<&[ContextItem]> {
        self.buckets
            .iter()
            .find(|(id, _)| id == family)
            .map(|(_, items)| items.as_slice())
    }

    pub fn bucketed_item_count(&self) -> usize {
        self.buckets.iter().map(|(_, items)| items.len()).sum()
    }
}

pub struct FamilyResolver {
    workspace: Arc<dyn Workspace>,
}

impl FamilyResolver {
    pub fn new(workspace: Arc<dyn Workspace>) -> Self {
        Self { workspace }
    }

    /// The family responsible for `item`, or `None` when it cannot be determined.
    /// Terminal sessions always resolve to `None`.
    pub fn resolve(&self, item: &ContextItem) -> Option<FamilyId> {
        match item {
            ContextItem::Application(app) => Some(FamilyId::new(app.bundle_identifier.clone())),
            ContextItem::Document(doc) => match &doc.owning_application {
                Some(owner) => Some(FamilyId::new(owner.clone())),
                None => self
                    .workspace
                    .default_application_for_path(Path::new(&doc.file_path))
                    .map(FamilyId::new),
            },
            ContextItem::BrowserTab(tab) => match BrowserChoice::parse(&tab.browser) {
                BrowserChoice::SystemDefault => {
                    self.workspace.default_web_browser().map(FamilyId::new)
                }
                BrowserChoice::Unrecognized => {
                    debug!(
                        item_id = %tab.id,
                        browser = %tab.browser,
                        "Unrecognized browser family; tab is skipped"
                    );
                    None
                }
                known => known.bundle_id().map(FamilyId::new),
            },
            ContextItem::TerminalSession(_) => None,
        }
    }

    /// Group `items` by family. Every item lands in exactly one of: a bucket, the
    /// terminal list, or the unresolved list.
    pub fn partition(&self, items: &[ContextItem]) -> Partition {
        let mut partition = Partition::default();
        let mut index: HashMap<FamilyId, usize> = HashMap::new();

        for item in items {
            if let ContextItem::TerminalSession(session) = item {
                partition.terminals.push(session.clone());
                continue;
            }
            match self.resolve(item) {
                Some(family) => match index.get(&family) {
                    Some(&slot) => partition.buckets[slot].1.push(item.clone()),
                    None => {
                        index.insert(family.clone(), partition.buckets.len());
                        partition.buckets.push((family, vec![item.clone()]));
                    }
                },
                None => partition.unresolved.push(item.clone()),
            }
        }

        partition
    }
}

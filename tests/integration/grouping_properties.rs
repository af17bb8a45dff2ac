//! Property tests for family partitioning

use flitro::family::{FamilyResolver, CHROME_BUNDLE_ID, PREVIEW_BUNDLE_ID, SAFARI_BUNDLE_ID};
use flitro::item::{AppItem, BrowserTab, ContextItem, DocumentItem, TerminalSession};
use flitro::platform::recording::RecordingPlatform;
use flitro::platform::Workspace;
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

const BROWSERS: [&str; 7] = ["chrome", "Safari", "firefox", "default", "", "opera", "CHROME"];
const EXTENSIONS: [&str; 3] = ["pdf", "txt", "unknown"];
const APPS: [&str; 3] = [
    "com.tinyspeck.slackmacgap",
    "com.apple.Notes",
    CHROME_BUNDLE_ID,
];

/// Build an item of any variant from two arbitrary selector bytes.
fn item_from(kind: u8, pick: u8) -> ContextItem {
    let pick = pick as usize;
    match kind % 4 {
        0 => AppItem::new("app", APPS[pick % APPS.len()]).into(),
        1 => {
            let path = format!("/docs/file{}.{}", pick, EXTENSIONS[pick % EXTENSIONS.len()]);
            let doc = DocumentItem::new("doc", path);
            if pick % 5 == 0 {
                doc.with_application("com.apple.TextEdit").into()
            } else {
                doc.into()
            }
        }
        2 => BrowserTab::new("tab", "https://example.com", BROWSERS[pick % BROWSERS.len()]).into(),
        _ => TerminalSession::new("term", "/tmp", Some("ls".to_string())).into(),
    }
}

#[test]
fn test_every_item_lands_in_exactly_one_place() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                proptest::collection::vec((any::<u8>(), any::<u8>()), 0..40),
                any::<bool>(),
            ),
            |(selectors, has_default_browser)| {
                let recorder = RecordingPlatform::new();
                recorder.set_document_handler("pdf", PREVIEW_BUNDLE_ID);
                recorder.set_document_handler("txt", "com.apple.TextEdit");
                recorder.set_default_browser(has_default_browser.then_some(SAFARI_BUNDLE_ID));
                let workspace: Arc<dyn Workspace> = recorder.clone();
                let resolver = FamilyResolver::new(workspace);

                let items: Vec<ContextItem> = selectors
                    .iter()
                    .map(|(kind, pick)| item_from(*kind, *pick))
                    .collect();
                let partition = resolver.partition(&items);

                let mut placements: HashMap<uuid::Uuid, usize> = HashMap::new();
                for (family, bucket) in &partition.buckets {
                    prop_assert!(!bucket.is_empty());
                    for item in bucket {
                        let resolved = resolver.resolve(item);
                        prop_assert_eq!(resolved.as_ref(), Some(family));
                        *placements.entry(item.id()).or_default() += 1;
                    }
                }
                for item in &partition.unresolved {
                    prop_assert!(resolver.resolve(item).is_none());
                    *placements.entry(item.id()).or_default() += 1;
                }
                for session in &partition.terminals {
                    *placements.entry(session.id).or_default() += 1;
                }

                for item in &items {
                    prop_assert_eq!(placements.get(&item.id()).copied(), Some(1));
                    if let ContextItem::TerminalSession(_) = item {
                        prop_assert!(partition.terminals.iter().any(|t| t.id == item.id()));
                    }
                }
                prop_assert_eq!(placements.len(), items.len());

                let families: Vec<_> = partition.buckets.iter().map(|(f, _)| f).collect();
                let mut unique = families.clone();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(unique.len(), families.len(), "one bucket per family");

                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_unrecognized_and_missing_browsers_are_unresolved() {
    let recorder = RecordingPlatform::new();
    let workspace: Arc<dyn Workspace> = recorder.clone();
    let resolver = FamilyResolver::new(workspace);

    let opera: ContextItem = BrowserTab::new("tab", "https://example.com", "opera").into();
    let default: ContextItem = BrowserTab::new("tab", "https://example.com", "default").into();
    let partition = resolver.partition(&[opera, default]);
    assert!(partition.buckets.is_empty());
    assert_eq!(partition.unresolved.len(), 2);
}

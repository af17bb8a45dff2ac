//! Activation engine behavior over the recording platform

use flitro::context::Context;
use flitro::engine::{ActivationEngine, ActivationStatus, SwitchPolicy};
use flitro::family::{FamilyId, CHROME_BUNDLE_ID, SAFARI_BUNDLE_ID, TERMINAL_BUNDLE_ID};
use flitro::item::{AppItem, BrowserTab, DocumentItem, TerminalSession};
use flitro::launcher::LauncherSettings;
use flitro::library::ContextLibrary;
use flitro::platform::recording::{PlatformCall, RecordingPlatform};
use flitro::terminal::SessionStatus;
use std::path::PathBuf;
use std::sync::Arc;

const SLACK: &str = "com.tinyspeck.slackmacgap";

fn engine(recorder: &Arc<RecordingPlatform>) -> ActivationEngine {
    ActivationEngine::new(recorder.platform(), LauncherSettings::default())
}

fn chrome_open_scripts(recorder: &RecordingPlatform) -> Vec<String> {
    recorder
        .scripts()
        .into_iter()
        .filter(|s| s.contains(CHROME_BUNDLE_ID) && s.contains("make new window"))
        .collect()
}

fn work_context() -> Context {
    Context::new("Work").with_items([
        AppItem::new("Slack", SLACK).into(),
        BrowserTab::new("Mail", "https://mail.example.com", "chrome").into(),
        BrowserTab::new("Docs", "https://docs.example.com", "chrome").into(),
        TerminalSession::new("dev", "/proj", Some("npm start".to_string())).into(),
    ])
}

#[test]
fn test_work_scenario_open_and_close() {
    let recorder = RecordingPlatform::new();
    let work = work_context();
    let library = ContextLibrary::new(vec![work.clone()]);
    let mut engine = engine(&recorder);

    let report = engine.activate(&library, work.id, SwitchPolicy::Replace);
    assert_eq!(report.status, ActivationStatus::Activated);
    assert!(report.is_clean(), "unexpected failures: {:?}", report.failures());

    let slack_launches = recorder
        .calls()
        .iter()
        .filter(|c| matches!(c, PlatformCall::Launch(b) if b == SLACK))
        .count();
    assert_eq!(slack_launches, 1);

    let chrome = chrome_open_scripts(&recorder);
    assert_eq!(chrome.len(), 1, "one Chrome window for both tabs");
    assert!(chrome[0].contains("https://mail.example.com"));
    assert!(chrome[0].contains("https://docs.example.com"));
    assert!(chrome[0].contains("close tab 1"), "blank tab is removed");

    assert_eq!(
        engine.launcher_families(work.id).unwrap(),
        vec![FamilyId::new(SLACK), FamilyId::new(CHROME_BUNDLE_ID)]
    );

    let terminal: Vec<String> = recorder
        .scripts()
        .into_iter()
        .filter(|s| s.contains("do script"))
        .collect();
    assert_eq!(terminal.len(), 1);
    assert!(terminal[0].contains("/proj"));
    assert!(terminal[0].contains("npm start"));
    assert_eq!(report.terminals.len(), 1);
    assert_eq!(report.terminals[0].status, SessionStatus::Started);

    recorder.clear();
    let closed = engine.close(work.id);
    assert!(closed.was_active);
    assert!(!engine.is_active(work.id));

    let actions = recorder.actions();
    assert!(actions.contains(&PlatformCall::Terminate(SLACK.to_string())));
    assert!(recorder
        .scripts()
        .iter()
        .any(|s| s.contains("close window id 1000")));
    assert!(
        !recorder.scripts().iter().any(|s| s.contains(TERMINAL_BUNDLE_ID)),
        "terminal windows are left alone"
    );
}

#[test]
fn test_open_close_symmetry() {
    let recorder = RecordingPlatform::new();
    let work = work_context();
    let library = ContextLibrary::new(vec![work.clone()]);
    let mut engine = engine(&recorder);

    engine.activate(&library, work.id, SwitchPolicy::Replace);
    assert!(engine.close(work.id).was_active);
    assert!(engine.launcher_families(work.id).is_none());

    recorder.clear();
    let second = engine.close(work.id);
    assert!(!second.was_active);
    assert!(second.buckets.is_empty());
    assert!(recorder.actions().is_empty());
}

#[test]
fn test_one_launcher_per_browser_family() {
    let recorder = RecordingPlatform::new();
    let tabs = (0..5).map(|i| {
        BrowserTab::new(
            format!("Tab {}", i),
            format!("https://site{}.example.com", i),
            "Chrome",
        )
        .into()
    });
    let research = Context::new("Research").with_items(tabs);
    let library = ContextLibrary::new(vec![research.clone()]);
    let mut engine = engine(&recorder);

    let report = engine.activate(&library, research.id, SwitchPolicy::Replace);
    assert_eq!(report.buckets.len(), 1);
    assert_eq!(report.buckets[0].items, 5);
    assert_eq!(
        engine.launcher_families(research.id).unwrap(),
        vec![FamilyId::new(CHROME_BUNDLE_ID)]
    );
    assert_eq!(chrome_open_scripts(&recorder).len(), 1);
}

#[test]
fn test_malformed_item_does_not_block_its_bucket() {
    let recorder = RecordingPlatform::new();
    let context = Context::new("Mixed").with_items([
        BrowserTab::new("Empty", "", "chrome").into(),
        BrowserTab::new("Good", "https://good.example.com", "chrome").into(),
    ]);
    let library = ContextLibrary::new(vec![context.clone()]);
    let mut engine = engine(&recorder);

    engine.activate(&library, context.id, SwitchPolicy::Replace);
    let chrome = chrome_open_scripts(&recorder);
    assert_eq!(chrome.len(), 1);
    assert!(chrome[0].contains("https://good.example.com"));
}

#[test]
fn test_failing_bucket_does_not_stop_others() {
    let recorder = RecordingPlatform::new();
    recorder.fail_when(SLACK);
    let work = work_context();
    let library = ContextLibrary::new(vec![work.clone()]);
    let mut engine = engine(&recorder);

    let report = engine.activate(&library, work.id, SwitchPolicy::Replace);
    assert_eq!(report.status, ActivationStatus::Activated);
    assert!(!report.is_clean());
    assert_eq!(chrome_open_scripts(&recorder).len(), 1);
    assert_eq!(report.terminals[0].status, SessionStatus::Started);
}

#[test]
fn test_default_browser_is_resolved_per_activation() {
    let recorder = RecordingPlatform::new();
    let reading = Context::new("Reading")
        .with_items([BrowserTab::new("News", "https://news.example.com", "default").into()]);
    let library = ContextLibrary::new(vec![reading.clone()]);
    let mut engine = engine(&recorder);

    recorder.set_default_browser(Some(SAFARI_BUNDLE_ID));
    engine.activate(&library, reading.id, SwitchPolicy::Replace);
    assert_eq!(
        engine.launcher_families(reading.id).unwrap(),
        vec![FamilyId::new(SAFARI_BUNDLE_ID)]
    );
    engine.close(reading.id);

    recorder.set_default_browser(Some(CHROME_BUNDLE_ID));
    engine.activate(&library, reading.id, SwitchPolicy::Replace);
    assert_eq!(
        engine.launcher_families(reading.id).unwrap(),
        vec![FamilyId::new(CHROME_BUNDLE_ID)]
    );
}

#[test]
fn test_unscripted_default_browser_still_opens_every_tab() {
    const EDGE: &str = "com.microsoft.edgemac";
    let recorder = RecordingPlatform::new();
    recorder.set_default_browser(Some(EDGE));
    let reading = Context::new("Reading").with_items([
        BrowserTab::new("News", "https://news.example.com", "default").into(),
        BrowserTab::new("Wiki", "https://wiki.example.com", "").into(),
    ]);
    let library = ContextLibrary::new(vec![reading.clone()]);
    let mut engine = engine(&recorder);

    let report = engine.activate(&library, reading.id, SwitchPolicy::Replace);
    assert!(report.is_clean(), "unexpected failures: {:?}", report.failures());
    assert_eq!(report.buckets.len(), 1);
    assert_eq!(report.buckets[0].family, FamilyId::new(EDGE));
    assert_eq!(report.buckets[0].outcome.completed, 2);

    let opened: Vec<PlatformCall> = recorder
        .actions()
        .into_iter()
        .filter(|c| matches!(c, PlatformCall::OpenUrl { .. }))
        .collect();
    assert_eq!(
        opened,
        vec![
            PlatformCall::OpenUrl {
                url: "https://news.example.com".to_string(),
                application: Some(EDGE.to_string()),
            },
            PlatformCall::OpenUrl {
                url: "https://wiki.example.com".to_string(),
                application: Some(EDGE.to_string()),
            },
        ]
    );
}

#[test]
fn test_document_owned_by_browser_is_opened() {
    let recorder = RecordingPlatform::new();
    let saved = Context::new("Saved")
        .with_items([DocumentItem::new("Page", "/tmp/page.html")
            .with_application(CHROME_BUNDLE_ID)
            .into()]);
    let library = ContextLibrary::new(vec![saved.clone()]);
    let mut engine = engine(&recorder);

    let report = engine.activate(&library, saved.id, SwitchPolicy::Replace);
    assert!(report.is_clean(), "unexpected failures: {:?}", report.failures());
    assert_eq!(report.buckets[0].outcome.completed, 1);
    assert!(recorder.actions().contains(&PlatformCall::OpenPath {
        path: PathBuf::from("/tmp/page.html"),
        application: Some(CHROME_BUNDLE_ID.to_string()),
    }));
}

#[test]
fn test_additive_keeps_and_replace_closes() {
    let recorder = RecordingPlatform::new();
    let a = Context::new("A").with_items([AppItem::new("Notes", "com.apple.Notes").into()]);
    let b = Context::new("B").with_items([AppItem::new("Mail", "com.apple.mail").into()]);
    let c = Context::new("C").with_items([AppItem::new("Music", "com.apple.Music").into()]);
    let library = ContextLibrary::new(vec![a.clone(), b.clone(), c.clone()]);
    let mut engine = engine(&recorder);

    engine.activate(&library, a.id, SwitchPolicy::Replace);
    let additive = engine.activate(&library, b.id, SwitchPolicy::Additive);
    assert!(additive.closed.is_empty());
    assert_eq!(engine.active_context_ids(), [a.id, b.id]);

    recorder.clear();
    let replace = engine.activate(&library, c.id, SwitchPolicy::Replace);
    let closed: Vec<_> = replace.closed.iter().map(|r| r.context_id).collect();
    assert_eq!(closed, vec![a.id, b.id]);
    assert_eq!(engine.active_context_ids(), [c.id]);

    let actions = recorder.actions();
    let quit_notes = actions
        .iter()
        .position(|c| *c == PlatformCall::Terminate("com.apple.Notes".to_string()))
        .unwrap();
    let launch_music = actions
        .iter()
        .position(|c| *c == PlatformCall::Launch("com.apple.Music".to_string()))
        .unwrap();
    assert!(quit_notes < launch_music, "old contexts close before the new one opens");
}

#[test]
fn test_missing_context_is_noop() {
    let recorder = RecordingPlatform::new();
    let library = ContextLibrary::new(vec![]);
    let mut engine = engine(&recorder);

    let report = engine.activate(&library, uuid::Uuid::new_v4(), SwitchPolicy::Replace);
    assert_eq!(report.status, ActivationStatus::ContextNotFound);
    assert!(recorder.calls().is_empty());
    assert!(engine.close_all().is_empty());
}

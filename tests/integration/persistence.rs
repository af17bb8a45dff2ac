//! Context store integration: JSON schema, legacy migration, atomic replacement

use flitro::context::{Context, IconDescriptor};
use flitro::engine::ActivationEngine;
use flitro::item::{AppItem, BrowserTab, ContextItem, DocumentItem, TerminalSession};
use flitro::launcher::LauncherSettings;
use flitro::manager::ContextManager;
use flitro::platform::recording::RecordingPlatform;
use flitro::store::json::CONTEXTS_FILE_NAME;
use flitro::store::{ContextStore, JsonContextStore};
use serde_json::{json, Value};
use tempfile::TempDir;

fn open_manager(store_path: &std::path::Path) -> ContextManager {
    let recorder = RecordingPlatform::new();
    let engine = ActivationEngine::new(recorder.platform(), LauncherSettings::default());
    ContextManager::open(Box::new(JsonContextStore::new(store_path)), engine).unwrap()
}

#[test]
fn test_items_are_written_as_tagged_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONTEXTS_FILE_NAME);
    let mut document = DocumentItem::new("Plan", "/docs/plan.pdf");
    document.bookmark = Some(vec![0, 1, 2, 250]);
    let context = Context::new("Work")
        .with_icon(IconDescriptor {
            name: "briefcase".to_string(),
            background_color: Some("#112233".to_string()),
            foreground_color: Some("#ffffff".to_string()),
        })
        .with_items([
            AppItem::new("Slack", "com.tinyspeck.slackmacgap").into(),
            document.into(),
            BrowserTab::new("Mail", "https://mail.example.com", "chrome").into(),
            TerminalSession::new("dev", "/proj", Some("npm start".to_string())).into(),
        ]);

    let store = JsonContextStore::new(&path);
    store.save_all(&[context.clone()]).unwrap();

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let types: Vec<&str> = raw[0]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec!["application", "document", "browserTab", "terminalSession"]
    );
    assert_eq!(raw[0]["items"][0]["value"]["bundleIdentifier"], "com.tinyspeck.slackmacgap");
    assert!(raw[0]["items"][1]["value"]["bookmark"].is_string());

    assert_eq!(store.load_all().unwrap(), vec![context]);
}

#[test]
fn test_legacy_file_is_migrated_and_rewritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONTEXTS_FILE_NAME);
    let legacy = json!([{
        "id": "6f1c1f5e-0000-4000-8000-000000000001",
        "name": "Work",
        "iconName": "briefcase",
        "createdAt": "2023-04-01T09:30:00Z",
        "lastUsed": "2023-05-01T09:30:00Z",
        "applications": [{"name": "Slack", "bundleIdentifier": "com.tinyspeck.slackmacgap"}],
        "documents": [],
        "browserTabs": [
            {"title": "Mail", "url": "https://mail.example.com", "browser": "chrome"},
            {"title": "No url"}
        ],
        "terminalSessions": [{"workingDirectory": "/proj", "title": "dev"}]
    }]);
    std::fs::write(&path, legacy.to_string()).unwrap();

    let manager = open_manager(&path);
    let work = manager.find("work").unwrap();
    let kinds: Vec<&str> = work.items().iter().map(|i| i.kind().label()).collect();
    assert_eq!(kinds, vec!["app", "tab", "terminal"]);
    assert_eq!(work.icon.as_ref().unwrap().name, "briefcase");

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw[0].get("applications").is_none());
    assert_eq!(raw[0]["items"][0]["type"], "application");
}

#[test]
fn test_flat_icon_file_is_migrated_not_backed_up() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONTEXTS_FILE_NAME);
    let stored = json!([{
        "id": "6f1c1f5e-0000-4000-8000-000000000003",
        "name": "Design",
        "iconName": "paintbrush",
        "iconBackgroundColor": "#336699",
        "createdAt": 700000000.0,
        "lastUsed": 700000100.25,
        "items": [
            {"type": "application", "value": {
                "id": "6f1c1f5e-0000-4000-8000-0000000000b1",
                "name": "Figma", "bundleIdentifier": "com.figma.Desktop"
            }}
        ]
    }]);
    std::fs::write(&path, stored.to_string()).unwrap();

    let manager = open_manager(&path);
    let design = manager.find("design").unwrap();
    assert_eq!(design.items().len(), 1);
    assert_eq!(design.icon.as_ref().unwrap().background_color.as_deref(), Some("#336699"));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(leftovers, vec![CONTEXTS_FILE_NAME.to_string()]);

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw[0].get("iconName").is_none());
    assert_eq!(raw[0]["icon"]["name"], "paintbrush");
}

#[test]
fn test_manager_changes_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join(CONTEXTS_FILE_NAME);

    let mut manager = open_manager(&path);
    let work = manager.create("Work", None).unwrap();
    let home = manager.create("Home", None).unwrap();
    let tab = manager
        .add_item(
            work.id,
            BrowserTab::new("Mail", "https://mail.example.com", "safari").into(),
        )
        .unwrap();
    manager
        .add_item(work.id, AppItem::new("Slack", "com.tinyspeck.slackmacgap").into())
        .unwrap();
    manager.move_item(work.id, 1, 0).unwrap();
    manager.reorder(home.id, 0).unwrap();
    drop(manager);

    let reopened = open_manager(&path);
    let names: Vec<&str> = reopened.contexts().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "Work"]);
    let work = reopened.find("Work").unwrap();
    let items: Vec<&str> = work.items().iter().map(ContextItem::display_name).collect();
    assert_eq!(items, vec!["Slack", "Mail"]);
    assert_eq!(work.items()[1].id(), tab);
}

#[test]
fn test_save_leaves_no_temporary_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONTEXTS_FILE_NAME);
    let store = JsonContextStore::new(&path);

    store.save_all(&[Context::new("One")]).unwrap();
    store.save_all(&[Context::new("One"), Context::new("Two")]).unwrap();

    let entries: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec![CONTEXTS_FILE_NAME.to_string()]);
    assert_eq!(store.load_all().unwrap().len(), 2);
}

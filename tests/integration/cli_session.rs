//! CLI route and interactive session tests

use clap::Parser;
use flitro::cli::{Cli, RunContext, SessionStep};
use flitro::context::Context;
use flitro::engine::{ActivationEngine, SwitchPolicy};
use flitro::item::{AppItem, BrowserTab};
use flitro::launcher::LauncherSettings;
use flitro::manager::ContextManager;
use flitro::platform::recording::RecordingPlatform;
use flitro::store::MemoryContextStore;
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::with_vars;

fn session_context(contexts: Vec<Context>) -> (RunContext, Arc<RecordingPlatform>) {
    let recorder = RecordingPlatform::new();
    let engine = ActivationEngine::new(recorder.platform(), LauncherSettings::default());
    let manager =
        ContextManager::open(Box::new(MemoryContextStore::new(contexts)), engine).unwrap();
    (
        RunContext::from_manager(manager, SwitchPolicy::Replace, Some(recorder.clone())),
        recorder,
    )
}

fn run(ctx: &mut RunContext, args: &[&str]) -> Result<String, flitro::error::ApiError> {
    let mut argv = vec!["flitro"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    ctx.execute(&cli.command)
}

#[test]
fn test_session_switches_between_contexts() {
    let work = Context::new("Work").with_items([
        AppItem::new("Slack", "com.tinyspeck.slackmacgap").into(),
        BrowserTab::new("Mail", "https://mail.example.com", "chrome").into(),
    ]);
    let home = Context::new("Home").with_items([AppItem::new("Music", "com.apple.Music").into()]);
    let (mut ctx, _recorder) = session_context(vec![work.clone(), home.clone()]);

    let input = "activate Work\nactivate Home --policy additive\nactive\nactivate Work\nactive\n";
    let mut output = Vec::new();
    ctx.run_session(input.as_bytes(), &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("Opened Work"));
    assert!(output.contains("Opened Home"));
    assert!(!output.contains("already active"));
    assert_eq!(
        ctx.manager().engine().active_context_ids(),
        [work.id],
        "replace closes Work and Home, then reopens Work"
    );
    assert!(output.trim_end().ends_with("Bye. 1 context(s) stay open."));
}

#[test]
fn test_session_additive_reactivation_is_reported() {
    let work = Context::new("Work")
        .with_items([AppItem::new("Slack", "com.tinyspeck.slackmacgap").into()]);
    let (mut ctx, recorder) = session_context(vec![work]);

    ctx.session_step("activate work");
    recorder.clear();
    assert_eq!(
        ctx.session_step("activate work --policy additive"),
        SessionStep::Reply(
            "'Work' is already active.\n\nDry run: no automation steps.".to_string()
        )
    );
}

#[test]
fn test_session_help_and_bad_policy_do_not_quit() {
    let (mut ctx, _recorder) = session_context(vec![Context::new("Work")]);
    assert!(matches!(
        ctx.session_step("help"),
        SessionStep::Reply(text) if text.contains("activate")
    ));
    assert!(matches!(
        ctx.session_step("activate Work --policy sideways"),
        SessionStep::Reply(_)
    ));
    assert!(matches!(ctx.session_step("quit"), SessionStep::Quit(_)));
}

#[test]
fn test_editing_commands_round_trip() {
    let (mut ctx, _recorder) = session_context(vec![]);

    run(&mut ctx, &["create", "Deep Work", "--icon", "brain"]).unwrap();
    run(
        &mut ctx,
        &["add", "terminal", "deep work", "/proj", "--command", "npm start"],
    )
    .unwrap();
    run(&mut ctx, &["add", "app", "Deep Work", "com.tinyspeck.slackmacgap", "--name", "Slack"])
        .unwrap();
    run(&mut ctx, &["move-item", "Deep Work", "2", "1"]).unwrap();
    run(&mut ctx, &["rename", "Deep Work", "Focus"]).unwrap();

    let focus = ctx.manager().find("focus").unwrap();
    let names: Vec<&str> = focus.items().iter().map(|i| i.display_name()).collect();
    assert_eq!(names, vec!["Slack", "/proj"]);
    assert_eq!(focus.icon.as_ref().unwrap().name, "brain");

    let slack_prefix = focus.items()[0].id().simple().to_string()[..8].to_string();
    let removed = run(&mut ctx, &["remove-item", "Focus", slack_prefix.as_str()]).unwrap();
    assert_eq!(removed, "Removed app 'Slack'");

    run(&mut ctx, &["delete", "Focus", "--yes"]).unwrap();
    assert!(ctx.manager().contexts().is_empty());
    assert!(run(&mut ctx, &["show", "Focus"]).is_err());
}

#[test]
fn test_plan_json_lists_buckets() {
    let work = Context::new("Work").with_items([
        BrowserTab::new("Mail", "https://mail.example.com", "chrome").into(),
        BrowserTab::new("Docs", "https://docs.example.com", "chrome").into(),
        BrowserTab::new("Odd", "https://odd.example.com", "opera").into(),
    ]);
    let (mut ctx, recorder) = session_context(vec![work]);

    let text = run(&mut ctx, &["plan", "Work", "--format", "json"]).unwrap();
    let plan: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(plan["buckets"].as_array().unwrap().len(), 1);
    assert_eq!(plan["buckets"][0]["kind"], "chrome");
    assert_eq!(plan["buckets"][0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(plan["unresolved"].as_array().unwrap().len(), 1);
    assert!(recorder.actions().is_empty(), "planning opens nothing");
}

#[test]
fn test_run_context_persists_to_store_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").unwrap();
    let store = temp.path().join("contexts.json");

    with_vars(&[], || {
        let mut ctx = RunContext::new(Some(config.clone()), Some(store.clone()), false).unwrap();
        assert!(!ctx.is_dry_run());
        run(&mut ctx, &["create", "Work"]).unwrap();
        assert!(store.exists());

        let mut reopened =
            RunContext::new(Some(config.clone()), Some(store.clone()), false).unwrap();
        let listed = run(&mut reopened, &["list", "--format", "json"]).unwrap();
        let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
        assert_eq!(listed[0]["name"], "Work");
    });
}

#[test]
fn test_dry_run_never_writes_the_store() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").unwrap();
    let store = temp.path().join("contexts.json");

    with_vars(&[], || {
        let mut ctx = RunContext::new(Some(config.clone()), Some(store.clone()), true).unwrap();
        assert!(ctx.is_dry_run());
        run(&mut ctx, &["create", "Work"]).unwrap();
        assert_eq!(ctx.manager().contexts().len(), 1);
        assert!(!store.exists());
    });
}

//! macOS services backed by `osascript` and `open`.
//!
//! AppleScript handles per-application automation; JavaScript for Automation with
//! the ObjC bridge answers the NSWorkspace queries (running apps, default handlers).
//! Nothing here is conditionally compiled: without `osascript` on the PATH every call
//! fails with [`AutomationError::Spawn`], which callers log and tolerate.

use super::{AutomationBridge, RunningApplication, Workspace};
use crate::error::AutomationError;
use crate::script;
use std::path::Path;
use std::process::{Command, Output};
use tracing::{debug, warn};

const OSASCRIPT: &str = "osascript";
const OPEN: &str = "open";

/// URL used to ask which application handles web links.
const BROWSER_QUERY_URL: &str = "http://example.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLanguage {
    AppleScript,
    JavaScript,
}

impl ScriptLanguage {
    fn as_arg(&self) -> &'static str {
        match self {
            ScriptLanguage::AppleScript => "AppleScript",
            ScriptLanguage::JavaScript => "JavaScript",
        }
    }
}

/// Run a script through `osascript` and return its trimmed standard output.
pub fn run_osascript(language: ScriptLanguage, source: &str) -> Result<String, AutomationError> {
    let output = Command::new(OSASCRIPT)
        .arg("-l")
        .arg(language.as_arg())
        .arg("-e")
        .arg(source)
        .output()?;
    finish(output)
}

fn finish(output: Output) -> Result<String, AutomationError> {
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(classify_failure(output.status.code(), &stderr))
    }
}

/// Map an `osascript`/`open` failure onto the error taxonomy.
///
/// AppleScript reports OSA error numbers in parentheses at the end of the message:
/// -600 (application isn't running), -1728/-1719 (no such object / bad index).
pub fn classify_failure(code: Option<i32>, stderr: &str) -> AutomationError {
    let message = stderr.to_string();
    match osa_error_number(stderr) {
        Some(-600) => AutomationError::NotRunning(message),
        Some(-1728) | Some(-1719) => AutomationError::NoSuchObject(message),
        Some(-10814) => AutomationError::ApplicationNotFound(message),
        _ if stderr.contains("Unable to find application") => {
            AutomationError::ApplicationNotFound(message)
        }
        _ => AutomationError::ScriptFailed { code, message },
    }
}

fn osa_error_number(stderr: &str) -> Option<i64> {
    let start = stderr.rfind("(-")?;
    let rest = &stderr[start + 1..];
    let end = rest.find(')')?;
    rest[..end].parse().ok()
}

/// Parse the textual result of a script into a window handle.
pub fn parse_handle(stdout: &str) -> Option<i64> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(0) => None,
        Ok(value) => Some(value),
        Err(_) => {
            debug!(output = trimmed, "Script result is not an integer handle");
            None
        }
    }
}

/// [`AutomationBridge`] that runs AppleScript through `osascript`.
#[derive(Debug, Default, Clone)]
pub struct OsascriptBridge;

impl OsascriptBridge {
    pub fn new() -> Self {
        Self
    }
}

impl AutomationBridge for OsascriptBridge {
    fn run(&self, script: &str) -> Result<Option<i64>, AutomationError> {
        let stdout = run_osascript(ScriptLanguage::AppleScript, script)?;
        Ok(parse_handle(&stdout))
    }
}

/// [`Workspace`] backed by NSWorkspace (through JXA) and the `open` tool.
#[derive(Debug, Default, Clone)]
pub struct MacWorkspace;

impl MacWorkspace {
    pub fn new() -> Self {
        Self
    }

    fn bundle_for_url_script(url_expr: &str) -> String {
        format!(
            "ObjC.import('AppKit');\n\
             var target = {url_expr};\n\
             var appUrl = $.NSWorkspace.sharedWorkspace.URLForApplicationToOpenURL(target);\n\
             appUrl.isNil() ? '' : ObjC.unwrap($.NSBundle.bundleWithURL(appUrl).bundleIdentifier);"
        )
    }

    fn query_bundle(script: &str) -> Option<String> {
        match run_osascript(ScriptLanguage::JavaScript, script) {
            Ok(out) if !out.is_empty() => Some(out),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Default application lookup failed");
                None
            }
        }
    }
}

const RUNNING_APPLICATIONS_JXA: &str = r#"ObjC.import('AppKit');
var apps = $.NSWorkspace.sharedWorkspace.runningApplications;
var out = [];
for (var i = 0; i < apps.count; i++) {
    var app = apps.objectAtIndex(i);
    var bundle = app.bundleIdentifier;
    if (bundle.isNil()) { continue; }
    out.push({
        bundleIdentifier: ObjC.unwrap(bundle),
        pid: app.processIdentifier,
        name: app.localizedName.isNil() ? null : ObjC.unwrap(app.localizedName),
        regular: app.activationPolicy == $.NSApplicationActivationPolicyRegular,
        hidden: app.isHidden
    });
}
JSON.stringify(out);"#;

impl Workspace for MacWorkspace {
    fn launch_application(&self, bundle_identifier: &str) -> Result<(), AutomationError> {
        let output = Command::new(OPEN).arg("-b").arg(bundle_identifier).output()?;
        finish(output).map(|_| ())
    }

    fn running_applications(&self) -> Result<Vec<RunningApplication>, AutomationError> {
        let json = run_osascript(ScriptLanguage::JavaScript, RUNNING_APPLICATIONS_JXA)?;
        serde_json::from_str(&json)
            .map_err(|e| AutomationError::UnexpectedOutput(format!("running applications: {}", e)))
    }

    fn terminate(&self, app: &RunningApplication) -> Result<(), AutomationError> {
        let source = script::quit_application(&app.bundle_identifier);
        run_osascript(ScriptLanguage::AppleScript, &source).map(|_| ())
    }

    fn open_path(&self, path: &Path, application: Option<&str>) -> Result<(), AutomationError> {
        let mut command = Command::new(OPEN);
        if let Some(bundle) = application {
            command.arg("-b").arg(bundle);
        }
        let output = command.arg(path).output()?;
        finish(output).map(|_| ())
    }

    fn open_url(&self, url: &str, application: Option<&str>) -> Result<(), AutomationError> {
        let mut command = Command::new(OPEN);
        if let Some(bundle) = application {
            command.arg("-b").arg(bundle);
        }
        let output = command.arg(url).output()?;
        finish(output).map(|_| ())
    }

    fn default_application_for_path(&self, path: &Path) -> Option<String> {
        let literal = serde_json::to_string(&path.to_string_lossy()).ok()?;
        let url_expr = format!("$.NSURL.fileURLWithPath({})", literal);
        Self::query_bundle(&Self::bundle_for_url_script(&url_expr))
    }

    fn default_web_browser(&self) -> Option<String> {
        let literal = serde_json::to_string(BROWSER_QUERY_URL).ok()?;
        let url_expr = format!("$.NSURL.URLWithString({})", literal);
        Self::query_bundle(&Self::bundle_for_url_script(&url_expr))
    }
}

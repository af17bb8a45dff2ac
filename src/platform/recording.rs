//! Recording platform: performs no OS side effects, records every call.
//!
//! Backs `--dry-run` and the test suite. Scripts that end by returning a window id
//! get a fresh, increasing id; everything else succeeds with no result unless a
//! failure fragment registered with [`RecordingPlatform::fail_when`] matches.

use super::{AutomationBridge, Platform, RunningApplication, Workspace};
use crate::error::AutomationError;
use crate::script::WINDOW_ID_RESULT;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One recorded interaction with the OS boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Script(String),
    Launch(String),
    ListRunning,
    Terminate(String),
    OpenPath {
        path: PathBuf,
        application: Option<String>,
    },
    OpenUrl {
        url: String,
        application: Option<String>,
    },
}

impl std::fmt::Display for PlatformCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformCall::Script(source) => write!(f, "script:\n{}", source),
            PlatformCall::Launch(bundle) => write!(f, "launch {}", bundle),
            PlatformCall::ListRunning => write!(f, "list running applications"),
            PlatformCall::Terminate(bundle) => write!(f, "quit {}", bundle),
            PlatformCall::OpenPath {
                path,
                application: Some(app),
            } => write!(f, "open {} with {}", path.display(), app),
            PlatformCall::OpenPath {
                path,
                application: None,
            } => write!(f, "open {}", path.display()),
            PlatformCall::OpenUrl {
                url,
                application: Some(app),
            } => write!(f, "open {} with {}", url, app),
            PlatformCall::OpenUrl {
                url,
                application: None,
            } => write!(f, "open {}", url),
        }
    }
}

struct RecordingState {
    calls: Vec<PlatformCall>,
    next_window_id: i64,
    next_pid: i32,
    default_browser: Option<String>,
    document_handlers: HashMap<String, String>,
    running: Vec<RunningApplication>,
    failures: Vec<String>,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            next_window_id: 1000,
            next_pid: 500,
            default_browser: None,
            document_handlers: HashMap::new(),
            running: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl RecordingState {
    fn failing(&self, subject: &str) -> Option<String> {
        self.failures
            .iter()
            .find(|fragment| subject.contains(fragment.as_str()))
            .cloned()
    }
}

pub struct RecordingPlatform {
    state: Mutex<RecordingState>,
    queries: Option<Arc<dyn Workspace>>,
}

impl RecordingPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(RecordingState::default()),
            queries: None,
        })
    }

    /// Record side effects but answer read-only queries (running apps, default
    /// handlers) from `queries`.
    pub fn with_queries(queries: Arc<dyn Workspace>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(RecordingState::default()),
            queries: Some(queries),
        })
    }

    /// A [`Platform`] whose bridge and workspace are both this recorder.
    pub fn platform(self: &Arc<Self>) -> Platform {
        Platform::new(self.clone(), self.clone())
    }

    pub fn set_default_browser(&self, bundle_identifier: Option<&str>) {
        self.state.lock().default_browser = bundle_identifier.map(str::to_string);
    }

    /// Register the handler for a file extension (without the dot).
    pub fn set_document_handler(&self, extension: &str, bundle_identifier: &str) {
        self.state
            .lock()
            .document_handlers
            .insert(extension.to_ascii_lowercase(), bundle_identifier.to_string());
    }

    pub fn add_running(&self, bundle_identifier: &str) -> RunningApplication {
        let mut state = self.state.lock();
        let app = RunningApplication {
            bundle_identifier: bundle_identifier.to_string(),
            pid: state.next_pid,
            name: None,
            regular: true,
            hidden: false,
        };
        state.next_pid += 1;
        state.running.push(app.clone());
        app
    }

    pub fn set_running(&self, apps: Vec<RunningApplication>) {
        self.state.lock().running = apps;
    }

    /// Fail every call whose script, bundle identifier or path contains `fragment`.
    pub fn fail_when(&self, fragment: &str) {
        self.state.lock().failures.push(fragment.to_string());
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().calls.clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                PlatformCall::Script(source) => Some(source.clone()),
                _ => None,
            })
            .collect()
    }

    /// Calls with side effects (everything except the running-apps listing).
    pub fn actions(&self) -> Vec<PlatformCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| !matches!(call, PlatformCall::ListRunning))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.state.lock().calls.clear();
    }
}

impl AutomationBridge for RecordingPlatform {
    fn run(&self, script: &str) -> Result<Option<i64>, AutomationError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::Script(script.to_string()));
        if let Some(fragment) = state.failing(script) {
            return Err(AutomationError::ScriptFailed {
                code: Some(1),
                message: format!("recorded failure ({})", fragment),
            });
        }
        if script.contains(WINDOW_ID_RESULT) {
            let id = state.next_window_id;
            state.next_window_id += 1;
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }
}

impl Workspace for RecordingPlatform {
    fn launch_application(&self, bundle_identifier: &str) -> Result<(), AutomationError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(PlatformCall::Launch(bundle_identifier.to_string()));
        if state.failing(bundle_identifier).is_some() {
            return Err(AutomationError::ApplicationNotFound(
                bundle_identifier.to_string(),
            ));
        }
        let already = state
            .running
            .iter()
            .any(|a| a.bundle_identifier == bundle_identifier);
        if !already {
            let pid = state.next_pid;
            state.next_pid += 1;
            state.running.push(RunningApplication {
                bundle_identifier: bundle_identifier.to_string(),
                pid,
                name: None,
                regular: true,
                hidden: false,
            });
        }
        Ok(())
    }

    fn running_applications(&self) -> Result<Vec<RunningApplication>, AutomationError> {
        if let Some(queries) = &self.queries {
            self.state.lock().calls.push(PlatformCall::ListRunning);
            return queries.running_applications();
        }
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::ListRunning);
        Ok(state.running.clone())
    }

    fn terminate(&self, app: &RunningApplication) -> Result<(), AutomationError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(PlatformCall::Terminate(app.bundle_identifier.clone()));
        if state.failing(&app.bundle_identifier).is_some() {
            return Err(AutomationError::ScriptFailed {
                code: Some(1),
                message: format!("recorded failure quitting {}", app.bundle_identifier),
            });
        }
        let before = state.running.len();
        state.running.retain(|a| a.pid != app.pid);
        if state.running.len() == before && self.queries.is_none() {
            return Err(AutomationError::NotRunning(app.bundle_identifier.clone()));
        }
        Ok(())
    }

    fn open_path(&self, path: &Path, application: Option<&str>) -> Result<(), AutomationError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::OpenPath {
            path: path.to_path_buf(),
            application: application.map(str::to_string),
        });
        let subject = path.to_string_lossy();
        if state.failing(&subject).is_some() {
            return Err(AutomationError::ScriptFailed {
                code: Some(1),
                message: format!("recorded failure opening {}", subject),
            });
        }
        Ok(())
    }

    fn open_url(&self, url: &str, application: Option<&str>) -> Result<(), AutomationError> {
        let mut state = self.state.lock();
        state.calls.push(PlatformCall::OpenUrl {
            url: url.to_string(),
            application: application.map(str::to_string),
        });
        if state.failing(url).is_some() {
            return Err(AutomationError::ScriptFailed {
                code: Some(1),
                message: format!("recorded failure opening {}", url),
            });
        }
        Ok(())
    }

    fn default_application_for_path(&self, path: &Path) -> Option<String> {
        if let Some(queries) = &self.queries {
            return queries.default_application_for_path(path);
        }
        let extension = path.extension()?.to_string_lossy().to_ascii_lowercase();
        self.state.lock().document_handlers.get(&extension).cloned()
    }

    fn default_web_browser(&self) -> Option<String> {
        if let Some(queries) = &self.queries {
            return queries.default_web_browser();
        }
        self.state.lock().default_browser.clone()
    }
}

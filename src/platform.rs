//! OS automation boundary
//!
//! Everything that touches the operating system goes through two capability traits:
//! [`AutomationBridge`] runs inter-application scripts, [`Workspace`] covers process
//! control and file or URL opening. Launchers, the terminal path, and the family resolver
//! receive them through a [`Platform`] value, which keeps them testable with
//! [`recording::RecordingPlatform`].

pub mod macos;
pub mod recording;

use crate::error::AutomationError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Runs an inter-application automation script.
pub trait AutomationBridge: Send + Sync {
    /// Execute an AppleScript source.
    ///
    /// Returns the script's integer result when it produced one (window ids), `None`
    /// when it returned nothing usable.
    fn run(&self, script: &str) -> Result<Option<i64>, AutomationError>;
}

/// A running application as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningApplication {
    pub bundle_identifier: String,
    pub pid: i32,
    #[serde(default)]
    pub name: Option<String>,
    /// Ordinary app with a Dock icon (not an agent or background process).
    #[serde(default)]
    pub regular: bool,
    #[serde(default)]
    pub hidden: bool,
}

/// Process control and file or URL opening.
pub trait Workspace: Send + Sync {
    /// Launch (or bring forward) the application with this bundle identifier.
    fn launch_application(&self, bundle_identifier: &str) -> Result<(), AutomationError>;

    fn running_applications(&self) -> Result<Vec<RunningApplication>, AutomationError>;

    /// Ask a running application to quit gracefully.
    fn terminate(&self, app: &RunningApplication) -> Result<(), AutomationError>;

    /// Open a file with the default handler or with a specific application.
    fn open_path(&self, path: &Path, application: Option<&str>) -> Result<(), AutomationError>;

    /// Open a URL with the default browser or with a specific application.
    fn open_url(&self, url: &str, application: Option<&str>) -> Result<(), AutomationError>;

    /// Bundle identifier of the application registered to open this file.
    fn default_application_for_path(&self, path: &Path) -> Option<String>;

    /// Bundle identifier of the current default web browser.
    fn default_web_browser(&self) -> Option<String>;

    fn is_running(&self, bundle_identifier: &str) -> bool {
        match self.running_applications() {
            Ok(apps) => apps
                .iter()
                .any(|a| a.bundle_identifier.eq_ignore_ascii_case(bundle_identifier)),
            Err(e) => {
                tracing::debug!(
                    bundle_identifier,
                    error = %e,
                    "Could not list running applications; assuming not running"
                );
                false
            }
        }
    }
}

/// The OS services injected into the activation engine.
#[derive(Clone)]
pub struct Platform {
    pub automation: Arc<dyn AutomationBridge>,
    pub workspace: Arc<dyn Workspace>,
}

impl Platform {
    pub fn new(automation: Arc<dyn AutomationBridge>, workspace: Arc<dyn Workspace>) -> Self {
        Self {
            automation,
            workspace,
        }
    }

    /// The real macOS services (`osascript` and `open`).
    pub fn system() -> Self {
        let bridge = Arc::new(macos::OsascriptBridge::new());
        let workspace = Arc::new(macos::MacWorkspace::new());
        Self::new(bridge, workspace)
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}

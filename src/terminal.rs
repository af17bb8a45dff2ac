//! Terminal sessions
//!
//! Terminal sessions bypass the launcher abstraction: each one with a command gets a
//! new Terminal window that changes to the working directory and runs the command.
//! Nothing is retained, so closing a context never closes terminal windows.

use crate::item::TerminalSession;
use crate::platform::Platform;
use crate::script;
use crate::types::ItemId;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What happened to one terminal session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SessionStatus {
    Started,
    /// No command to run.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub item_id: ItemId,
    pub title: String,
    pub status: SessionStatus,
}

/// Replace a leading `~` with the user's home directory.
pub fn expand_home(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return path.to_string(),
    };
    match BaseDirs::new() {
        Some(dirs) => format!("{}{}", dirs.home_dir().display(), rest),
        None => path.to_string(),
    }
}

/// Start one terminal session.
pub fn run_session(platform: &Platform, session: &TerminalSession) -> SessionOutcome {
    let status = match session.runnable_command() {
        None => {
            debug!(item_id = %session.id, title = %session.title, "Terminal session has no command; skipped");
            SessionStatus::Skipped
        }
        Some(command) => {
            let directory = expand_home(&session.working_directory);
            match platform.automation.run(&script::terminal_run(&directory, command)) {
                Ok(_) => {
                    info!(item_id = %session.id, directory = %directory, "Started terminal session");
                    SessionStatus::Started
                }
                Err(e) => {
                    warn!(item_id = %session.id, error = %e, "Failed to start terminal session");
                    SessionStatus::Failed(e.to_string())
                }
            }
        }
    };
    SessionOutcome {
        item_id: session.id,
        title: session.title.clone(),
        status,
    }
}

/// Start every session in order; one failure does not stop the rest.
pub fn run_sessions(platform: &Platform, sessions: &[TerminalSession]) -> Vec<SessionOutcome> {
    sessions.iter().map(|s| run_session(platform, s)).collect()
}

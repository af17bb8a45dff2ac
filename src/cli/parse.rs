//! CLI parse: clap types for Flitro. No behavior; definitions only.

use crate::engine::SwitchPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// `--policy` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// Close every active context first
    Replace,
    /// Keep active contexts open
    Additive,
}

impl From<PolicyArg> for SwitchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Replace => SwitchPolicy::Replace,
            PolicyArg::Additive => SwitchPolicy::Additive,
        }
    }
}

/// Flitro CLI - open and close whole working contexts at once
#[derive(Parser, Debug)]
#[command(name = "flitro")]
#[command(about = "Open and close workspace contexts: apps, documents, browser tabs and terminals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Contexts file (overrides the configured location)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Print the automation steps instead of running them; nothing is saved
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose logging (debug level, mirrored to stderr)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List contexts
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one context and its items
    Show {
        /// Context name, id, or id prefix
        context: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create an empty context
    Create {
        name: String,
        /// Icon symbol name
        #[arg(long)]
        icon: Option<String>,
        /// Icon background color (hex)
        #[arg(long, requires = "icon")]
        background: Option<String>,
        /// Icon foreground color (hex)
        #[arg(long, requires = "icon")]
        foreground: Option<String>,
    },
    /// Rename a context
    Rename { context: String, name: String },
    /// Delete a context
    Delete {
        context: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Create a context from the applications running now
    Capture { name: String },
    /// Move a context to a 1-based position in the list
    Reorder { context: String, position: usize },
    /// Add an item to a context
    Add {
        #[command(subcommand)]
        item: AddCommands,
    },
    /// Remove an item by id or id prefix
    RemoveItem { context: String, item: String },
    /// Move an item between 1-based positions
    MoveItem {
        context: String,
        from: usize,
        to: usize,
    },
    /// Show how a context's items would be grouped by application
    Plan {
        context: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Open every item of a context
    Open {
        context: String,
        /// Switching policy (defaults to the configured policy)
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Open a single item of a context
    OpenItem { context: String, item: String },
    /// Interactive session that can close what it opened
    Session,
}

#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Application by bundle identifier
    App {
        context: String,
        bundle_id: String,
        /// Display name (defaults to the bundle identifier)
        #[arg(long)]
        name: Option<String>,
    },
    /// Document by file path
    Document {
        context: String,
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
        /// Bundle identifier of the application that should open it
        #[arg(long)]
        application: Option<String>,
    },
    /// Browser tab
    Tab {
        context: String,
        url: String,
        /// chrome, safari, firefox, or default
        #[arg(long, default_value = "default")]
        browser: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Terminal session
    Terminal {
        context: String,
        directory: String,
        /// Command to run; sessions without one are skipped on open
        #[arg(long)]
        command: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
}

/// One line typed into `flitro session`.
#[derive(Parser, Debug)]
#[command(name = "session", no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommands {
    /// Open a context
    Activate {
        context: String,
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },
    /// Close what an activation opened
    Close { context: String },
    /// Close every active context
    CloseAll,
    /// List active contexts
    Active,
    /// List all contexts
    List,
    /// Leave the session; active contexts stay open
    #[command(visible_alias = "exit")]
    Quit,
}

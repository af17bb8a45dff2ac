//! CLI route: single route table and run context. Dispatches to the context manager and presentation.

use crate::cli::help::{add_command_name, session_banner, session_command_name};
use crate::cli::output::map_error;
use crate::cli::parse::{AddCommands, Commands, SessionCommands, SessionLine};
use crate::cli::presentation::{
    check_format, format_activation_report_json, format_activation_report_text,
    format_close_report_text, format_context_list_json, format_context_list_text,
    format_context_show_json, format_context_show_text, format_dry_run_actions,
    format_launch_outcome_text, format_plan_json, format_plan_text, format_section_heading,
};
use crate::cli::session::{split_command_line, SessionStep};
use crate::cli::command_name;
use crate::config::ConfigLoader;
use crate::context::{Context, IconDescriptor};
use crate::engine::{ActivationEngine, SwitchPolicy};
use crate::error::{ApiError, StorageError};
use crate::item::{AppItem, BrowserTab, ContextItem, DocumentItem, TerminalSession};
use crate::manager::ContextManager;
use crate::platform::macos::MacWorkspace;
use crate::platform::recording::RecordingPlatform;
use crate::platform::Platform;
use crate::store::{ContextStore, JsonContextStore, MemoryContextStore};
use crate::types::{parse_id, ItemId};
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const MIN_ITEM_PREFIX: usize = 4;

/// Runtime context for CLI execution: the context manager plus what the route
/// table needs to present results. Built from config using ConfigLoader only.
pub struct RunContext {
    manager: ContextManager,
    default_policy: SwitchPolicy,
    recorder: Option<Arc<RecordingPlatform>>,
}

impl RunContext {
    /// Create run context from an optional config file, an optional contexts file,
    /// and the dry-run flag.
    pub fn new(
        config_path: Option<PathBuf>,
        store_path: Option<PathBuf>,
        dry_run: bool,
    ) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_with_override(config_path.as_deref())?;
        if let Err(errors) = config.validate() {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(ApiError::ConfigError(messages.join("; ")));
        }
        let dry_run = dry_run || config.activation.dry_run;

        let json_store = match store_path.or_else(|| config.storage.contexts_file.clone()) {
            Some(path) => JsonContextStore::new(path),
            None => JsonContextStore::at_default_location()?,
        };
        debug!(path = %json_store.path().display(), dry_run, "Opening context store");

        let recorder = if dry_run {
            Some(RecordingPlatform::with_queries(Arc::new(MacWorkspace::new())))
        } else {
            None
        };
        let platform = match &recorder {
            Some(recorder) => recorder.platform(),
            None => Platform::system(),
        };
        let store: Box<dyn ContextStore> = if dry_run {
            Box::new(MemoryContextStore::new(json_store.load_all()?))
        } else {
            Box::new(json_store)
        };

        let engine = ActivationEngine::new(platform, config.activation.launcher_settings());
        let manager = ContextManager::open(store, engine)?;
        Ok(Self::from_manager(
            manager,
            config.activation.default_policy,
            recorder,
        ))
    }

    /// Run context over an already built manager. A recorder, when given, makes
    /// platform-touching commands report the automation steps they recorded.
    pub fn from_manager(
        manager: ContextManager,
        default_policy: SwitchPolicy,
        recorder: Option<Arc<RecordingPlatform>>,
    ) -> Self {
        Self {
            manager,
            default_policy,
            recorder,
        }
    }

    pub fn manager(&self) -> &ContextManager {
        &self.manager
    }

    pub fn is_dry_run(&self) -> bool {
        self.recorder.is_some()
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&mut self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        let result = self.execute_inner(command);
        match &result {
            Ok(_) => info!(
                command = %name,
                duration_ms = started.elapsed().as_millis() as u64,
                "Command completed"
            ),
            Err(e) => warn!(command = %name, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&mut self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::List { format } => {
                check_format(format)?;
                let active = self.manager.engine().active_context_ids().to_vec();
                if format == "json" {
                    format_context_list_json(self.manager.contexts(), &active)
                } else {
                    Ok(format_context_list_text(self.manager.contexts(), &active))
                }
            }
            Commands::Show { context, format } => {
                check_format(format)?;
                let found = self.manager.find(context)?;
                if format == "json" {
                    format_context_show_json(found)
                } else {
                    Ok(format_context_show_text(found, self.manager.is_active(found.id)))
                }
            }
            Commands::Create {
                name,
                icon,
                background,
                foreground,
            } => {
                let icon = icon.as_ref().map(|symbol| IconDescriptor {
                    name: symbol.clone(),
                    background_color: background.clone(),
                    foreground_color: foreground.clone(),
                });
                let created = self.manager.create(name, icon)?;
                Ok(format!("Created context '{}' ({})", created.name, created.id))
            }
            Commands::Rename { context, name } => {
                let id = self.manager.resolve(context)?;
                self.manager.rename(id, name)?;
                Ok(format!("Renamed to '{}'", name.trim()))
            }
            Commands::Delete { context, yes } => {
                let found = self.manager.find(context)?;
                let (id, display) = (found.id, found.name.clone());
                if !yes {
                    use dialoguer::Confirm;
                    let confirmed = Confirm::new()
                        .with_prompt(format!("Delete context '{}'?", display))
                        .interact()
                        .map_err(|e| {
                            ApiError::Interaction(format!("Failed to get user input: {}", e))
                        })?;

                    if !confirmed {
                        return Ok("Deletion cancelled".to_string());
                    }
                }
                self.manager.delete(id)?;
                Ok(format!("Deleted context '{}'", display))
            }
            Commands::Capture { name } => {
                let captured = self.manager.capture_current_workspace(name)?;
                Ok(format!(
                    "Captured {} application(s) into '{}'",
                    captured.items().len(),
                    captured.name
                ))
            }
            Commands::Reorder { context, position } => {
                let id = self.manager.resolve(context)?;
                self.manager.reorder(id, to_index(*position)?)?;
                Ok(format!("Moved to position {}", position))
            }
            Commands::Add { item } => self.add_item(item),
            Commands::RemoveItem { context, item } => {
                let found = self.manager.find(context)?;
                let (id, item_id) = (found.id, resolve_item(found, item)?);
                let removed = self.manager.remove_item(id, item_id)?;
                Ok(format!("Removed {} '{}'", removed.kind().label(), removed.display_name()))
            }
            Commands::MoveItem { context, from, to } => {
                let id = self.manager.resolve(context)?;
                self.manager.move_item(id, to_index(*from)?, to_index(*to)?)?;
                Ok(format!("Moved item {} to position {}", from, to))
            }
            Commands::Plan { context, format } => {
                check_format(format)?;
                let found = self.manager.find(context)?;
                let plan = self.manager.plan(found.id)?;
                if format == "json" {
                    format_plan_json(found, &plan)
                } else {
                    Ok(format_plan_text(found, &plan))
                }
            }
            Commands::Open {
                context,
                policy,
                format,
            } => {
                check_format(format)?;
                let id = self.manager.resolve(context)?;
                let report = self
                    .manager
                    .activate(id, policy.map(SwitchPolicy::from).unwrap_or(self.default_policy));
                let text = if format == "json" {
                    format_activation_report_json(&report)?
                } else {
                    format_activation_report_text(&report)
                };
                Ok(self.with_dry_run_actions(text))
            }
            Commands::OpenItem { context, item } => {
                let found = self.manager.find(context)?;
                let id = found.id;
                let item_id = resolve_item(found, item)?;
                let item_name = found
                    .item(item_id)
                    .map(|i| i.display_name().to_string())
                    .unwrap_or_default();
                let outcome = self.manager.open_item(id, item_id)?;
                let text = format_launch_outcome_text(&outcome, &item_name);
                Ok(self.with_dry_run_actions(text))
            }
            Commands::Session => {
                let stdin = std::io::stdin();
                let mut stdout = std::io::stdout();
                self.run_session(stdin.lock(), &mut stdout)?;
                Ok(String::new())
            }
        }
    }

    fn add_item(&mut self, command: &AddCommands) -> Result<String, ApiError> {
        let (selector, item): (&str, ContextItem) = match command {
            AddCommands::App {
                context,
                bundle_id,
                name,
            } => {
                let bundle_id = require_non_empty(bundle_id, "bundle identifier")?;
                let name = name.clone().unwrap_or_else(|| bundle_id.to_string());
                (context.as_str(), AppItem::new(name, bundle_id).into())
            }
            AddCommands::Document {
                context,
                path,
                name,
                application,
            } => {
                let path = std::path::absolute(path)
                    .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
                let name = name.clone().unwrap_or_else(|| {
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string())
                });
                let mut document = DocumentItem::new(name, path.to_string_lossy());
                if let Some(application) = application {
                    document = document.with_application(application.clone());
                }
                (context.as_str(), document.into())
            }
            AddCommands::Tab {
                context,
                url,
                browser,
                title,
            } => {
                let url = require_non_empty(url, "URL")?;
                let title = title.clone().unwrap_or_default();
                (context.as_str(), BrowserTab::new(title, url, browser.clone()).into())
            }
            AddCommands::Terminal {
                context,
                directory,
                command,
                title,
            } => {
                let directory = require_non_empty(directory, "working directory")?;
                let title = title.clone().unwrap_or_else(|| directory.to_string());
                (
                    context.as_str(),
                    TerminalSession::new(title, directory, command.clone()).into(),
                )
            }
        };

        let id = self.manager.resolve(selector)?;
        let display = item.display_name().to_string();
        let item_id = self.manager.add_item(id, item)?;
        debug!(kind = add_command_name(command), item_id = %item_id, "Added item");
        Ok(format!("Added {} '{}' ({})", add_command_name(command), display, item_id))
    }

    fn with_dry_run_actions(&self, text: String) -> String {
        match &self.recorder {
            Some(recorder) => {
                let actions = recorder.actions();
                recorder.clear();
                format!("{}\n\n{}", text, format_dry_run_actions(&actions))
            }
            None => text,
        }
    }

    /// Read session commands from `input` until `quit` or end of input. Contexts
    /// activated here can be closed here; leaving the session keeps them open.
    pub fn run_session<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> Result<(), ApiError> {
        let io = |e: std::io::Error| ApiError::StorageError(StorageError::IoError(e));
        writeln!(output, "{}", session_banner()).map_err(io)?;
        write!(output, "flitro> ").map_err(io)?;
        output.flush().map_err(io)?;

        for line in input.lines() {
            let line = line.map_err(io)?;
            match self.session_step(&line) {
                SessionStep::Quit(farewell) => {
                    writeln!(output, "{}", farewell).map_err(io)?;
                    return Ok(());
                }
                SessionStep::Reply(reply) => {
                    if !reply.is_empty() {
                        writeln!(output, "{}", reply).map_err(io)?;
                    }
                }
            }
            write!(output, "flitro> ").map_err(io)?;
            output.flush().map_err(io)?;
        }
        writeln!(output).map_err(io)?;
        writeln!(output, "{}", self.farewell()).map_err(io)?;
        Ok(())
    }

    /// Handle one typed session line.
    pub fn session_step(&mut self, line: &str) -> SessionStep {
        let args = match split_command_line(line) {
            Ok(args) if args.is_empty() => return SessionStep::Reply(String::new()),
            Ok(args) => args,
            Err(e) => return SessionStep::Reply(e),
        };
        let parsed = match SessionLine::try_parse_from(args) {
            Ok(parsed) => parsed,
            Err(e) => return SessionStep::Reply(e.to_string().trim_end().to_string()),
        };
        debug!(command = session_command_name(&parsed.command), "Session command");
        if parsed.command == SessionCommands::Quit {
            return SessionStep::Quit(self.farewell());
        }
        match self.session_command(&parsed.command) {
            Ok(reply) => SessionStep::Reply(reply),
            Err(e) => SessionStep::Reply(map_error(&e)),
        }
    }

    fn session_command(&mut self, command: &SessionCommands) -> Result<String, ApiError> {
        match command {
            SessionCommands::Activate { context, policy } => {
                let id = self.manager.resolve(context)?;
                let report = self
                    .manager
                    .activate(id, policy.map(SwitchPolicy::from).unwrap_or(self.default_policy));
                Ok(self.with_dry_run_actions(format_activation_report_text(&report)))
            }
            SessionCommands::Close { context } => {
                let found = self.manager.find(context)?;
                let (id, name) = (found.id, found.name.clone());
                let report = self.manager.close(id);
                Ok(self.with_dry_run_actions(format_close_report_text(&report, &name)))
            }
            SessionCommands::CloseAll => {
                let names: Vec<String> = self
                    .manager
                    .active_contexts()
                    .iter()
                    .map(|c| c.name.clone())
                    .collect();
                let reports = self.manager.close_all();
                if reports.is_empty() {
                    return Ok("No active contexts.".to_string());
                }
                let lines: Vec<String> = reports
                    .iter()
                    .zip(names.iter())
                    .map(|(report, name)| format_close_report_text(report, name))
                    .collect();
                Ok(self.with_dry_run_actions(lines.join("\n")))
            }
            SessionCommands::Active => {
                let active = self.manager.active_contexts();
                if active.is_empty() {
                    return Ok("No active contexts.".to_string());
                }
                let mut out = format_section_heading("Active contexts");
                for context in active {
                    out.push_str(&format!("\n  {}", context.name));
                }
                Ok(out)
            }
            SessionCommands::List => {
                let active = self.manager.engine().active_context_ids().to_vec();
                Ok(format_context_list_text(self.manager.contexts(), &active))
            }
            SessionCommands::Quit => Ok(self.farewell()),
        }
    }

    fn farewell(&self) -> String {
        match self.manager.active_contexts().len() {
            0 => "Bye.".to_string(),
            n => format!("Bye. {} context(s) stay open.", n),
        }
    }
}

/// Convert a 1-based position typed by the user into an index.
fn to_index(position: usize) -> Result<usize, ApiError> {
    position
        .checked_sub(1)
        .ok_or_else(|| ApiError::InvalidInput("Positions start at 1".to_string()))
}

fn require_non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("The {} cannot be empty", what)));
    }
    Ok(trimmed)
}

/// Resolve an item by full id or by a unique id prefix.
fn resolve_item(context: &Context, selector: &str) -> Result<ItemId, ApiError> {
    if let Some(id) = parse_id(selector) {
        return context
            .item(id)
            .map(ContextItem::id)
            .ok_or_else(|| ApiError::ItemNotFound(selector.to_string()));
    }

    let prefix = selector.trim().to_ascii_lowercase().replace('-', "");
    if prefix.len() < MIN_ITEM_PREFIX {
        return Err(ApiError::ItemNotFound(selector.to_string()));
    }
    let matches: Vec<ItemId> = context
        .items()
        .iter()
        .map(ContextItem::id)
        .filter(|id| id.simple().to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(ApiError::ItemNotFound(selector.to_string())),
        _ => Err(ApiError::InvalidInput(format!(
            "Item id prefix '{}' matches {} items",
            selector,
            matches.len()
        ))),
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("manager", &self.manager)
            .field("default_policy", &self.default_policy)
            .field("dry_run", &self.is_dry_run())
            .finish()
    }
}
